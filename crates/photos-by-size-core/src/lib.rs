pub mod date;
pub mod gate;
pub mod info;
pub mod media;
pub mod report;
pub mod source;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::gate::{Authorization, GateError};
use crate::info::Info;
use crate::media::Asset;
use crate::source::AssetSource;

pub use crate::report::{Report, SizeAccounting};

/// A progress marker is emitted every this many assets.
pub const PROGRESS_INTERVAL: u64 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Directory, .zip archive or .json catalog to read assets from
    pub source: PathBuf,
    #[serde(default)]
    pub accounting: SizeAccounting,
    /// Stop when access is denied instead of listing anyway
    #[serde(default)]
    pub strict_auth: bool,
    /// Give up waiting for the authorization answer after this many seconds
    #[serde(default)]
    pub auth_timeout_secs: Option<u64>,
}

/// Progress callback: (stage, current, total, message).
///
/// Stages are `"start"`, `"collect"` (one per marker) and `"done"`.
pub type ProgressCallback<'a> = dyn Fn(&str, u64, u64, &str) + Send + Sync + 'a;

/// Forwards only every `every`-th item, counting from zero.
pub struct MarkerProgress<'a> {
    inner: &'a ProgressCallback<'a>,
    every: u64,
}

impl<'a> MarkerProgress<'a> {
    pub fn new(inner: &'a ProgressCallback<'a>, every: u64) -> Self {
        Self {
            inner,
            every: every.max(1),
        }
    }

    pub fn report(&self, stage: &str, current: u64, total: u64, message: &str) {
        if current % self.every == 0 {
            (self.inner)(stage, current, total, message);
        }
    }
}

/// Build one Info per asset, in the order given.
pub fn collect_infos(assets: &[Asset], progress: &ProgressCallback<'_>) -> Vec<Info> {
    let total = assets.len() as u64;
    let markers = MarkerProgress::new(progress, PROGRESS_INTERVAL);

    progress("start", 0, total, "collecting sizes");
    let mut infos = Vec::with_capacity(assets.len());
    for (i, asset) in assets.iter().enumerate() {
        infos.push(Info::from_asset(asset));
        markers.report("collect", i as u64, total, &asset.origin);
    }
    progress("done", total, total, "sizes collected");

    infos
}

/// Open the source named in `options` and build the report.
pub fn run(options: &ReportOptions, progress: &ProgressCallback<'_>) -> anyhow::Result<Report> {
    let opened = source::open(&options.source)?;
    run_with_source(opened.as_ref(), options, progress)
}

/// Authorize, enumerate in creation-date order, collect and aggregate.
pub fn run_with_source(
    source: &dyn AssetSource,
    options: &ReportOptions,
    progress: &ProgressCallback<'_>,
) -> anyhow::Result<Report> {
    let timeout = options.auth_timeout_secs.map(Duration::from_secs);
    match gate::await_authorization(source, timeout)? {
        Authorization::Granted => info!("access to {} granted", source.describe()),
        Authorization::Denied if options.strict_auth => {
            return Err(GateError::Denied(source.describe()).into());
        }
        Authorization::Denied => {
            warn!("access to {} denied, listing anyway", source.describe());
        }
    }

    let mut assets = source.list_assets()?;
    crate::source::sort_by_creation_date(&mut assets);
    info!("{} assets from {}", assets.len(), source.describe());

    let infos = collect_infos(&assets, progress);
    Ok(Report::build(infos, options.accounting))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::UNKNOWN_SIZE;
    use crate::media::MediaType;
    use crate::source::memory::MemorySource;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    const MB: u64 = 1024 * 1024;

    fn options() -> ReportOptions {
        ReportOptions {
            source: PathBuf::from("memory"),
            accounting: SizeAccounting::Sentinel,
            strict_auth: false,
            auth_timeout_secs: None,
        }
    }

    fn asset(media_type: MediaType, size: Option<u64>) -> Asset {
        Asset::new("m".into(), media_type, None).with_resource(size)
    }

    fn quiet(_: &str, _: u64, _: u64, _: &str) {}

    #[test]
    fn test_pipeline_sorts_by_size() {
        let source = MemorySource::granted(vec![
            asset(MediaType::Image, Some(3 * MB)),
            asset(MediaType::Image, Some(MB)),
            asset(MediaType::Video, Some(2 * MB)),
        ]);
        let report = run_with_source(&source, &options(), &quiet).unwrap();
        let sizes: Vec<i64> = report.records.iter().map(|i| i.size).collect();
        assert_eq!(sizes, vec![(3 * MB) as i64, (2 * MB) as i64, MB as i64]);
        assert_eq!(report.total_mb(), 6);
    }

    #[test]
    fn test_unknown_size_flows_into_total() {
        let source = MemorySource::granted(vec![asset(MediaType::Video, None)]);
        let report = run_with_source(&source, &options(), &quiet).unwrap();
        assert_eq!(report.records[0].size, UNKNOWN_SIZE);
        assert_eq!(report.total_bytes, -1);
        assert_eq!(
            report.lines(),
            vec![
                "video @ 1970-01-01 00:00:00 +0000, <0.1mb".to_string(),
                "total size: 0 mb".to_string(),
            ]
        );
    }

    #[test]
    fn test_denied_still_lists() {
        let source = MemorySource::denied(vec![asset(MediaType::Image, Some(MB))]);
        let report = run_with_source(&source, &options(), &quiet).unwrap();
        assert_eq!(report.records.len(), 1);
    }

    #[test]
    fn test_strict_denial_fails() {
        let source = MemorySource::denied(vec![asset(MediaType::Image, Some(MB))]);
        let mut opts = options();
        opts.strict_auth = true;
        let err = run_with_source(&source, &opts, &quiet).unwrap_err();
        assert!(matches!(err.downcast_ref::<GateError>(), Some(GateError::Denied(_))));
    }

    #[test]
    fn test_collects_in_creation_order() {
        let d1 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let d2 = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let source = MemorySource::granted(vec![
            Asset::new("newer".into(), MediaType::Image, Some(d2)).with_resource(Some(1)),
            Asset::new("older".into(), MediaType::Image, Some(d1)).with_resource(Some(1)),
        ]);
        let seen = Mutex::new(Vec::new());
        let record = |stage: &str, _: u64, _: u64, message: &str| {
            if stage == "collect" {
                seen.lock().unwrap().push(message.to_string());
            }
        };
        run_with_source(&source, &options(), &record).unwrap();
        // only index 0 is a marker
        assert_eq!(*seen.lock().unwrap(), vec!["older".to_string()]);
    }

    #[test]
    fn test_progress_markers() {
        let assets: Vec<Asset> = (0..2500).map(|_| asset(MediaType::Image, Some(1))).collect();
        let events = Mutex::new(Vec::new());
        let record = |stage: &str, current: u64, total: u64, _: &str| {
            events.lock().unwrap().push((stage.to_string(), current, total));
        };
        let infos = collect_infos(&assets, &record);
        assert_eq!(infos.len(), 2500);

        let events = events.into_inner().unwrap();
        let expected: Vec<(String, u64, u64)> = vec![
            ("start".into(), 0, 2500),
            ("collect".into(), 0, 2500),
            ("collect".into(), 1000, 2500),
            ("collect".into(), 2000, 2500),
            ("done".into(), 2500, 2500),
        ];
        assert_eq!(events, expected);
    }

    #[test]
    fn test_exclude_unknown_mode() {
        let source = MemorySource::granted(vec![
            asset(MediaType::Image, Some(2 * MB)),
            asset(MediaType::Video, None),
        ]);
        let mut opts = options();
        opts.accounting = SizeAccounting::ExcludeUnknown;
        let report = run_with_source(&source, &opts, &quiet).unwrap();
        assert_eq!(report.total_bytes, (2 * MB) as i64);
        assert_eq!(report.unknown_count, 1);
    }
}
