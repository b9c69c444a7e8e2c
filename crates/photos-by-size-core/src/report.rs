use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::info::Info;
use crate::media::MediaType;

pub const BYTES_PER_MB: i64 = 1024 * 1024;

/// Rendered in place of a missing creation date.
pub const EPOCH_FALLBACK: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

/// How assets with an unknown size take part in the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeAccounting {
    /// The -1 sentinel is summed like any other size.
    #[default]
    Sentinel,
    /// Unknown sizes are left out of the total and counted separately.
    ExcludeUnknown,
}

/// Render a byte size as megabytes: "<0.1", "X.Y" up to 10 MB, "X" above.
///
/// Digits are truncated, never rounded. Negative sizes land in "<0.1".
pub fn format_size_mb(size: i64) -> String {
    let mb = size as f64 / BYTES_PER_MB as f64;
    if mb > 10.0 {
        format!("{}", mb.floor() as i64)
    } else if mb > 0.1 {
        let whole = mb.floor();
        let tenth = ((mb - whole) * 10.0) as i64;
        format!("{}.{}", whole as i64, tenth)
    } else {
        "<0.1".to_string()
    }
}

/// Whole megabytes, rounded up.
pub fn ceil_mb(total_bytes: i64) -> i64 {
    if total_bytes > 0 {
        (total_bytes - 1) / BYTES_PER_MB + 1
    } else {
        // integer division truncates toward zero, which is the ceiling here
        total_bytes / BYTES_PER_MB
    }
}

pub fn render_date(date: Option<DateTime<Utc>>) -> String {
    date.unwrap_or(EPOCH_FALLBACK)
        .format("%Y-%m-%d %H:%M:%S %z")
        .to_string()
}

/// `<type> @ <date>, <size>mb`
pub fn render_line(info: &Info) -> String {
    format!(
        "{} @ {}, {}mb",
        info.media_type,
        render_date(info.date),
        format_size_mb(info.size)
    )
}

/// Aggregated, size-sorted view of every Info record.
#[derive(Debug, Clone)]
pub struct Report {
    /// Sorted by size, largest first. Order among equal sizes is unspecified.
    pub records: Vec<Info>,
    pub accounting: SizeAccounting,
    pub total_bytes: i64,
    pub unknown_count: usize,
}

impl Report {
    pub fn build(mut records: Vec<Info>, accounting: SizeAccounting) -> Self {
        let unknown_count = records.iter().filter(|i| !i.size_known()).count();
        // saturates at i64::MAX, the same ceiling Info sizes are clamped to
        let total_bytes = records
            .iter()
            .filter(|i| accounting == SizeAccounting::Sentinel || i.size_known())
            .map(|i| i.size)
            .fold(0i64, i64::saturating_add);

        records.sort_by(|a, b| b.size.cmp(&a.size));

        Self {
            records,
            accounting,
            total_bytes,
            unknown_count,
        }
    }

    pub fn total_mb(&self) -> i64 {
        ceil_mb(self.total_bytes)
    }

    /// Record lines followed by the summary line(s).
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.records.iter().map(render_line).collect();
        lines.push(format!("total size: {} mb", self.total_mb()));
        if self.accounting == SizeAccounting::ExcludeUnknown {
            lines.push(format!("{} assets with unknown size", self.unknown_count));
        }
        lines
    }

    pub fn write_text<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for line in self.lines() {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    pub fn write_json<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let doc = JsonReport {
            records: self
                .records
                .iter()
                .map(|i| JsonRecord {
                    media_type: i.media_type,
                    date: i.date,
                    size: i.size,
                    size_mb: format_size_mb(i.size),
                })
                .collect(),
            total_bytes: self.total_bytes,
            total_mb: self.total_mb(),
            unknown_count: self.unknown_count,
            accounting: self.accounting,
        };
        serde_json::to_writer_pretty(&mut *out, &doc)?;
        writeln!(out)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonRecord {
    media_type: MediaType,
    date: Option<DateTime<Utc>>,
    size: i64,
    size_mb: String,
}

#[derive(Serialize)]
struct JsonReport {
    records: Vec<JsonRecord>,
    total_bytes: i64,
    total_mb: i64,
    unknown_count: usize,
    accounting: SizeAccounting,
}
