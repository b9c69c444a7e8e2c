use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::date;
use crate::gate::{Authorization, AuthorizationReply};
use crate::media::{Asset, MediaType};

use super::AssetSource;

/// Media files under a directory tree, e.g. an exported photo library.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirectorySource {
    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }

    fn request_authorization(&self, reply: AuthorizationReply) {
        let status = match fs::read_dir(&self.root) {
            Ok(_) => Authorization::Granted,
            Err(e) => {
                debug!("cannot read {}: {}", self.root.display(), e);
                Authorization::Denied
            }
        };
        reply(status);
    }

    fn list_assets(&self) -> anyhow::Result<Vec<Asset>> {
        let mut files = Vec::new();
        collect_files(&self.root, &mut files);

        let assets: Vec<Asset> = files
            .iter()
            .filter_map(|path| asset_for_file(path))
            .collect();
        debug!("{} media files of {} under {}", assets.len(), files.len(), self.root.display());
        Ok(assets)
    }
}

/// Recursively gather regular files, in file-name order, skipping hidden entries.
/// Unreadable directories are logged and skipped.
fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("skipping {}: {}", dir.display(), e);
            return;
        }
    };

    let mut entries: Vec<_> = entries.flatten().collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        match entry.file_type() {
            Ok(t) if t.is_dir() => collect_files(&path, files),
            Ok(t) if t.is_file() => files.push(path),
            _ => {}
        }
    }
}

fn asset_for_file(path: &Path) -> Option<Asset> {
    let filename = path.file_name()?.to_string_lossy().into_owned();
    let media_type = MediaType::from_filename(&filename)?;

    // metadata failure means size unknown, not a skipped asset
    let size = fs::metadata(path).ok().map(|m| m.len());

    let found = if media_type == MediaType::Image {
        match File::open(path) {
            Ok(file) => date::extract_creation_date(Some(&mut BufReader::new(file)), &filename),
            Err(_) => date::extract_creation_date::<BufReader<File>>(None, &filename),
        }
    } else {
        date::extract_creation_date::<BufReader<File>>(None, &filename)
    };
    if let Some(ref result) = found {
        trace!("{}: date from {:?}", path.display(), result.source);
    }

    Some(
        Asset::new(path.display().to_string(), media_type, found.map(|r| r.date))
            .with_resource(size),
    )
}
