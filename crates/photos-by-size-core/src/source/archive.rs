use std::fs::File;
use std::path::{Path, PathBuf};

use encoding_rs::SHIFT_JIS;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::date::guess;
use crate::gate::{Authorization, AuthorizationReply};
use crate::media::{Asset, MediaType};

use super::AssetSource;

/// Media entries of a zip archive, e.g. a cloud photo export.
///
/// Entries are never decompressed, so creation dates come from file names only.
pub struct ZipSource {
    path: PathBuf,
}

impl ZipSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open_archive(&self) -> anyhow::Result<ZipArchive<File>> {
        let file = File::open(&self.path)?;
        Ok(ZipArchive::new(file)?)
    }
}

/// Decode an entry name: UTF-8, then Shift_JIS (common in Japanese archives), then lossy.
fn decode_entry_name(raw: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(raw) {
        return s.to_string();
    }

    let (decoded, _, had_errors) = SHIFT_JIS.decode(raw);
    if !had_errors {
        return decoded.into_owned();
    }

    String::from_utf8_lossy(raw).into_owned()
}

impl AssetSource for ZipSource {
    fn describe(&self) -> String {
        format!("zip {}", self.path.display())
    }

    fn request_authorization(&self, reply: AuthorizationReply) {
        let status = match self.open_archive() {
            Ok(_) => Authorization::Granted,
            Err(e) => {
                debug!("cannot open {}: {}", self.path.display(), e);
                Authorization::Denied
            }
        };
        reply(status);
    }

    fn list_assets(&self) -> anyhow::Result<Vec<Asset>> {
        let mut archive = match self.open_archive() {
            Ok(archive) => archive,
            Err(e) => {
                warn!("{} is unreadable, listing nothing: {}", self.path.display(), e);
                return Ok(Vec::new());
            }
        };

        let mut assets = Vec::new();
        for i in 0..archive.len() {
            let entry = match archive.by_index_raw(i) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("{}: skipping entry {}: {}", self.path.display(), i, e);
                    continue;
                }
            };
            if entry.is_dir() {
                continue;
            }

            let entry_path = decode_entry_name(entry.name_raw());
            let filename = Path::new(&entry_path)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string();
            if filename.is_empty() {
                continue;
            }

            let Some(media_type) = MediaType::from_filename(&filename) else {
                continue;
            };

            let date = guess::guess_date_from_filename(&filename).map(|d| d.and_utc());
            assets.push(Asset::new(entry_path, media_type, date).with_resource(Some(entry.size())));
        }

        debug!("{} media entries in {}", assets.len(), self.path.display());
        Ok(assets)
    }
}
