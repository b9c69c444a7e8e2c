pub mod archive;
pub mod catalog;
pub mod directory;

#[cfg(test)]
pub(crate) mod memory;

use std::path::Path;

use anyhow::bail;

use crate::gate::AuthorizationReply;
use crate::media::Asset;

pub use archive::ZipSource;
pub use catalog::CatalogSource;
pub use directory::DirectorySource;

/// Anything that can enumerate media assets.
pub trait AssetSource {
    /// Human-readable name for logs and errors.
    fn describe(&self) -> String;

    /// Ask for read access. `reply` must be called at most once, from any thread.
    fn request_authorization(&self, reply: AuthorizationReply);

    /// Every asset the source holds, in whatever order it stores them.
    fn list_assets(&self) -> anyhow::Result<Vec<Asset>>;
}

/// Order by creation date ascending. Stable; undated assets come first.
pub fn sort_by_creation_date(assets: &mut [Asset]) {
    assets.sort_by_key(|a| a.creation_date);
}

/// Pick a source for `path`: a directory, a `.zip` archive or a `.json` catalog.
pub fn open(path: &Path) -> anyhow::Result<Box<dyn AssetSource>> {
    if path.is_dir() {
        return Ok(Box::new(DirectorySource::new(path)));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "zip" => Ok(Box::new(ZipSource::new(path))),
        "json" => Ok(Box::new(CatalogSource::open(path)?)),
        _ => bail!(
            "{}: expected a directory, a .zip archive or a .json catalog",
            path.display()
        ),
    }
}
