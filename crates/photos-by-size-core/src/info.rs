use chrono::{DateTime, Utc};

use crate::media::{Asset, MediaType};

/// Size recorded when the asset store could not report a byte size.
/// It is summed and sorted like any other size.
pub const UNKNOWN_SIZE: i64 = -1;

/// Normalized per-asset record the report is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Info {
    pub media_type: MediaType,
    pub date: Option<DateTime<Utc>>,
    /// Bytes, or `UNKNOWN_SIZE`
    pub size: i64,
}

impl Info {
    pub fn from_asset(asset: &Asset) -> Self {
        Self {
            media_type: asset.media_type,
            date: asset.creation_date,
            // Sizes past i64::MAX cannot come from a real store; clamp rather than wrap
            size: asset
                .byte_size()
                .map_or(UNKNOWN_SIZE, |s| i64::try_from(s).unwrap_or(i64::MAX)),
        }
    }

    pub fn size_known(&self) -> bool {
        self.size != UNKNOWN_SIZE
    }
}
