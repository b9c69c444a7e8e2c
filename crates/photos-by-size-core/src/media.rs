use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of media an asset holds.
///
/// `Missing` is the catch-all for raw values the store reports that are not
/// one of the known kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Audio,
    Video,
    Unknown,
    Missing,
}

impl MediaType {
    /// Map an asset-store raw value (0 unknown, 1 image, 2 video, 3 audio).
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            0 => MediaType::Unknown,
            1 => MediaType::Image,
            2 => MediaType::Video,
            3 => MediaType::Audio,
            _ => MediaType::Missing,
        }
    }

    /// Map a type name as written in a catalog. Unrecognized names are `Missing`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "image" => MediaType::Image,
            "audio" => MediaType::Audio,
            "video" => MediaType::Video,
            "unknown" => MediaType::Unknown,
            _ => MediaType::Missing,
        }
    }

    /// Classify a file by its name, using the guessed MIME type.
    /// Returns None for files that are not media at all.
    pub fn from_filename(filename: &str) -> Option<Self> {
        // AVCHD streams are not in the mime table
        if filename.to_lowercase().ends_with(".mts") {
            return Some(MediaType::Video);
        }
        let mime = mime_guess::from_path(filename).first()?;
        let top = mime.type_();
        if top == mime_guess::mime::IMAGE {
            Some(MediaType::Image)
        } else if top == mime_guess::mime::VIDEO {
            Some(MediaType::Video)
        } else if top == mime_guess::mime::AUDIO {
            Some(MediaType::Audio)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Audio => "audio",
            MediaType::Video => "video",
            MediaType::Unknown => "unknown",
            MediaType::Missing => "missing",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One stored file backing an asset (original, edited render, paired video...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetResource {
    /// Size in bytes, None if the store could not report it
    pub file_size: Option<u64>,
}

/// A media item as enumerated by an asset source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Where the asset came from (path, zip entry or catalog id), for logging
    pub origin: String,
    pub media_type: MediaType,
    pub creation_date: Option<DateTime<Utc>>,
    /// Backing resources in store order
    pub resources: Vec<AssetResource>,
}

impl Asset {
    pub fn new(origin: String, media_type: MediaType, creation_date: Option<DateTime<Utc>>) -> Self {
        Self {
            origin,
            media_type,
            creation_date,
            resources: Vec::new(),
        }
    }

    pub fn with_resource(mut self, file_size: Option<u64>) -> Self {
        self.resources.push(AssetResource { file_size });
        self
    }

    /// Byte size of the first resource. Never an aggregate over resources.
    pub fn byte_size(&self) -> Option<u64> {
        self.resources.first().and_then(|r| r.file_size)
    }
}
