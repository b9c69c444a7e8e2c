pub mod exif;
pub mod guess;

use std::io::{BufRead, Seek};

use chrono::{DateTime, Utc};

/// Which extraction method produced a creation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Exif,
    Filename,
}

/// Creation date found for a file, with where it came from.
pub struct DateResult {
    pub date: DateTime<Utc>,
    pub source: DateSource,
}

/// Find a creation date using EXIF first, then the file name.
///
/// Filename datetimes carry no zone; like EXIF ones they are taken as UTC.
pub fn extract_creation_date<R: BufRead + Seek>(
    container: Option<&mut R>,
    filename: &str,
) -> Option<DateResult> {
    if let Some(reader) = container {
        if let Some(date) = exif::read_exif_date(reader) {
            return Some(DateResult {
                date,
                source: DateSource::Exif,
            });
        }
    }

    guess::guess_date_from_filename(filename).map(|date| DateResult {
        date: date.and_utc(),
        source: DateSource::Filename,
    })
}
