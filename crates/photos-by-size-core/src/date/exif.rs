use std::io::{BufRead, Seek};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use exif::{In, Reader, Tag};

/// Capture-time tags, most specific first.
const DATE_TAGS: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Read the capture time from EXIF in an image container, taken as UTC.
pub fn read_exif_date<R: BufRead + Seek>(reader: &mut R) -> Option<DateTime<Utc>> {
    let exif = Reader::new().read_from_container(reader).ok()?;

    DATE_TAGS.iter().find_map(|tag| {
        let field = exif.get_field(*tag, In::PRIMARY)?;
        parse_exif_datetime(&field.display_value().to_string())
    })
}

/// `YYYY:MM:DD HH:MM:SS`, with any of `-/\.` accepted between date parts.
/// A missing or unreadable time part falls back to midnight.
fn parse_exif_datetime(s: &str) -> Option<DateTime<Utc>> {
    let (day_part, time_part) = s.trim().split_once(' ').unwrap_or((s.trim(), ""));

    let mut fields = day_part.split(|c: char| ":-/\\.".contains(c));
    let year = fields.next()?.parse().ok()?;
    let month = fields.next()?.parse().ok()?;
    let day = fields.next()?.parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let time = NaiveTime::parse_from_str(time_part.trim(), "%H:%M:%S").unwrap_or(NaiveTime::MIN);
    Some(date.and_time(time).and_utc())
}
