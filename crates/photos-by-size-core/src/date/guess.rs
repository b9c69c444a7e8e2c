use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

/// Date-stamped naming schemes used by phone cameras and messengers,
/// paired with the chrono format of the captured part.
const PATTERNS: &[(&str, &str)] = &[
    // Screenshot_20190919-053857.jpg
    (r"(?:20|19|18)\d{2}(?:0[1-9]|1[0-2])[0-3]\d-\d{6}", "%Y%m%d-%H%M%S"),
    // IMG_20190509_154733.jpg
    (r"(?:20|19|18)\d{2}(?:0[1-9]|1[0-2])[0-3]\d_\d{6}", "%Y%m%d_%H%M%S"),
    // 2020-10-26-16-38-32.jpg
    (r"(?:20|19|18)\d{2}-(?:0[1-9]|1[0-2])-[0-3]\d-\d{2}-\d{2}-\d{2}", "%Y-%m-%d-%H-%M-%S"),
    // signal-2020-10-26-163832.jpg
    (r"(?:20|19|18)\d{2}-(?:0[1-9]|1[0-2])-[0-3]\d-\d{6}", "%Y-%m-%d-%H%M%S"),
    // MVIMG_20190215193501.MP4 (trailing digits are ignored)
    (r"(?:20|19|18)\d{2}(?:0[1-9]|1[0-2])[0-3]\d{7}", "%Y%m%d%H%M%S"),
    // 2016_01_30_11_49_15.mp4
    (r"(?:20|19|18)\d{2}_(?:0[1-9]|1[0-2])_[0-3]\d_\d{2}_\d{2}_\d{2}", "%Y_%m_%d_%H_%M_%S"),
];

static COMPILED: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    PATTERNS
        .iter()
        .filter_map(|(re, fmt)| Regex::new(re).ok().map(|r| (r, *fmt)))
        .collect()
});

/// Guess a capture datetime from the date stamp embedded in a file name.
pub fn guess_date_from_filename(filename: &str) -> Option<NaiveDateTime> {
    let basename = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    for (regex, format) in COMPILED.iter() {
        let Some(found) = regex.find(basename) else {
            continue;
        };
        // YYYYMMDDhhmmss is 14 chars; the compact pattern may run past it
        let stamp = found.as_str();
        let stamp = if *format == "%Y%m%d%H%M%S" {
            stamp.get(..14).unwrap_or(stamp)
        } else {
            stamp
        };
        if let Ok(dt) = NaiveDateTime::parse_from_str(stamp, format) {
            return Some(dt);
        }
    }

    None
}
