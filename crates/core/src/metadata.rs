use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Tag name consumed as the capture timestamp.
pub const CAPTURE_TIME_TAG: &str = "DateTime";

/// Literal layout of EXIF date/time values.
pub const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Embedded metadata of a single file, tag name to value.
pub type ExifTags = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRecord {
    /// Path relative to the scanned root.
    pub relative_path: PathBuf,
    pub file_name: String,
    pub capture_time: NaiveDateTime,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureTimeError {
    #[error("no DateTime tag in metadata")]
    Missing,
    #[error("DateTime tag is not in YYYY:MM:DD HH:MM:SS form: {0:?}")]
    Malformed(String),
}

pub fn capture_time(tags: &ExifTags) -> Result<NaiveDateTime, CaptureTimeError> {
    let raw = tags
        .get(CAPTURE_TIME_TAG)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or(CaptureTimeError::Missing)?;

    NaiveDateTime::parse_from_str(raw, EXIF_DATE_FORMAT)
        .map_err(|_| CaptureTimeError::Malformed(raw.to_string()))
}
