use crate::exif_reader::read_exif_tags;
use crate::metadata::{capture_time, CaptureTimeError, PhotoRecord};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum SkipReason {
    Unreadable,
    NoCaptureTime,
    MalformedCaptureTime,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub scanned_files: usize,
    pub dated: usize,
    pub skipped_unreadable: usize,
    pub skipped_no_date: usize,
    pub skipped_malformed_date: usize,
}

/// Dated files found under a root, in traversal order.
///
/// Records are keyed by their path relative to the root, so files sharing a
/// basename in different directories are all kept.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub root: PathBuf,
    pub root_found: bool,
    pub records: Vec<PhotoRecord>,
    pub skipped: Vec<SkippedFile>,
    pub stats: ScanStats,
}

impl ScanResult {
    fn empty(root: &Path, root_found: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            root_found,
            records: Vec::new(),
            skipped: Vec::new(),
            stats: ScanStats::default(),
        }
    }

    pub fn get(&self, relative_path: &Path) -> Option<&PhotoRecord> {
        self.records
            .iter()
            .find(|record| record.relative_path == relative_path)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn skip(&mut self, path: &Path, reason: SkipReason) {
        match reason {
            SkipReason::Unreadable => self.stats.skipped_unreadable += 1,
            SkipReason::NoCaptureTime => self.stats.skipped_no_date += 1,
            SkipReason::MalformedCaptureTime => self.stats.skipped_malformed_date += 1,
        }
        self.skipped.push(SkippedFile {
            path: path.to_path_buf(),
            reason,
        });
    }
}

pub fn scan_photos(root: &Path) -> ScanResult {
    if !root.is_dir() {
        if root.exists() {
            warn!("path {} is not a directory", root.display());
        } else {
            warn!("path {} does not exist", root.display());
        }
        return ScanResult::empty(root, false);
    }

    let mut result = ScanResult::empty(root, true);

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("could not read directory entry under {}: {}", root.display(), err);
                continue;
            }
        };
        let path = entry.path();
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            if path.is_dir() {
                debug!("not following directory link {}", path.display());
                continue;
            }
        } else if !file_type.is_file() {
            continue;
        }
        result.stats.scanned_files += 1;

        let tags = match read_exif_tags(path) {
            Ok(tags) => tags,
            Err(err) => {
                warn!("error reading EXIF data from {}: {:#}", path.display(), err);
                result.skip(path, SkipReason::Unreadable);
                continue;
            }
        };

        let time = match capture_time(&tags) {
            Ok(time) => time,
            Err(CaptureTimeError::Missing) => {
                warn!("no date found in EXIF data for {}, skipping it", path.display());
                result.skip(path, SkipReason::NoCaptureTime);
                continue;
            }
            Err(err @ CaptureTimeError::Malformed(_)) => {
                warn!("{} in {}, skipping it", err, path.display());
                result.skip(path, SkipReason::MalformedCaptureTime);
                continue;
            }
        };

        let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        result.stats.dated += 1;
        result.records.push(PhotoRecord {
            relative_path,
            file_name: entry.file_name().to_string_lossy().to_string(),
            capture_time: time,
        });
    }

    result
}
