use crate::scanner::{ScanResult, ScanStats, SkippedFile};
use crate::template::{PathTemplate, TemplateError};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCandidate {
    pub origin: PathBuf,
    pub destination: PathBuf,
    pub capture_time: NaiveDateTime,
    /// False when the file already sits where the template puts it.
    pub changed: bool,
}

#[derive(Debug, Clone)]
pub struct MovePlan {
    pub origin_root: PathBuf,
    pub origin_found: bool,
    pub destination_root: PathBuf,
    pub template: String,
    pub candidates: Vec<MoveCandidate>,
    pub skipped: Vec<SkippedFile>,
    pub scan_stats: ScanStats,
}

pub fn plan_moves(
    scan: &ScanResult,
    template: &PathTemplate,
    destination_root: &Path,
) -> Result<MovePlan, TemplateError> {
    let mut candidates = Vec::with_capacity(scan.records.len());
    for record in &scan.records {
        let origin = scan.root.join(&record.relative_path);
        let destination =
            destination_root.join(template.render(&record.capture_time, &record.file_name)?);
        let changed = origin != destination;
        candidates.push(MoveCandidate {
            origin,
            destination,
            capture_time: record.capture_time,
            changed,
        });
    }

    Ok(MovePlan {
        origin_root: scan.root.clone(),
        origin_found: scan.root_found,
        destination_root: destination_root.to_path_buf(),
        template: template.as_str().to_string(),
        candidates,
        skipped: scan.skipped.clone(),
        scan_stats: scan.stats.clone(),
    })
}
