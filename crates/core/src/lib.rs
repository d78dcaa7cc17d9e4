mod apply;
mod config;
mod exif_reader;
mod metadata;
mod planner;
mod scanner;
mod template;

#[cfg(test)]
mod test_support;

pub use apply::{
    execute_plan, move_photo, ApplyOptions, MoveAction, MoveError, MoveOutcome, MoveStatus,
    RunReport, RunSummary,
};
pub use config::{ExistingTarget, FailurePolicy, SortOptions, DEFAULT_TEMPLATE};
pub use exif_reader::read_exif_tags;
pub use metadata::{capture_time, CaptureTimeError, ExifTags, PhotoRecord, CAPTURE_TIME_TAG};
pub use planner::{plan_moves, MoveCandidate, MovePlan};
pub use scanner::{scan_photos, ScanResult, ScanStats, SkipReason, SkippedFile};
pub use template::{PathTemplate, TemplateError, TemplatePart, FILENAME_PLACEHOLDER};

use tracing::info;

/// Scans `options.origin`, plans every dated file and moves (or reports) it.
///
/// Only an unusable template fails the run; per-file problems end up in the report.
pub fn sort_photos(options: &SortOptions) -> Result<RunReport, TemplateError> {
    let template = PathTemplate::parse(&options.template)?;
    let scan = scan_photos(&options.origin);
    info!(
        origin = %options.origin.display(),
        dated = scan.stats.dated,
        scanned = scan.stats.scanned_files,
        "scan finished"
    );

    let plan = plan_moves(&scan, &template, &options.destination)?;
    let apply_options = ApplyOptions {
        dry_run: options.dry_run,
        existing_target: options.existing_target,
        failure_policy: options.failure_policy,
    };
    Ok(execute_plan(&plan, &apply_options))
}

#[cfg(test)]
mod tests {
    use super::{sort_photos, MoveStatus, RunSummary, SortOptions, TemplateError, DEFAULT_TEMPLATE};
    use crate::test_support::{write_jfif_without_exif, write_jpeg_photo, write_photo};
    use std::path::Path;
    use tempfile::tempdir;

    fn collect_files(root: &Path) -> Vec<String> {
        let mut files: Vec<String> = walkdir::WalkDir::new(root)
            .into_iter()
            .flatten()
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(root)
                    .expect("under root")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        files.sort();
        files
    }

    #[test]
    fn sorts_tree_in_place_by_capture_date() {
        let temp = tempdir().expect("tempdir");
        write_photo(&temp.path().join("img.tif"), Some("2023:07:04 10:15:00"));
        write_photo(
            &temp.path().join("card").join("DSC_1.tif"),
            Some("2019:12:31 23:59:59"),
        );
        write_photo(&temp.path().join("undated.tif"), None);

        let report = sort_photos(&SortOptions::new(temp.path())).expect("run should succeed");
        assert_eq!(report.summary.moved, 2);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(
            collect_files(temp.path()),
            vec![
                "2019/12/31/DSC_1.tif".to_string(),
                "2023/07/04/img.tif".to_string(),
                "undated.tif".to_string(),
            ]
        );
    }

    #[test]
    fn moves_into_separate_destination() {
        let temp = tempdir().expect("tempdir");
        let origin = temp.path().join("in");
        let destination = temp.path().join("out");
        write_photo(&origin.join("img.tif"), Some("2023:07:04 10:15:00"));

        let options = SortOptions {
            template: "%Y/%m/original_filename".to_string(),
            ..SortOptions::new(&origin).with_destination(Some(&destination))
        };
        let report = sort_photos(&options).expect("run should succeed");
        assert_eq!(report.summary.moved, 1);
        assert!(destination.join("2023").join("07").join("img.tif").exists());
        assert!(!origin.join("img.tif").exists());
    }

    #[test]
    fn dry_run_leaves_tree_untouched() {
        let temp = tempdir().expect("tempdir");
        write_photo(&temp.path().join("img.tif"), Some("2023:07:04 10:15:00"));
        write_photo(&temp.path().join("a").join("b.tif"), Some("2022:01:01 00:00:00"));
        let before = collect_files(temp.path());

        let options = SortOptions {
            dry_run: true,
            ..SortOptions::new(temp.path())
        };
        let report = sort_photos(&options).expect("run should succeed");
        assert!(report.dry_run);
        assert_eq!(report.summary.would_move, 2);
        assert_eq!(report.summary.moved, 0);
        assert!(report.outcomes.iter().all(|o| o.status == MoveStatus::DryRun));
        assert_eq!(collect_files(temp.path()), before);
        assert!(!temp.path().join("2023").exists());
    }

    #[test]
    fn rerun_over_sorted_tree_is_a_fixed_point() {
        let temp = tempdir().expect("tempdir");
        write_photo(&temp.path().join("img.tif"), Some("2023:07:04 10:15:00"));
        write_photo(&temp.path().join("x").join("y.tif"), Some("2020:02:29 12:00:00"));

        sort_photos(&SortOptions::new(temp.path())).expect("first run");
        let sorted = collect_files(temp.path());

        let report = sort_photos(&SortOptions::new(temp.path())).expect("second run");
        assert_eq!(report.summary.unchanged, 2);
        assert_eq!(report.summary.moved, 0);
        assert_eq!(report.summary.failed, 0);
        assert_eq!(collect_files(temp.path()), sorted);
    }

    #[test]
    fn shared_basename_collision_is_reported_not_lost() {
        let temp = tempdir().expect("tempdir");
        write_photo(&temp.path().join("a").join("img.tif"), Some("2023:07:04 10:15:00"));
        write_photo(&temp.path().join("b").join("img.tif"), Some("2023:07:04 18:00:00"));

        let report = sort_photos(&SortOptions::new(temp.path())).expect("run should succeed");
        assert_eq!(report.summary.moved, 1);
        assert_eq!(report.summary.failed, 1);
        assert!(temp.path().join("2023/07/04/img.tif").exists());
        assert!(temp.path().join("b").join("img.tif").exists());
    }

    #[test]
    fn missing_origin_is_an_empty_successful_run() {
        let temp = tempdir().expect("tempdir");
        let report = sort_photos(&SortOptions::new(temp.path().join("missing")))
            .expect("missing root is not fatal");
        assert!(!report.origin_found);
        assert!(report.outcomes.is_empty());
        assert_eq!(report.summary, RunSummary::default());
    }

    #[test]
    fn json_report_lists_skipped_files_and_scan_stats() {
        let temp = tempdir().expect("tempdir");
        write_photo(&temp.path().join("img.tif"), Some("2023:07:04 10:15:00"));
        write_photo(&temp.path().join("undated.tif"), None);

        let options = SortOptions {
            dry_run: true,
            ..SortOptions::new(temp.path())
        };
        let report = sort_photos(&options).expect("run should succeed");
        let json = serde_json::to_value(&report).expect("report serializes");

        assert_eq!(json["origin_found"], true);
        assert_eq!(json["template"], DEFAULT_TEMPLATE);
        assert_eq!(json["scan_stats"]["scanned_files"], 2);
        assert_eq!(json["scan_stats"]["skipped_no_date"], 1);
        let skipped = json["skipped"].as_array().expect("skipped list");
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0]["reason"], "NoCaptureTime");
        assert!(skipped[0]["path"]
            .as_str()
            .expect("path string")
            .ends_with("undated.tif"));
        assert_eq!(json["outcomes"][0]["status"], "DryRun");
    }

    #[test]
    fn sorts_jpeg_files() {
        let temp = tempdir().expect("tempdir");
        write_jpeg_photo(&temp.path().join("DSC_0001.JPG"), Some("2022:12:24 18:30:05"));
        write_jfif_without_exif(&temp.path().join("plain.jpg"));

        let report = sort_photos(&SortOptions::new(temp.path())).expect("run should succeed");
        assert_eq!(report.summary.moved, 1);
        assert_eq!(report.scan_stats.skipped_no_date, 1);
        assert!(temp.path().join("2022/12/24/DSC_0001.JPG").exists());
        assert!(temp.path().join("plain.jpg").exists());
    }

    #[test]
    fn invalid_template_fails_before_touching_files() {
        let temp = tempdir().expect("tempdir");
        write_photo(&temp.path().join("img.tif"), Some("2023:07:04 10:15:00"));

        let options = SortOptions {
            template: "%Q/%original_filename".to_string(),
            ..SortOptions::new(temp.path())
        };
        let err = sort_photos(&options).expect_err("template must be rejected");
        assert!(matches!(err, TemplateError::InvalidDirective(_)));
        assert!(temp.path().join("img.tif").exists());
    }
}
