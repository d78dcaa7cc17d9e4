use std::path::{Path, PathBuf};

pub const DEFAULT_TEMPLATE: &str = "%Y/%m/%d/%original_filename";

/// What to do when a file already sits at the computed destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingTarget {
    #[default]
    Fail,
    Overwrite,
}

/// Whether a failed move stops the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Continue,
    Abort,
}

/// Everything a single sorting run needs. Built once at start-up.
#[derive(Debug, Clone)]
pub struct SortOptions {
    pub origin: PathBuf,
    pub destination: PathBuf,
    pub template: String,
    pub dry_run: bool,
    pub existing_target: ExistingTarget,
    pub failure_policy: FailurePolicy,
}

impl SortOptions {
    /// Options that sort `origin` in place with the default template.
    pub fn new(origin: impl Into<PathBuf>) -> Self {
        let origin = origin.into();
        Self {
            destination: origin.clone(),
            origin,
            template: DEFAULT_TEMPLATE.to_string(),
            dry_run: false,
            existing_target: ExistingTarget::default(),
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_destination(mut self, destination: Option<impl AsRef<Path>>) -> Self {
        if let Some(destination) = destination {
            self.destination = destination.as_ref().to_path_buf();
        }
        self
    }
}
