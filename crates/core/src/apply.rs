use crate::config::{ExistingTarget, FailurePolicy};
use crate::planner::{MoveCandidate, MovePlan};
use crate::scanner::{ScanStats, SkippedFile};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    pub dry_run: bool,
    pub existing_target: ExistingTarget,
    pub failure_policy: FailurePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAction {
    Moved,
    DryRun,
    Unchanged,
}

#[derive(Debug, Error)]
pub enum MoveError {
    #[error("destination already exists, not moving {} to {}", .origin.display(), .destination.display())]
    DestinationExists {
        origin: PathBuf,
        destination: PathBuf,
    },
    #[error("could not create directory {} to move {} to {}: {source}", .dir.display(), .origin.display(), .destination.display())]
    CreateDir {
        origin: PathBuf,
        destination: PathBuf,
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not move {} to {}: {source}", .origin.display(), .destination.display())]
    Rename {
        origin: PathBuf,
        destination: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum MoveStatus {
    Moved,
    DryRun,
    Unchanged,
    Failed,
    NotAttempted,
}

impl From<MoveAction> for MoveStatus {
    fn from(action: MoveAction) -> Self {
        match action {
            MoveAction::Moved => MoveStatus::Moved,
            MoveAction::DryRun => MoveStatus::DryRun,
            MoveAction::Unchanged => MoveStatus::Unchanged,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MoveOutcome {
    pub origin: PathBuf,
    pub destination: PathBuf,
    pub status: MoveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub moved: usize,
    pub would_move: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
    pub not_attempted: usize,
    pub aborted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub origin_root: PathBuf,
    pub origin_found: bool,
    pub destination_root: PathBuf,
    pub template: String,
    pub dry_run: bool,
    pub outcomes: Vec<MoveOutcome>,
    pub skipped: Vec<SkippedFile>,
    pub scan_stats: ScanStats,
    pub summary: RunSummary,
}

pub fn move_photo(
    candidate: &MoveCandidate,
    options: &ApplyOptions,
) -> Result<MoveAction, MoveError> {
    let origin = &candidate.origin;
    let destination = &candidate.destination;

    if !candidate.changed {
        info!("{} is already in place", origin.display());
        return Ok(MoveAction::Unchanged);
    }

    if options.existing_target == ExistingTarget::Fail && destination.exists() {
        return Err(MoveError::DestinationExists {
            origin: origin.clone(),
            destination: destination.clone(),
        });
    }

    if options.dry_run {
        info!(
            "dry run would move {} to {}",
            origin.display(),
            destination.display()
        );
        return Ok(MoveAction::DryRun);
    }

    if let Some(dir) = destination.parent() {
        fs::create_dir_all(dir).map_err(|source| MoveError::CreateDir {
            origin: origin.clone(),
            destination: destination.clone(),
            dir: dir.to_path_buf(),
            source,
        })?;
    }

    fs::rename(origin, destination).map_err(|source| MoveError::Rename {
        origin: origin.clone(),
        destination: destination.clone(),
        source,
    })?;

    info!("moved {} to {}", origin.display(), destination.display());
    Ok(MoveAction::Moved)
}

pub fn execute_plan(plan: &MovePlan, options: &ApplyOptions) -> RunReport {
    let mut summary = RunSummary {
        skipped: plan.skipped.len(),
        ..RunSummary::default()
    };
    let mut outcomes = Vec::with_capacity(plan.candidates.len());
    let mut pending = plan.candidates.iter();
    // Dry runs leave the tree as is, so in-batch collisions are tracked here.
    let mut claimed = HashSet::<PathBuf>::new();

    for candidate in pending.by_ref() {
        let result = if options.dry_run
            && options.existing_target == ExistingTarget::Fail
            && candidate.changed
            && claimed.contains(&candidate.destination)
        {
            Err(MoveError::DestinationExists {
                origin: candidate.origin.clone(),
                destination: candidate.destination.clone(),
            })
        } else {
            move_photo(candidate, options)
        };
        if let Ok(MoveAction::DryRun) = result {
            claimed.insert(candidate.destination.clone());
        }

        match result {
            Ok(action) => {
                match action {
                    MoveAction::Moved => summary.moved += 1,
                    MoveAction::DryRun => summary.would_move += 1,
                    MoveAction::Unchanged => summary.unchanged += 1,
                }
                outcomes.push(outcome(candidate, action.into(), None));
            }
            Err(err) => {
                error!("{}", err);
                summary.failed += 1;
                outcomes.push(outcome(candidate, MoveStatus::Failed, Some(err.to_string())));
                if options.failure_policy == FailurePolicy::Abort {
                    summary.aborted = true;
                    break;
                }
            }
        }
    }

    for candidate in pending {
        summary.not_attempted += 1;
        outcomes.push(outcome(candidate, MoveStatus::NotAttempted, None));
    }

    RunReport {
        origin_root: plan.origin_root.clone(),
        origin_found: plan.origin_found,
        destination_root: plan.destination_root.clone(),
        template: plan.template.clone(),
        dry_run: options.dry_run,
        outcomes,
        skipped: plan.skipped.clone(),
        scan_stats: plan.scan_stats.clone(),
        summary,
    }
}

fn outcome(candidate: &MoveCandidate, status: MoveStatus, error: Option<String>) -> MoveOutcome {
    MoveOutcome {
        origin: candidate.origin.clone(),
        destination: candidate.destination.clone(),
        status,
        error,
    }
}
