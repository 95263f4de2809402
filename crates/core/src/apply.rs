use crate::planner::{RenameCandidate, RenamePlan};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("フォルダ外のリネーム先は適用できません: {name}")]
    TargetOutsideDirectory { name: String },
    #[error("重複したリネーム先が含まれています: {first} / {second} -> {target}")]
    DuplicateTarget {
        first: String,
        second: String,
        target: String,
    },
    #[error("リネーム先が既に存在します: {} -> {}", .from.display(), .to.display())]
    Collision { from: PathBuf, to: PathBuf },
    #[error("リネームに失敗しました: {} -> {}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameOperation {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResult {
    pub applied: usize,
    pub unchanged: usize,
    pub operations: Vec<RenameOperation>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ApplyOptions {
    pub rollback_on_failure: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            rollback_on_failure: true,
        }
    }
}

pub fn apply_plan(plan: &RenamePlan) -> Result<ApplyResult> {
    apply_plan_with_options(plan, &ApplyOptions::default())
}

pub fn apply_plan_with_options(plan: &RenamePlan, options: &ApplyOptions) -> Result<ApplyResult> {
    let candidates: Vec<&RenameCandidate> = plan.candidates.iter().filter(|c| c.changed).collect();
    if candidates.is_empty() {
        return Ok(ApplyResult {
            applied: 0,
            unchanged: plan.candidates.len(),
            operations: Vec::new(),
        });
    }

    validate_apply_candidates(&candidates)?;

    let mut journal = Vec::<RenameOperation>::with_capacity(candidates.len());
    for candidate in &candidates {
        if let Err(err) = rename_no_clobber(&candidate.original_path, &candidate.target_path) {
            let applied = journal.len();
            let apply_err = anyhow::Error::from(err);

            if !options.rollback_on_failure {
                return Err(apply_err.context(format!(
                    "{}件中{}件を適用した時点で中断しました (ロールバックなし)",
                    candidates.len(),
                    applied
                )));
            }

            tracing::warn!(applied, "rename failed midway, rolling back");
            let restored = match rollback_operations(&journal) {
                Ok(restored) => restored,
                Err(rollback_err) => {
                    return Err(apply_err.context(format!(
                        "リネーム失敗後のロールバックにも失敗しました: {rollback_err:#}"
                    )));
                }
            };
            if restored < applied {
                tracing::warn!(applied, restored, "rollback could not restore every rename");
                return Err(apply_err.context(format!(
                    "リネームに失敗しました。ロールバックで復元できたのは{applied}件中{restored}件のみです"
                )));
            }
            return Err(apply_err.context(format!(
                "リネームに失敗したため{restored}件をロールバックしました"
            )));
        }

        tracing::debug!(
            from = %candidate.original_path.display(),
            to = %candidate.target_path.display(),
            "renamed"
        );
        journal.push(RenameOperation {
            from: candidate.original_path.clone(),
            to: candidate.target_path.clone(),
        });
    }

    tracing::info!(
        directory = %plan.directory.display(),
        applied = journal.len(),
        "rename batch applied"
    );

    Ok(ApplyResult {
        applied: journal.len(),
        unchanged: plan.candidates.len().saturating_sub(journal.len()),
        operations: journal,
    })
}

fn validate_apply_candidates(candidates: &[&RenameCandidate]) -> Result<()> {
    let mut seen_targets = HashMap::<&str, &str>::new();

    for candidate in candidates {
        if !is_single_file_name(&candidate.target_name) {
            return Err(ApplyError::TargetOutsideDirectory {
                name: candidate.target_name.clone(),
            }
            .into());
        }

        if let Some(first) = seen_targets.insert(
            candidate.target_name.as_str(),
            candidate.original_name.as_str(),
        ) {
            return Err(ApplyError::DuplicateTarget {
                first: first.to_string(),
                second: candidate.original_name.clone(),
                target: candidate.target_name.clone(),
            }
            .into());
        }
    }

    Ok(())
}

fn is_single_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

fn rename_no_clobber(from: &Path, to: &Path) -> Result<(), ApplyError> {
    if fs::symlink_metadata(to).is_ok() && !is_same_entry(from, to) {
        return Err(ApplyError::Collision {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }

    fs::rename(from, to).map_err(|source| ApplyError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

/// Case-only renames: both names refer to the very same directory entry.
/// Links are never followed, and distinct hard links are not the same entry.
fn is_same_entry(a: &Path, b: &Path) -> bool {
    let (Some(a_name), Some(b_name)) = (a.file_name(), b.file_name()) else {
        return false;
    };
    if a_name.to_string_lossy().to_lowercase() != b_name.to_string_lossy().to_lowercase() {
        return false;
    }
    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a_meta), Ok(b_meta)) => same_file_identity(&a_meta, &b_meta),
        _ => false,
    }
}

#[cfg(unix)]
fn same_file_identity(a: &fs::Metadata, b: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_file_identity(a: &fs::Metadata, b: &fs::Metadata) -> bool {
    a.file_type() == b.file_type() && a.len() == b.len()
}

fn rollback_operations(journal: &[RenameOperation]) -> Result<usize> {
    let mut restored = 0usize;
    for op in journal.iter().rev() {
        if fs::symlink_metadata(&op.to).is_err() {
            continue;
        }
        fs::rename(&op.to, &op.from).with_context(|| {
            format!(
                "ロールバックに失敗しました: {} -> {}",
                op.to.display(),
                op.from.display()
            )
        })?;
        restored += 1;
    }
    Ok(restored)
}
