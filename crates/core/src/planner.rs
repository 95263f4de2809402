use crate::naming::{is_candidate_name, target_name_for};
use crate::rule::RenameRule;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameCandidate {
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub original_name: String,
    pub target_name: String,
    pub counter: usize,
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RenameStats {
    pub scanned_entries: usize,
    pub skipped_directories: usize,
    pub skipped_extension: usize,
    pub skipped_non_utf8: usize,
    pub planned: usize,
    pub unchanged: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub directory: PathBuf,
    pub rule: RenameRule,
    pub candidates: Vec<RenameCandidate>,
    pub stats: RenameStats,
}

pub fn generate_plan(rule: &RenameRule) -> Result<RenamePlan> {
    let mut stats = RenameStats::default();
    let names = collect_candidate_names(
        &rule.directory,
        &rule.original_extension,
        rule.include_directories,
        &mut stats,
    )?;

    let targets = compute_target_names(&names, rule);
    let mut candidates = Vec::with_capacity(names.len());
    for (index, (original_name, target_name)) in names.into_iter().zip(targets).enumerate() {
        let changed = original_name != target_name;
        if !changed {
            stats.unchanged += 1;
        }
        stats.planned += 1;

        candidates.push(RenameCandidate {
            original_path: rule.directory.join(&original_name),
            target_path: rule.directory.join(&target_name),
            original_name,
            target_name,
            counter: index + 1,
            changed,
        });
    }

    tracing::debug!(
        directory = %rule.directory.display(),
        planned = stats.planned,
        unchanged = stats.unchanged,
        "rename plan generated"
    );

    Ok(RenamePlan {
        directory: rule.directory.clone(),
        rule: rule.clone(),
        candidates,
        stats,
    })
}

/// New names for `names` in the given order; counters start at 1.
pub fn compute_target_names(names: &[String], rule: &RenameRule) -> Vec<String> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            target_name_for(
                name,
                index + 1,
                &rule.new_name,
                rule.digits,
                &rule.new_extension,
                rule.name_slice,
            )
        })
        .collect()
}

fn collect_candidate_names(
    root: &Path,
    original_extension: &str,
    include_directories: bool,
    stats: &mut RenameStats,
) -> Result<Vec<String>> {
    let mut out = Vec::new();

    for entry in fs::read_dir(root)
        .with_context(|| format!("フォルダを読めませんでした: {}", root.display()))?
    {
        let entry = entry.with_context(|| format!("エントリ読み取り失敗: {}", root.display()))?;
        stats.scanned_entries += 1;

        let path = entry.path();
        if path.is_dir() && !include_directories {
            stats.skipped_directories += 1;
            continue;
        }

        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!(path = %path.display(), "skipping entry with non UTF-8 name");
            stats.skipped_non_utf8 += 1;
            continue;
        };

        if is_candidate_name(&name, original_extension) {
            out.push(name);
        } else {
            stats.skipped_extension += 1;
        }
    }
    out.sort();

    Ok(out)
}
