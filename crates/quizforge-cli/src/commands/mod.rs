//! Subcommand implementations. Each exposes `execute(...) -> Result<()>`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quizforge_core::{ProblemDraft, Submission};

pub mod capabilities;
pub mod grade;
pub mod init;
pub mod tags;
pub mod validate;

/// Read and parse a problem draft file.
pub fn load_draft(path: &Path) -> Result<ProblemDraft> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read problem: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse problem: {}", path.display()))
}

/// Read and parse a submission file.
pub fn load_submission(path: &Path) -> Result<Submission> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read submission: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse submission: {}", path.display()))
}

/// `.json` files under `path`, recursing into directories, sorted by path.
pub fn collect_json_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        if !path.exists() {
            anyhow::bail!("no such file or directory: {}", path.display());
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("failed to read directory: {}", path.display()))?
    {
        let entry = entry?;
        let child = entry.path();
        if child.is_dir() {
            files.extend(collect_json_files(&child)?);
        } else if child.extension().is_some_and(|ext| ext == "json") {
            files.push(child);
        }
    }
    files.sort();
    Ok(files)
}
