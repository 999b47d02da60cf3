//! The `quizforge validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_core::{Problem, TagManagementService};

use super::{collect_json_files, load_draft};
use crate::config::load_config_from;

pub fn execute(problem_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let curator = TagManagementService::new(config.tags);

    let files = collect_json_files(&problem_path)?;
    if files.is_empty() {
        anyhow::bail!("no problem files found in {}", problem_path.display());
    }

    let mut failures = 0;
    for file in &files {
        let outcome = load_draft(file)
            .and_then(|draft| Problem::from_draft(draft, &curator).map_err(Into::into));
        match outcome {
            Ok(problem) => println!(
                "OK    {} ({}: {}, {} tag(s))",
                file.display(),
                problem.problem_type().display_name(),
                problem.content().title(),
                problem.tags().len()
            ),
            Err(e) => {
                failures += 1;
                println!("FAIL  {}: {e:#}", file.display());
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} problem(s) invalid", files.len());
    }
    println!("\nAll {} problem(s) valid.", files.len());
    Ok(())
}
