//! The `quizforge grade` command.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use quizforge_core::grading::KeywordSuggestion;
use quizforge_core::{AnswerGradingService, GradingResult, Problem, TagManagementService};

use super::{load_draft, load_submission};
use crate::config::load_config_from;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GradeOutput<'a> {
    #[serde(flatten)]
    result: &'a GradingResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword_suggestion: Option<&'a KeywordSuggestion>,
}

pub fn execute(
    problem_path: PathBuf,
    submission_path: PathBuf,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let curator = TagManagementService::new(config.tags);
    let service = AnswerGradingService::new(config.grading);

    let problem = Problem::from_draft(load_draft(&problem_path)?, &curator)?;
    let submission = load_submission(&submission_path)?;

    let result = problem.grade(&submission, &service);
    let suggestion = if result.requires_manual_grading {
        submission
            .data
            .as_str()
            .and_then(|text| service.keyword_score(text, problem.correct_answer()))
    } else {
        None
    };

    match format.as_str() {
        "json" => {
            let output = GradeOutput {
                result: &result,
                keyword_suggestion: suggestion.as_ref(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => print_text(&problem, &result, suggestion.as_ref()),
    }

    Ok(())
}

fn print_text(problem: &Problem, result: &GradingResult, suggestion: Option<&KeywordSuggestion>) {
    println!(
        "Problem: {} ({})",
        problem.content().title(),
        problem.problem_type().display_name()
    );
    println!("Score: {}/{}", result.score, result.max_score);
    println!("Correct: {}", if result.is_correct { "yes" } else { "no" });
    if let Some(credit) = &result.partial_credit {
        println!(
            "Matched: {}/{} ({:.1}%)",
            credit.correct_count, credit.total_count, credit.percentage
        );
    }
    if let Some(feedback) = &result.feedback {
        println!("Feedback: {feedback}");
    }
    if let Some(s) = suggestion {
        println!(
            "Suggested score: {} ({}/{} keywords: {})",
            s.suggested_score,
            s.matched_keywords.len(),
            s.total_keywords,
            s.matched_keywords.join(", ")
        );
    }
    if let Some(explanation) = problem.correct_answer().explanation() {
        println!("Explanation: {explanation}");
    }
}
