//! The `quizforge capabilities` command.

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizforge_core::grading_policy::capabilities;
use quizforge_core::scoring::partial_credit_defaults;
use quizforge_core::ProblemType;

pub fn execute(problem_type: Option<String>) -> Result<()> {
    let kinds: Vec<ProblemType> = match problem_type {
        Some(name) => vec![name
            .parse::<ProblemType>()
            .with_context(|| format!("unknown problem type: {name}"))?],
        None => ProblemType::ALL.to_vec(),
    };

    let mut table = Table::new();
    table.set_header(vec![
        "Type",
        "Auto",
        "Manual",
        "Partial",
        "Min threshold",
        "Min choices",
        "Recommended",
        "Time limit",
    ]);

    let yes_no = |b: bool| if b { "yes" } else { "no" };
    let count = |n: Option<usize>| n.map_or_else(|| "-".to_string(), |n| n.to_string());

    for kind in kinds {
        let caps = capabilities(kind);
        let threshold = partial_credit_defaults(kind)
            .minimum_threshold()
            .map_or_else(|| "-".to_string(), |t| format!("{:.0}%", t * 100.0));
        table.add_row(vec![
            Cell::new(kind.as_str()),
            Cell::new(yes_no(caps.supports_auto_grading)),
            Cell::new(yes_no(caps.requires_manual_grading)),
            Cell::new(yes_no(caps.supports_partial_scoring)),
            Cell::new(threshold),
            Cell::new(count(caps.minimum_choices)),
            Cell::new(count(caps.recommended_choices)),
            Cell::new(yes_no(caps.recommends_time_limit)),
        ]);
    }

    println!("{table}");
    Ok(())
}
