//! Which variants can be graded automatically, and how.

use serde::Serialize;

use crate::kind::ProblemType;

/// Only long answers need a person to grade them.
pub fn requires_manual_grading(kind: ProblemType) -> bool {
    matches!(kind, ProblemType::LongAnswer)
}

pub fn supports_auto_grading(kind: ProblemType) -> bool {
    !requires_manual_grading(kind)
}

pub fn supports_partial_scoring(kind: ProblemType) -> bool {
    matches!(
        kind,
        ProblemType::Matching | ProblemType::FillBlank | ProblemType::Ordering
    )
}

pub fn supports_immediate_feedback(kind: ProblemType) -> bool {
    supports_auto_grading(kind)
}

/// Fewest options a problem of this kind may offer, where that applies.
pub fn minimum_choices(kind: ProblemType) -> Option<usize> {
    match kind {
        ProblemType::MultipleChoice | ProblemType::TrueFalse | ProblemType::Matching => Some(2),
        ProblemType::ShortAnswer
        | ProblemType::LongAnswer
        | ProblemType::FillBlank
        | ProblemType::Ordering => None,
    }
}

/// Suggested number of options for authoring tools.
pub fn recommended_choices(kind: ProblemType) -> Option<usize> {
    match kind {
        ProblemType::MultipleChoice | ProblemType::Matching => Some(4),
        ProblemType::TrueFalse => Some(2),
        ProblemType::ShortAnswer
        | ProblemType::LongAnswer
        | ProblemType::FillBlank
        | ProblemType::Ordering => None,
    }
}

pub fn recommends_time_limit(kind: ProblemType) -> bool {
    matches!(kind, ProblemType::LongAnswer)
}

/// Every capability of one variant in a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingCapabilities {
    pub problem_type: ProblemType,
    pub requires_manual_grading: bool,
    pub supports_auto_grading: bool,
    pub supports_partial_scoring: bool,
    pub supports_immediate_feedback: bool,
    pub minimum_choices: Option<usize>,
    pub recommended_choices: Option<usize>,
    pub recommends_time_limit: bool,
}

pub fn capabilities(kind: ProblemType) -> GradingCapabilities {
    GradingCapabilities {
        problem_type: kind,
        requires_manual_grading: requires_manual_grading(kind),
        supports_auto_grading: supports_auto_grading(kind),
        supports_partial_scoring: supports_partial_scoring(kind),
        supports_immediate_feedback: supports_immediate_feedback(kind),
        minimum_choices: minimum_choices(kind),
        recommended_choices: recommended_choices(kind),
        recommends_time_limit: recommends_time_limit(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_long_answer_is_manual() {
        for kind in ProblemType::ALL {
            let manual = kind == ProblemType::LongAnswer;
            assert_eq!(requires_manual_grading(kind), manual, "{kind}");
            assert_eq!(supports_auto_grading(kind), !manual, "{kind}");
            assert_eq!(supports_immediate_feedback(kind), !manual, "{kind}");
            assert_eq!(recommends_time_limit(kind), manual, "{kind}");
        }
    }

    #[test]
    fn partial_scoring_variants() {
        let partial: Vec<ProblemType> = ProblemType::ALL
            .into_iter()
            .filter(|k| supports_partial_scoring(*k))
            .collect();
        assert_eq!(
            partial,
            vec![
                ProblemType::Matching,
                ProblemType::FillBlank,
                ProblemType::Ordering
            ]
        );
    }

    #[test]
    fn choice_counts() {
        assert_eq!(minimum_choices(ProblemType::MultipleChoice), Some(2));
        assert_eq!(recommended_choices(ProblemType::MultipleChoice), Some(4));
        assert_eq!(minimum_choices(ProblemType::TrueFalse), Some(2));
        assert_eq!(recommended_choices(ProblemType::TrueFalse), Some(2));
        assert_eq!(minimum_choices(ProblemType::Matching), Some(2));
        assert_eq!(recommended_choices(ProblemType::Matching), Some(4));
        assert_eq!(minimum_choices(ProblemType::Ordering), None);
        assert_eq!(recommended_choices(ProblemType::ShortAnswer), None);
    }

    #[test]
    fn capabilities_bundle_matches_functions() {
        let caps = capabilities(ProblemType::FillBlank);
        assert!(caps.supports_partial_scoring);
        assert!(caps.supports_auto_grading);
        assert_eq!(caps.minimum_choices, None);
    }
}
