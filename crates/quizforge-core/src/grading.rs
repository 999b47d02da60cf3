//! Grading a learner's submission against a stored answer key.
//!
//! Grading always yields a [`GradingResult`]. Unknown types, type
//! mismatches and malformed payloads become zero-score results with
//! feedback rather than errors.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::answer::{
    AnswerContent, AnswerKey, FillBlankAnswer, LongAnswerAnswer, MatchPair, MatchingAnswer,
    MultipleChoiceAnswer, OrderingAnswer, ShortAnswerAnswer,
};
use crate::config::GradingConfig;
use crate::kind::ProblemType;
use crate::scoring::{
    partial_credit_defaults, PartialScoringOptions, PartialScoringStrategy, RoundingStrategy,
};
use crate::validation::{normalize_default, normalize_text, strip_diacritics, NormalizeOptions};

/// A learner's raw submission.
///
/// `data` is kept as JSON so that malformed shapes can still be graded
/// (to zero) instead of failing at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(rename = "type")]
    pub answer_type: String,
    #[serde(default)]
    pub data: Value,
}

/// Typed submission payloads, one per variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SubmittedAnswer {
    /// Selected choice ids.
    MultipleChoice(Vec<String>),
    ShortAnswer(String),
    LongAnswer(String),
    TrueFalse(bool),
    Matching(Vec<MatchPair>),
    /// Blank id to the text entered for it.
    FillBlank(BTreeMap<String, String>),
    /// Item ids in the submitted order.
    Ordering(Vec<String>),
}

impl SubmittedAnswer {
    pub fn problem_type(&self) -> ProblemType {
        match self {
            SubmittedAnswer::MultipleChoice(_) => ProblemType::MultipleChoice,
            SubmittedAnswer::ShortAnswer(_) => ProblemType::ShortAnswer,
            SubmittedAnswer::LongAnswer(_) => ProblemType::LongAnswer,
            SubmittedAnswer::TrueFalse(_) => ProblemType::TrueFalse,
            SubmittedAnswer::Matching(_) => ProblemType::Matching,
            SubmittedAnswer::FillBlank(_) => ProblemType::FillBlank,
            SubmittedAnswer::Ordering(_) => ProblemType::Ordering,
        }
    }
}

impl From<SubmittedAnswer> for Submission {
    fn from(answer: SubmittedAnswer) -> Self {
        let answer_type = answer.problem_type().as_str().to_string();
        let data = match answer {
            SubmittedAnswer::MultipleChoice(ids) | SubmittedAnswer::Ordering(ids) => {
                Value::from(ids)
            }
            SubmittedAnswer::ShortAnswer(text) | SubmittedAnswer::LongAnswer(text) => {
                Value::from(text)
            }
            SubmittedAnswer::TrueFalse(value) => Value::from(value),
            SubmittedAnswer::Matching(pairs) => serde_json::json!(pairs),
            SubmittedAnswer::FillBlank(blanks) => serde_json::json!(blanks),
        };
        Self { answer_type, data }
    }
}

impl Submission {
    pub fn new(answer_type: impl Into<String>, data: Value) -> Self {
        Self {
            answer_type: answer_type.into(),
            data,
        }
    }

    /// Read `data` as the payload of `kind`.
    ///
    /// A single string is accepted where a list of choice ids is expected,
    /// and matching answers may be given as a `{left: right}` object.
    pub fn parse(&self, kind: ProblemType) -> Option<SubmittedAnswer> {
        let data = &self.data;
        match kind {
            ProblemType::MultipleChoice => match data {
                Value::String(id) => Some(SubmittedAnswer::MultipleChoice(vec![id.clone()])),
                _ => string_list(data).map(SubmittedAnswer::MultipleChoice),
            },
            ProblemType::ShortAnswer => data.as_str().map(|s| SubmittedAnswer::ShortAnswer(s.into())),
            ProblemType::LongAnswer => data.as_str().map(|s| SubmittedAnswer::LongAnswer(s.into())),
            ProblemType::TrueFalse => data.as_bool().map(SubmittedAnswer::TrueFalse),
            ProblemType::Matching => match data {
                Value::Object(map) => map
                    .iter()
                    .map(|(left, right)| right.as_str().map(|r| MatchPair::new(left.clone(), r)))
                    .collect::<Option<Vec<_>>>()
                    .map(SubmittedAnswer::Matching),
                _ => serde_json::from_value(data.clone())
                    .ok()
                    .map(SubmittedAnswer::Matching),
            },
            ProblemType::FillBlank => serde_json::from_value(data.clone())
                .ok()
                .map(SubmittedAnswer::FillBlank),
            ProblemType::Ordering => string_list(data).map(SubmittedAnswer::Ordering),
        }
    }
}

fn string_list(data: &Value) -> Option<Vec<String>> {
    data.as_array()?
        .iter()
        .map(|v| v.as_str().map(String::from))
        .collect()
}

/// Counts behind a partial score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialCredit {
    pub correct_count: usize,
    pub total_count: usize,
    pub percentage: f64,
}

impl PartialCredit {
    pub fn new(correct_count: usize, total_count: usize) -> Self {
        let percentage = if total_count == 0 {
            0.0
        } else {
            correct_count as f64 / total_count as f64 * 100.0
        };
        Self {
            correct_count,
            total_count,
            percentage,
        }
    }
}

/// Outcome of grading one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingResult {
    pub is_correct: bool,
    pub score: f64,
    pub max_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_credit: Option<PartialCredit>,
    #[serde(default)]
    pub requires_manual_grading: bool,
}

impl GradingResult {
    /// Zero score with an explanation.
    pub fn failure(max_score: f64, feedback: impl Into<String>) -> Self {
        Self {
            is_correct: false,
            score: 0.0,
            max_score,
            feedback: Some(feedback.into()),
            partial_credit: None,
            requires_manual_grading: false,
        }
    }

    fn all_or_nothing(is_correct: bool, max_score: f64) -> Self {
        Self {
            is_correct,
            score: if is_correct { max_score } else { 0.0 },
            max_score,
            feedback: Some(if is_correct { "Correct" } else { "Incorrect" }.to_string()),
            partial_credit: None,
            requires_manual_grading: false,
        }
    }

    fn partial(
        is_correct: bool,
        score: f64,
        max_score: f64,
        correct_count: usize,
        total_count: usize,
    ) -> Self {
        let feedback = if is_correct {
            "Correct".to_string()
        } else if score > 0.0 {
            format!("Partially correct ({correct_count}/{total_count})")
        } else {
            "Incorrect".to_string()
        };
        Self {
            is_correct,
            score,
            max_score,
            feedback: Some(feedback),
            partial_credit: Some(PartialCredit::new(correct_count, total_count)),
            requires_manual_grading: false,
        }
    }

    fn manual(max_score: f64) -> Self {
        Self {
            is_correct: false,
            score: 0.0,
            max_score,
            feedback: Some("Requires manual grading".to_string()),
            partial_credit: None,
            requires_manual_grading: true,
        }
    }

    /// Score as a fraction of the maximum.
    pub fn ratio(&self) -> f64 {
        if self.max_score > 0.0 {
            self.score / self.max_score
        } else {
            0.0
        }
    }
}

/// Advisory score for a long answer, derived from keyword containment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSuggestion {
    pub matched_keywords: Vec<String>,
    pub total_keywords: usize,
    pub ratio: f64,
    pub suggested_score: f64,
}

/// Score `text` by the share of `keywords` it contains.
///
/// Matching ignores case and diacritics. The suggested score is zero when
/// the share is below `threshold`, else the share of `max_points`.
pub fn keyword_score(
    text: &str,
    keywords: &[String],
    max_points: f64,
    threshold: f64,
    rounding: RoundingStrategy,
) -> KeywordSuggestion {
    let fold = |s: &str| strip_diacritics(&normalize_default(s));
    let haystack = fold(text);

    let keywords: Vec<&String> = keywords.iter().filter(|k| !k.trim().is_empty()).collect();
    let matched_keywords: Vec<String> = keywords
        .iter()
        .filter(|k| haystack.contains(&fold(k.as_str())))
        .map(|k| k.to_string())
        .collect();

    let total_keywords = keywords.len();
    let ratio = if total_keywords == 0 {
        0.0
    } else {
        matched_keywords.len() as f64 / total_keywords as f64
    };
    let suggested_score = if total_keywords == 0 || ratio < threshold {
        0.0
    } else {
        rounding.apply(ratio * max_points)
    };

    KeywordSuggestion {
        matched_keywords,
        total_keywords,
        ratio,
        suggested_score,
    }
}

/// Grades submissions with a fixed [`GradingConfig`].
#[derive(Debug, Clone, Default)]
pub struct AnswerGradingService {
    config: GradingConfig,
}

impl AnswerGradingService {
    pub fn new(config: GradingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    /// Grade `submission` against `correct`.
    pub fn grade_answer(&self, submission: &Submission, correct: &AnswerContent) -> GradingResult {
        let max_score = correct.points();

        let Ok(kind) = submission.answer_type.parse::<ProblemType>() else {
            warn!(answer_type = %submission.answer_type, "unsupported submission type");
            return GradingResult::failure(
                max_score,
                format!("Unsupported answer type: {}", submission.answer_type),
            );
        };

        if kind != correct.problem_type() {
            warn!(
                submitted = %kind,
                expected = %correct.problem_type(),
                "submission type does not match answer"
            );
            return GradingResult::failure(max_score, "Answer type mismatch");
        }

        let Some(answer) = submission.parse(kind) else {
            warn!(answer_type = %kind, "malformed submission data");
            return GradingResult::failure(
                max_score,
                format!("Invalid submission format for {kind}"),
            );
        };

        debug!(answer_type = %kind, max_score, "grading submission");

        // parse() built the variant named by `kind`, which is the key's type,
        // so the inner fallbacks only guard against a broken parse.
        let mismatch = || GradingResult::failure(max_score, "Answer type mismatch");
        let result = match correct.key() {
            AnswerKey::MultipleChoice(key) => match &answer {
                SubmittedAnswer::MultipleChoice(ids) => grade_multiple_choice(ids, key, max_score),
                _ => mismatch(),
            },
            AnswerKey::ShortAnswer(key) => match &answer {
                SubmittedAnswer::ShortAnswer(text) => grade_short_answer(text, key, max_score),
                _ => mismatch(),
            },
            AnswerKey::TrueFalse(key) => match &answer {
                SubmittedAnswer::TrueFalse(value) => {
                    GradingResult::all_or_nothing(*value == key.is_true, max_score)
                }
                _ => mismatch(),
            },
            AnswerKey::Matching(key) => match &answer {
                SubmittedAnswer::Matching(pairs) => self.grade_matching(pairs, key, correct),
                _ => mismatch(),
            },
            AnswerKey::FillBlank(key) => match &answer {
                SubmittedAnswer::FillBlank(blanks) => self.grade_fill_blank(blanks, key, correct),
                _ => mismatch(),
            },
            AnswerKey::Ordering(key) => match &answer {
                SubmittedAnswer::Ordering(order) => self.grade_ordering(order, key, correct),
                _ => mismatch(),
            },
            AnswerKey::LongAnswer(_) => match &answer {
                SubmittedAnswer::LongAnswer(_) => GradingResult::manual(max_score),
                _ => mismatch(),
            },
        };

        debug!(
            answer_type = %kind,
            score = result.score,
            correct = result.is_correct,
            "graded submission"
        );
        result
    }

    /// Advisory keyword score for a long-answer submission.
    ///
    /// `None` unless `correct` is a long-answer key with keywords.
    pub fn keyword_score(&self, text: &str, correct: &AnswerContent) -> Option<KeywordSuggestion> {
        let AnswerKey::LongAnswer(LongAnswerAnswer { keywords, .. }) = correct.key() else {
            return None;
        };
        if keywords.is_empty() {
            return None;
        }
        Some(keyword_score(
            text,
            keywords,
            correct.points(),
            self.config.keyword_threshold,
            self.config.rounding,
        ))
    }

    fn scoring_options(&self, kind: ProblemType) -> PartialScoringOptions {
        PartialScoringOptions {
            rounding: self.config.rounding,
            minimum_threshold: if self.config.apply_minimum_thresholds {
                partial_credit_defaults(kind).minimum_threshold()
            } else {
                None
            },
        }
    }

    fn score_partial(
        &self,
        correct_count: usize,
        total_count: usize,
        correct: &AnswerContent,
    ) -> GradingResult {
        let score = PartialScoringStrategy::calculate(
            correct_count,
            total_count,
            correct.points(),
            correct.allows_partial_credit(),
            self.scoring_options(correct.problem_type()),
        );
        let is_correct = total_count > 0 && correct_count == total_count;
        GradingResult::partial(is_correct, score, correct.points(), correct_count, total_count)
    }

    fn grade_matching(
        &self,
        pairs: &[MatchPair],
        key: &MatchingAnswer,
        correct: &AnswerContent,
    ) -> GradingResult {
        // The first pair submitted for a left item is the one graded.
        let mut submitted: HashMap<&str, &str> = HashMap::new();
        for pair in pairs {
            submitted
                .entry(pair.left_id.as_str())
                .or_insert(pair.right_id.as_str());
        }
        let correct_count = key
            .correct_matches
            .iter()
            .filter(|m| submitted.get(m.left_id.as_str()) == Some(&m.right_id.as_str()))
            .count();
        self.score_partial(correct_count, key.correct_matches.len(), correct)
    }

    fn grade_fill_blank(
        &self,
        blanks: &BTreeMap<String, String>,
        key: &FillBlankAnswer,
        correct: &AnswerContent,
    ) -> GradingResult {
        let correct_count = key
            .blanks
            .iter()
            .filter(|blank| {
                let Some(given) = blanks.get(&blank.id) else {
                    return false;
                };
                let options = NormalizeOptions::with_case_sensitivity(blank.case_sensitive);
                matches_any(given, &blank.accepted_answers, &options)
            })
            .count();
        self.score_partial(correct_count, key.blanks.len(), correct)
    }

    fn grade_ordering(
        &self,
        order: &[String],
        key: &OrderingAnswer,
        correct: &AnswerContent,
    ) -> GradingResult {
        let total = key.correct_order.len();
        let in_place = order
            .iter()
            .zip(&key.correct_order)
            .filter(|(given, expected)| given == expected)
            .count();

        if order == key.correct_order.as_slice() {
            return GradingResult::partial(true, correct.points(), correct.points(), total, total);
        }
        if !correct.allows_partial_credit() {
            return GradingResult::partial(false, 0.0, correct.points(), in_place, total);
        }

        let score = PartialScoringStrategy::calculate(
            in_place,
            total,
            correct.points(),
            true,
            self.scoring_options(ProblemType::Ordering),
        );
        GradingResult::partial(false, score, correct.points(), in_place, total)
    }
}

fn grade_multiple_choice(
    ids: &[String],
    key: &MultipleChoiceAnswer,
    max_score: f64,
) -> GradingResult {
    let submitted: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let expected: HashSet<&str> = key.correct_choices.iter().map(String::as_str).collect();
    GradingResult::all_or_nothing(submitted == expected, max_score)
}

fn grade_short_answer(text: &str, key: &ShortAnswerAnswer, max_score: f64) -> GradingResult {
    let options = NormalizeOptions {
        case_sensitive: key.case_sensitive,
        trim_whitespace: key.trim_whitespace,
        ..NormalizeOptions::default()
    };
    GradingResult::all_or_nothing(matches_any(text, &key.accepted_answers, &options), max_score)
}

fn matches_any(given: &str, accepted: &[String], options: &NormalizeOptions) -> bool {
    let given = normalize_text(given, options);
    if given.is_empty() {
        return false;
    }
    accepted
        .iter()
        .any(|candidate| normalize_text(candidate, options) == given)
}
