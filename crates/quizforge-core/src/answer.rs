//! Answer keys: the `AnswerContent` value object and its variants.
//!
//! Every variant carries a point value and an optional explanation. The
//! point value is checked first, then the variant payload.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::kind::{check_envelope, unwrap_json, wrap_json, ProblemType};
use crate::scoring::{partial_credit_defaults, validate_points};
use crate::validation::{validate_array_length, validate_non_empty, validate_uniqueness};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceAnswer {
    /// Ids of the correct choices.
    pub correct_choices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortAnswerAnswer {
    pub accepted_answers: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_true")]
    pub trim_whitespace: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongAnswerAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrueFalseAnswer {
    pub is_true: bool,
}

/// A left item id paired with the right item id it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPair {
    pub left_id: String,
    pub right_id: String,
}

impl MatchPair {
    pub fn new(left_id: impl Into<String>, right_id: impl Into<String>) -> Self {
        Self {
            left_id: left_id.into(),
            right_id: right_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingAnswer {
    pub correct_matches: Vec<MatchPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allows_partial_credit: Option<bool>,
}

/// Accepted answers for one blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlankAnswer {
    pub id: String,
    pub accepted_answers: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBlankAnswer {
    pub blanks: Vec<BlankAnswer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allows_partial_credit: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderingAnswer {
    pub correct_order: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allows_partial_credit: Option<bool>,
}

fn default_true() -> bool {
    true
}

/// Variant-specific part of an answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerKey {
    MultipleChoice(MultipleChoiceAnswer),
    ShortAnswer(ShortAnswerAnswer),
    LongAnswer(LongAnswerAnswer),
    TrueFalse(TrueFalseAnswer),
    Matching(MatchingAnswer),
    FillBlank(FillBlankAnswer),
    Ordering(OrderingAnswer),
}

impl AnswerKey {
    pub fn problem_type(&self) -> ProblemType {
        match self {
            AnswerKey::MultipleChoice(_) => ProblemType::MultipleChoice,
            AnswerKey::ShortAnswer(_) => ProblemType::ShortAnswer,
            AnswerKey::LongAnswer(_) => ProblemType::LongAnswer,
            AnswerKey::TrueFalse(_) => ProblemType::TrueFalse,
            AnswerKey::Matching(_) => ProblemType::Matching,
            AnswerKey::FillBlank(_) => ProblemType::FillBlank,
            AnswerKey::Ordering(_) => ProblemType::Ordering,
        }
    }

    /// The explicit partial-credit flag, for variants that carry one.
    pub fn partial_credit_flag(&self) -> Option<bool> {
        match self {
            AnswerKey::Matching(a) => a.allows_partial_credit,
            AnswerKey::FillBlank(a) => a.allows_partial_credit,
            AnswerKey::Ordering(a) => a.allows_partial_credit,
            AnswerKey::MultipleChoice(_)
            | AnswerKey::ShortAnswer(_)
            | AnswerKey::LongAnswer(_)
            | AnswerKey::TrueFalse(_) => None,
        }
    }
}

/// Unvalidated primitive form of an answer key.
///
/// Serializes flat and tagged by `type`, e.g.
/// `{"type": "true_false", "points": 5, "isTrue": true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerContentData {
    pub points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(flatten)]
    pub key: AnswerKey,
}

impl AnswerContentData {
    pub fn new(points: f64, key: AnswerKey) -> Self {
        Self {
            points,
            explanation: None,
            key,
        }
    }
}

/// A validated answer key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnswerContentData", into = "AnswerContentData")]
pub struct AnswerContent {
    data: AnswerContentData,
}

impl AnswerContent {
    /// Validate `data` and wrap it.
    ///
    /// # Errors
    ///
    /// [`DomainError::OutOfRange`] for a bad point value, otherwise
    /// [`DomainError::Validation`] naming the first violated rule.
    pub fn new(data: AnswerContentData) -> DomainResult<Self> {
        validate_points(data.points)?;
        validate_key(&data.key)?;
        Ok(Self { data })
    }

    pub fn problem_type(&self) -> ProblemType {
        self.data.key.problem_type()
    }

    pub fn points(&self) -> f64 {
        self.data.points
    }

    pub fn explanation(&self) -> Option<&str> {
        self.data.explanation.as_deref()
    }

    pub fn key(&self) -> &AnswerKey {
        &self.data.key
    }

    /// Whether partial credit applies: the explicit flag, else the variant default.
    pub fn allows_partial_credit(&self) -> bool {
        self.data
            .key
            .partial_credit_flag()
            .unwrap_or_else(|| partial_credit_defaults(self.problem_type()).is_eligible())
    }

    /// A copy worth a different number of points, re-validated.
    pub fn with_points(&self, points: f64) -> DomainResult<Self> {
        let mut data = self.data.clone();
        data.points = points;
        Self::new(data)
    }

    /// A copy with a new (or cleared) explanation, re-validated.
    pub fn with_explanation(&self, explanation: Option<String>) -> DomainResult<Self> {
        let mut data = self.data.clone();
        data.explanation = explanation;
        Self::new(data)
    }

    pub fn to_primitive(&self) -> AnswerContentData {
        self.data.clone()
    }

    pub fn from_primitive(data: AnswerContentData) -> DomainResult<Self> {
        Self::new(data)
    }

    /// `{"type": <variant>, "data": <primitive>}`.
    pub fn to_json(&self) -> serde_json::Value {
        wrap_json(self.problem_type(), serde_json::json!(self.data))
    }

    pub fn from_json(value: &serde_json::Value) -> DomainResult<Self> {
        let (kind, payload) = unwrap_json(value)?;
        let data: AnswerContentData = serde_json::from_value(payload)?;
        check_envelope(kind, data.key.problem_type())?;
        Self::new(data)
    }
}

impl TryFrom<AnswerContentData> for AnswerContent {
    type Error = DomainError;

    fn try_from(data: AnswerContentData) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

impl From<AnswerContent> for AnswerContentData {
    fn from(answer: AnswerContent) -> Self {
        answer.data
    }
}

fn validate_key(key: &AnswerKey) -> DomainResult<()> {
    match key {
        AnswerKey::MultipleChoice(mc) => {
            validate_array_length(
                mc.correct_choices.len(),
                Some(1),
                None,
                "Multiple choice answer",
                "correct choice",
            )?;
            for choice in &mc.correct_choices {
                validate_non_empty(choice, "Correct choice")?;
            }
            validate_uniqueness(
                &mc.correct_choices,
                String::clone,
                "Correct choices must be unique",
                None,
            )
        }
        AnswerKey::ShortAnswer(sa) => {
            if !sa.accepted_answers.iter().any(|a| !a.trim().is_empty()) {
                return Err(DomainError::validation(
                    "Short answer must have at least 1 accepted answer",
                ));
            }
            Ok(())
        }
        AnswerKey::LongAnswer(la) => {
            for keyword in &la.keywords {
                validate_non_empty(keyword, "Keyword")?;
            }
            Ok(())
        }
        AnswerKey::TrueFalse(_) => Ok(()),
        AnswerKey::Matching(m) => {
            validate_array_length(
                m.correct_matches.len(),
                Some(1),
                None,
                "Matching answer",
                "correct match",
            )?;
            for pair in &m.correct_matches {
                validate_non_empty(&pair.left_id, "Left id")?;
                validate_non_empty(&pair.right_id, "Right id")?;
            }
            validate_uniqueness(
                &m.correct_matches,
                |p| p.left_id.clone(),
                "Each left item can only be matched once",
                None,
            )
        }
        AnswerKey::FillBlank(fb) => {
            validate_array_length(
                fb.blanks.len(),
                Some(1),
                None,
                "Fill in the blank answer",
                "blank",
            )?;
            for blank in &fb.blanks {
                validate_non_empty(&blank.id, "Blank id")?;
            }
            validate_uniqueness(&fb.blanks, |b| b.id.clone(), "Blank ids must be unique", None)?;
            for blank in &fb.blanks {
                if !blank.accepted_answers.iter().any(|a| !a.trim().is_empty()) {
                    return Err(DomainError::validation(format!(
                        "Blank '{}' must have at least 1 accepted answer",
                        blank.id
                    )));
                }
            }
            Ok(())
        }
        AnswerKey::Ordering(o) => {
            validate_array_length(
                o.correct_order.len(),
                Some(2),
                None,
                "Ordering answer",
                "items",
            )?;
            validate_uniqueness(
                &o.correct_order,
                String::clone,
                "Ordering items must be unique",
                None,
            )
        }
    }
}
