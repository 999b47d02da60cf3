//! Problem statements: the `ProblemContent` value object and its variants.
//!
//! A `ProblemContent` is built from a [`ProblemContentData`] primitive. The
//! base fields are checked first, then the variant payload; the first rule
//! that fails is reported and nothing else is checked.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::grading_policy::minimum_choices;
use crate::kind::{check_envelope, unwrap_json, wrap_json, ProblemType};
use crate::validation::{
    validate_array_length, validate_identifier, validate_non_empty, validate_text_length,
    validate_uniqueness, validate_url,
};

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;
pub const MAX_INSTRUCTIONS_LENGTH: usize = 2000;
pub const MIN_ORDERING_ITEMS: usize = 2;
pub const MAX_CHOICES: usize = 10;
pub const MAX_SHORT_ANSWER_LENGTH: u32 = 1000;

/// Placeholder that marks a gap in fill-in-the-blank text.
pub const BLANK_MARKER: &str = "__blank__";

/// A file or link shown alongside the problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// An identified piece of text: a choice, a matching item, or an ordering item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledItem {
    pub id: String,
    pub text: String,
}

impl LabeledItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceContent {
    pub choices: Vec<LabeledItem>,
    #[serde(default)]
    pub allow_multiple: bool,
    #[serde(default)]
    pub shuffle_choices: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortAnswerContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongAnswerContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrueFalseContent {
    pub statement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingContent {
    pub left_items: Vec<LabeledItem>,
    pub right_items: Vec<LabeledItem>,
}

/// One gap in fill-in-the-blank text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlankSlot {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillBlankContent {
    /// Text containing one [`BLANK_MARKER`] per blank.
    pub text: String,
    pub blanks: Vec<BlankSlot>,
}

impl FillBlankContent {
    /// Number of [`BLANK_MARKER`] occurrences in the text.
    pub fn marker_count(&self) -> usize {
        self.text.matches(BLANK_MARKER).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderingContent {
    pub items: Vec<LabeledItem>,
    #[serde(default = "default_true")]
    pub shuffle_items: bool,
}

fn default_true() -> bool {
    true
}

/// Variant-specific part of a problem statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProblemBody {
    MultipleChoice(MultipleChoiceContent),
    ShortAnswer(ShortAnswerContent),
    LongAnswer(LongAnswerContent),
    TrueFalse(TrueFalseContent),
    Matching(MatchingContent),
    FillBlank(FillBlankContent),
    Ordering(OrderingContent),
}

impl ProblemBody {
    pub fn problem_type(&self) -> ProblemType {
        match self {
            ProblemBody::MultipleChoice(_) => ProblemType::MultipleChoice,
            ProblemBody::ShortAnswer(_) => ProblemType::ShortAnswer,
            ProblemBody::LongAnswer(_) => ProblemType::LongAnswer,
            ProblemBody::TrueFalse(_) => ProblemType::TrueFalse,
            ProblemBody::Matching(_) => ProblemType::Matching,
            ProblemBody::FillBlank(_) => ProblemType::FillBlank,
            ProblemBody::Ordering(_) => ProblemType::Ordering,
        }
    }
}

/// Unvalidated primitive form of a problem statement.
///
/// Serializes as a flat object tagged by `type`, e.g.
/// `{"type": "true_false", "title": "...", "statement": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemContentData {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(flatten)]
    pub body: ProblemBody,
}

impl ProblemContentData {
    /// Primitive with only a title and a body.
    pub fn new(title: impl Into<String>, body: ProblemBody) -> Self {
        Self {
            title: title.into(),
            description: None,
            instructions: None,
            attachments: Vec::new(),
            body,
        }
    }
}

/// A validated problem statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProblemContentData", into = "ProblemContentData")]
pub struct ProblemContent {
    data: ProblemContentData,
}

impl ProblemContent {
    /// Validate `data` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a [`DomainError::Validation`].
    pub fn new(data: ProblemContentData) -> DomainResult<Self> {
        validate_base(&data)?;
        validate_body(&data.body)?;
        Ok(Self { data })
    }

    pub fn problem_type(&self) -> ProblemType {
        self.data.body.problem_type()
    }

    pub fn title(&self) -> &str {
        &self.data.title
    }

    pub fn description(&self) -> Option<&str> {
        self.data.description.as_deref()
    }

    pub fn instructions(&self) -> Option<&str> {
        self.data.instructions.as_deref()
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.data.attachments
    }

    pub fn body(&self) -> &ProblemBody {
        &self.data.body
    }

    /// A copy with a new title, re-validated.
    pub fn with_title(&self, title: impl Into<String>) -> DomainResult<Self> {
        let mut data = self.data.clone();
        data.title = title.into();
        Self::new(data)
    }

    /// A copy with a new (or cleared) description, re-validated.
    pub fn with_description(&self, description: Option<String>) -> DomainResult<Self> {
        let mut data = self.data.clone();
        data.description = description;
        Self::new(data)
    }

    /// A copy with new (or cleared) instructions, re-validated.
    pub fn with_instructions(&self, instructions: Option<String>) -> DomainResult<Self> {
        let mut data = self.data.clone();
        data.instructions = instructions;
        Self::new(data)
    }

    pub fn to_primitive(&self) -> ProblemContentData {
        self.data.clone()
    }

    pub fn from_primitive(data: ProblemContentData) -> DomainResult<Self> {
        Self::new(data)
    }

    /// `{"type": <variant>, "data": <primitive>}`.
    pub fn to_json(&self) -> serde_json::Value {
        wrap_json(self.problem_type(), serde_json::json!(self.data))
    }

    pub fn from_json(value: &serde_json::Value) -> DomainResult<Self> {
        let (kind, payload) = unwrap_json(value)?;
        let data: ProblemContentData = serde_json::from_value(payload)?;
        check_envelope(kind, data.body.problem_type())?;
        Self::new(data)
    }
}

impl TryFrom<ProblemContentData> for ProblemContent {
    type Error = DomainError;

    fn try_from(data: ProblemContentData) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

impl From<ProblemContent> for ProblemContentData {
    fn from(content: ProblemContent) -> Self {
        content.data
    }
}

fn validate_base(data: &ProblemContentData) -> DomainResult<()> {
    validate_non_empty(&data.title, "Title")?;
    validate_text_length(&data.title, MAX_TITLE_LENGTH, "Title")?;
    if let Some(description) = &data.description {
        validate_text_length(description, MAX_DESCRIPTION_LENGTH, "Description")?;
    }
    if let Some(instructions) = &data.instructions {
        validate_text_length(instructions, MAX_INSTRUCTIONS_LENGTH, "Instructions")?;
    }
    for attachment in &data.attachments {
        validate_identifier(&attachment.id, "Attachment id")?;
        validate_non_empty(&attachment.name, "Attachment name")?;
        validate_url(&attachment.url, "Attachment url")?;
    }
    validate_uniqueness(
        &data.attachments,
        |a| a.id.clone(),
        "Attachment ids must be unique",
        None,
    )
}

fn validate_body(body: &ProblemBody) -> DomainResult<()> {
    let kind = body.problem_type();
    let name = kind.display_name();
    match body {
        ProblemBody::MultipleChoice(mc) => {
            validate_array_length(
                mc.choices.len(),
                minimum_choices(ProblemType::MultipleChoice),
                Some(MAX_CHOICES),
                name,
                "choices",
            )?;
            validate_items(&mc.choices, "Choice")?;
            validate_uniqueness(
                &mc.choices,
                |c| c.text.clone(),
                "Choice texts must be unique",
                Some(trimmed),
            )
        }
        ProblemBody::ShortAnswer(sa) => {
            if let Some(max) = sa.max_length {
                if max == 0 || max > MAX_SHORT_ANSWER_LENGTH {
                    return Err(DomainError::validation(format!(
                        "{name} max length must be between 1 and {MAX_SHORT_ANSWER_LENGTH}"
                    )));
                }
            }
            Ok(())
        }
        ProblemBody::LongAnswer(la) => {
            if let (Some(min), Some(max)) = (la.min_length, la.max_length) {
                if min > max {
                    return Err(DomainError::validation(format!(
                        "{name} min length cannot be greater than max length"
                    )));
                }
            }
            Ok(())
        }
        ProblemBody::TrueFalse(tf) => validate_non_empty(&tf.statement, "Statement"),
        ProblemBody::Matching(m) => {
            let min = minimum_choices(ProblemType::Matching);
            validate_array_length(m.left_items.len(), min, None, name, "left items")?;
            validate_array_length(m.right_items.len(), min, None, name, "right items")?;
            validate_items(&m.left_items, "Left item")?;
            validate_items(&m.right_items, "Right item")
        }
        ProblemBody::FillBlank(fb) => {
            validate_non_empty(&fb.text, "Text")?;
            let markers = fb.marker_count();
            if markers == 0 {
                return Err(DomainError::validation(format!(
                    "{name} text must contain at least one {BLANK_MARKER} marker"
                )));
            }
            if fb.blanks.len() != markers {
                return Err(DomainError::validation(format!(
                    "{name} must define {markers} blanks to match the markers in the text, found {}",
                    fb.blanks.len()
                )));
            }
            for blank in &fb.blanks {
                validate_identifier(&blank.id, "Blank id")?;
            }
            validate_uniqueness(&fb.blanks, |b| b.id.clone(), "Blank ids must be unique", None)
        }
        ProblemBody::Ordering(o) => {
            validate_array_length(
                o.items.len(),
                Some(MIN_ORDERING_ITEMS),
                None,
                name,
                "items",
            )?;
            validate_items(&o.items, "Item")
        }
    }
}

/// Every item needs an identifier, non-blank text, and an id unique in its list.
fn validate_items(items: &[LabeledItem], label: &str) -> DomainResult<()> {
    for item in items {
        validate_identifier(&item.id, &format!("{label} id"))?;
        validate_non_empty(&item.text, &format!("{label} text"))?;
    }
    validate_uniqueness(
        items,
        |i| i.id.clone(),
        &format!("{label} ids must be unique"),
        None,
    )
}

fn trimmed(s: &str) -> String {
    s.trim().to_string()
}
