//! The problem-type discriminator shared by content, answers and submissions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One of the seven mutually exclusive question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    MultipleChoice,
    ShortAnswer,
    LongAnswer,
    TrueFalse,
    Matching,
    FillBlank,
    Ordering,
}

impl ProblemType {
    /// Every variant, in declaration order.
    pub const ALL: [ProblemType; 7] = [
        ProblemType::MultipleChoice,
        ProblemType::ShortAnswer,
        ProblemType::LongAnswer,
        ProblemType::TrueFalse,
        ProblemType::Matching,
        ProblemType::FillBlank,
        ProblemType::Ordering,
    ];

    /// The wire name, e.g. `multiple_choice`.
    pub const fn as_str(self) -> &'static str {
        match self {
            ProblemType::MultipleChoice => "multiple_choice",
            ProblemType::ShortAnswer => "short_answer",
            ProblemType::LongAnswer => "long_answer",
            ProblemType::TrueFalse => "true_false",
            ProblemType::Matching => "matching",
            ProblemType::FillBlank => "fill_blank",
            ProblemType::Ordering => "ordering",
        }
    }

    /// Human-readable name used in validation messages.
    pub const fn display_name(self) -> &'static str {
        match self {
            ProblemType::MultipleChoice => "Multiple choice",
            ProblemType::ShortAnswer => "Short answer",
            ProblemType::LongAnswer => "Long answer",
            ProblemType::TrueFalse => "True/false",
            ProblemType::Matching => "Matching",
            ProblemType::FillBlank => "Fill in the blank",
            ProblemType::Ordering => "Ordering",
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProblemType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProblemType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::UnsupportedType(s.to_string()))
    }
}

/// Wrap a tagged primitive as `{"type": <variant>, "data": <primitive>}`.
pub(crate) fn wrap_json(kind: ProblemType, data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "type": kind.as_str(), "data": data })
}

/// Split a `{"type", "data"}` envelope, checking the tag names a known variant.
pub(crate) fn unwrap_json(
    value: &serde_json::Value,
) -> Result<(ProblemType, serde_json::Value), DomainError> {
    let tag = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| DomainError::Serialization("missing \"type\" tag".into()))?;
    let kind = tag.parse::<ProblemType>()?;
    let data = value
        .get("data")
        .cloned()
        .ok_or_else(|| DomainError::Serialization("missing \"data\" payload".into()))?;
    Ok((kind, data))
}

/// Fail unless the envelope tag and the payload agree on the variant.
pub(crate) fn check_envelope(tag: ProblemType, payload: ProblemType) -> Result<(), DomainError> {
    if tag != payload {
        return Err(DomainError::Serialization(format!(
            "envelope type {tag} does not match payload type {payload}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_agree() {
        for t in ProblemType::ALL {
            assert_eq!(t.to_string().parse::<ProblemType>().unwrap(), t);
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&ProblemType::FillBlank).unwrap(),
            "\"fill_blank\""
        );
    }

    #[test]
    fn envelope_requires_tag_and_data() {
        let ok = wrap_json(ProblemType::TrueFalse, serde_json::json!({"x": 1}));
        let (kind, data) = unwrap_json(&ok).unwrap();
        assert_eq!(kind, ProblemType::TrueFalse);
        assert_eq!(data["x"], 1);

        assert!(unwrap_json(&serde_json::json!({"data": {}})).is_err());
        assert!(unwrap_json(&serde_json::json!({"type": "ordering"})).is_err());
        assert!(matches!(
            unwrap_json(&serde_json::json!({"type": "essay", "data": {}})),
            Err(DomainError::UnsupportedType(_))
        ));
    }

    #[test]
    fn unknown_type_is_unsupported() {
        let err = "essay".parse::<ProblemType>().unwrap_err();
        assert_eq!(err, DomainError::UnsupportedType("essay".into()));
    }
}
