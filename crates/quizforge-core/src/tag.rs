//! The `Tag` value object.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;

use crate::error::{DomainError, DomainResult};

/// Maximum tag length in characters.
pub const MAX_TAG_LENGTH: usize = 50;

/// A validated, normalized tag label.
///
/// Names are trimmed and lower-cased on construction and may contain Unicode
/// letters, digits, `-` and `_`. Two tags are equal when their normalized
/// names are equal, so `MATH` and `math` are the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    /// Create a tag from a raw name.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] if the trimmed name is empty, longer
    /// than [`MAX_TAG_LENGTH`] characters, or contains characters other than
    /// letters, digits, hyphens and underscores.
    pub fn new(name: impl AsRef<str>) -> DomainResult<Self> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Tag name cannot be empty"));
        }
        // Lower-casing can lengthen a name ('İ' becomes 'i' plus a combining dot).
        let name = trimmed.to_lowercase();
        if name.chars().count() > MAX_TAG_LENGTH {
            return Err(DomainError::validation(format!(
                "Tag name cannot exceed {MAX_TAG_LENGTH} characters"
            )));
        }
        if let Some(bad) = name.chars().find(|c| {
            !(c.is_alphanumeric() || is_combining_mark(*c) || *c == '-' || *c == '_')
        }) {
            return Err(DomainError::validation(format!(
                "Tag name contains invalid character '{bad}': only letters, digits, hyphens and underscores are allowed"
            )));
        }
        Ok(Self(name))
    }

    /// The normalized name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Whether `name`, once normalized, is this tag's name.
    pub fn matches_name(&self, name: &str) -> bool {
        self.0 == normalize_tag_name(name)
    }
}

/// Trim and lower-case a raw tag name without validating it.
pub fn normalize_tag_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Deref for Tag {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Tag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Tag {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Tag {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}
