//! Shared validators and text normalizers.
//!
//! Content and answer validation, grading comparisons, and tag similarity all
//! normalize text through [`normalize_text`]; there is no other copy of that
//! logic in the crate.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::{DomainError, DomainResult};

static IDENTIFIER_PATTERN: OnceLock<Regex> = OnceLock::new();
static URL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn identifier_pattern() -> &'static Regex {
    IDENTIFIER_PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("identifier pattern compiles"))
}

fn url_pattern() -> &'static Regex {
    URL_PATTERN.get_or_init(|| {
        Regex::new(r"^https?://[A-Za-z0-9](?:[A-Za-z0-9.-]*[A-Za-z0-9])?(?::\d{1,5})?(?:[/?#]\S*)?$")
            .expect("url pattern compiles")
    })
}

/// Switches for [`normalize_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Keep letter case as typed. Off by default.
    pub case_sensitive: bool,
    /// Strip leading and trailing whitespace.
    pub trim_whitespace: bool,
    /// Collapse internal whitespace runs to a single space.
    pub remove_extra_spaces: bool,
    /// Apply Unicode canonical composition (NFC).
    pub normalize_unicode: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            trim_whitespace: true,
            remove_extra_spaces: true,
            normalize_unicode: true,
        }
    }
}

impl NormalizeOptions {
    /// Defaults with the given case sensitivity.
    pub fn with_case_sensitivity(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            ..Self::default()
        }
    }
}

/// Normalize text for comparison.
///
/// Steps run in a fixed order: NFC composition, trim, whitespace collapse,
/// lower-casing. Each step can be switched off through `options`.
pub fn normalize_text(text: &str, options: &NormalizeOptions) -> String {
    let mut result: String = if options.normalize_unicode {
        text.nfc().collect()
    } else {
        text.to_string()
    };

    if options.trim_whitespace {
        result = result.trim().to_string();
    }

    if options.remove_extra_spaces {
        let mut collapsed = String::with_capacity(result.len());
        let mut in_space = false;
        for c in result.chars() {
            if c.is_whitespace() {
                if !in_space {
                    collapsed.push(' ');
                }
                in_space = true;
            } else {
                collapsed.push(c);
                in_space = false;
            }
        }
        result = collapsed;
    }

    if !options.case_sensitive {
        result = result.to_lowercase();
    }

    result
}

/// Normalize with the default options (case-insensitive, all steps on).
pub fn normalize_default(text: &str) -> String {
    normalize_text(text, &NormalizeOptions::default())
}

/// Remove diacritics: decompose (NFD) and drop combining marks.
///
/// Hangul syllables decompose into conjoining jamo, which are not combining
/// marks, so the result is recomposed to keep them intact.
pub fn strip_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
        .collect()
}

/// Fail if any two items produce the same key.
///
/// `normalize`, when given, is applied to every key before comparison.
pub fn validate_uniqueness<T, F>(
    items: &[T],
    key: F,
    message: &str,
    normalize: Option<fn(&str) -> String>,
) -> DomainResult<()>
where
    F: Fn(&T) -> String,
{
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        let raw = key(item);
        let k = match normalize {
            Some(f) => f(&raw),
            None => raw,
        };
        if !seen.insert(k) {
            return Err(DomainError::validation(message));
        }
    }
    Ok(())
}

/// Fail if `value` is empty or whitespace only.
pub fn validate_non_empty(value: &str, field: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Check a collection length against optional bounds.
///
/// Messages read "`{subject}` must have at least `{min}` `{noun}`" and
/// "`{subject}` cannot have more than `{max}` `{noun}`".
pub fn validate_array_length(
    len: usize,
    min: Option<usize>,
    max: Option<usize>,
    subject: &str,
    noun: &str,
) -> DomainResult<()> {
    if let Some(min) = min {
        if len < min {
            return Err(DomainError::validation(format!(
                "{subject} must have at least {min} {noun}"
            )));
        }
    }
    if let Some(max) = max {
        if len > max {
            return Err(DomainError::validation(format!(
                "{subject} cannot have more than {max} {noun}"
            )));
        }
    }
    Ok(())
}

/// Fail unless `value` matches `[A-Za-z0-9_-]+`.
pub fn validate_identifier(value: &str, field: &str) -> DomainResult<()> {
    if !identifier_pattern().is_match(value) {
        return Err(DomainError::validation(format!(
            "{field} must contain only letters, digits, hyphens and underscores: '{value}'"
        )));
    }
    Ok(())
}

/// Fail if `value` is longer than `max` characters.
pub fn validate_text_length(value: &str, max: usize, field: &str) -> DomainResult<()> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{field} cannot exceed {max} characters"
        )));
    }
    Ok(())
}

/// Fail unless `value` is an absolute http(s) URL.
pub fn validate_url(value: &str, field: &str) -> DomainResult<()> {
    if !url_pattern().is_match(value) {
        return Err(DomainError::validation(format!(
            "{field} must be a valid URL: '{value}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn normalize_defaults_trim_collapse_and_lowercase() {
        assert_eq!(normalize_default("  Hello    World \t"), "hello world");
    }

    #[test]
    fn normalize_respects_case_sensitivity() {
        let opts = NormalizeOptions::with_case_sensitivity(true);
        assert_eq!(normalize_text(" Paris ", &opts), "Paris");
    }

    #[test]
    fn normalize_can_keep_whitespace() {
        let opts = NormalizeOptions {
            trim_whitespace: false,
            remove_extra_spaces: false,
            ..NormalizeOptions::default()
        };
        assert_eq!(normalize_text(" A  B ", &opts), " a  b ");
    }

    #[test]
    fn normalize_composes_unicode() {
        let decomposed = "cafe\u{301}";
        assert_eq!(normalize_default(decomposed), "caf\u{e9}");
    }

    #[test]
    fn strip_diacritics_removes_accents_and_keeps_hangul() {
        assert_eq!(strip_diacritics("Crème brûlée"), "Creme brulee");
        assert_eq!(strip_diacritics("수학"), "수학");
    }

    #[test]
    fn uniqueness_detects_duplicates_after_normalization() {
        let items = vec!["Paris", " paris "];
        let trimmed: fn(&str) -> String = |s| s.trim().to_lowercase();
        let err = validate_uniqueness(&items, |s| s.to_string(), "must be unique", Some(trimmed))
            .unwrap_err();
        assert_eq!(err.to_string(), "must be unique");
        assert!(validate_uniqueness(&items, |s| s.to_string(), "must be unique", None).is_ok());
    }

    #[test]
    fn array_length_messages() {
        let err = validate_array_length(1, Some(2), Some(10), "Multiple choice", "choices")
            .unwrap_err();
        assert!(err.to_string().contains("at least 2 choices"));
        let err = validate_array_length(11, Some(2), Some(10), "Multiple choice", "choices")
            .unwrap_err();
        assert!(err.to_string().contains("more than 10 choices"));
        assert!(validate_array_length(4, Some(2), Some(10), "x", "y").is_ok());
    }

    #[test_case("choice_a", true; "underscore")]
    #[test_case("left-1", true; "hyphen")]
    #[test_case("B", true; "single letter")]
    #[test_case("has space", false; "space")]
    #[test_case("", false; "empty")]
    #[test_case("a.b", false; "dot")]
    fn identifier_pattern_cases(value: &str, ok: bool) {
        assert_eq!(validate_identifier(value, "id").is_ok(), ok);
    }

    #[test_case("https://example.com/a.png", true; "https with path")]
    #[test_case("http://localhost:8080", true; "host and port")]
    #[test_case("ftp://example.com", false; "other scheme")]
    #[test_case("example.com", false; "no scheme")]
    #[test_case("https://exa mple.com", false; "whitespace")]
    fn url_cases(value: &str, ok: bool) {
        assert_eq!(validate_url(value, "url").is_ok(), ok);
    }

    #[test]
    fn text_length_counts_chars_not_bytes() {
        assert!(validate_text_length("수학수학", 4, "title").is_ok());
        assert!(validate_text_length("수학수학수", 4, "title").is_err());
    }

    #[test]
    fn non_empty_rejects_whitespace() {
        assert!(validate_non_empty("   ", "Title").is_err());
        assert!(validate_non_empty("x", "Title").is_ok());
    }
}
