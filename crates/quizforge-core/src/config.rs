//! Configuration profiles for grading and tag management.
//!
//! Profiles are plain immutable data. A `quizforge.toml` picks a profile and
//! may override individual keys:
//!
//! ```toml
//! profile = "strict"
//!
//! [grading]
//! rounding = "round"
//!
//! [tags]
//! max_tags_per_problem = 8
//! ```

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::RoundingStrategy;

/// Errors while reading a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to build config: {0}")]
    Build(#[from] toml::ser::Error),

    #[error("unknown profile: {0}")]
    UnknownProfile(String),
}

/// Named bundle of defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Default,
    Strict,
    Lenient,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Default => write!(f, "default"),
            Profile::Strict => write!(f, "strict"),
            Profile::Lenient => write!(f, "lenient"),
        }
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(Profile::Default),
            "strict" => Ok(Profile::Strict),
            "lenient" => Ok(Profile::Lenient),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

/// Settings for [`AnswerGradingService`](crate::grading::AnswerGradingService).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Rounding applied to partial scores.
    pub rounding: RoundingStrategy,
    /// Zero partial scores under each variant's default minimum threshold.
    pub apply_minimum_thresholds: bool,
    /// Fraction of keywords a long answer must contain before a suggested
    /// score is offered.
    pub keyword_threshold: f64,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            rounding: RoundingStrategy::Round,
            apply_minimum_thresholds: false,
            keyword_threshold: 0.5,
        }
    }
}

impl GradingConfig {
    pub fn strict() -> Self {
        Self {
            rounding: RoundingStrategy::Floor,
            apply_minimum_thresholds: true,
            keyword_threshold: 0.6,
        }
    }

    pub fn lenient() -> Self {
        Self {
            rounding: RoundingStrategy::Ceil,
            apply_minimum_thresholds: false,
            keyword_threshold: 0.3,
        }
    }

    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Default => Self::default(),
            Profile::Strict => Self::strict(),
            Profile::Lenient => Self::lenient(),
        }
    }
}

/// Settings for [`TagManagementService`](crate::tags::TagManagementService).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagManagementConfig {
    /// Minimum similarity for a tag to be suggested.
    pub similarity_threshold: f64,
    pub max_suggestions: usize,
    pub min_usage_count: usize,
    pub max_recommendations: usize,
    /// Shorter tokens are ignored when recommending tags.
    pub min_word_length: usize,
    pub max_tags_per_problem: usize,
    pub case_sensitive: bool,
    pub max_search_results: usize,
    pub enable_clustering: bool,
    /// Minimum similarity for a tag to join a cluster.
    pub levenshtein_similarity_threshold: f64,
    pub enable_hierarchy_analysis: bool,
}

impl Default for TagManagementConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.6,
            max_suggestions: 5,
            min_usage_count: 1,
            max_recommendations: 5,
            min_word_length: 2,
            max_tags_per_problem: 10,
            case_sensitive: false,
            max_search_results: 20,
            enable_clustering: true,
            levenshtein_similarity_threshold: 0.8,
            enable_hierarchy_analysis: true,
        }
    }
}

impl TagManagementConfig {
    pub fn strict() -> Self {
        Self {
            similarity_threshold: 0.8,
            max_suggestions: 3,
            min_usage_count: 2,
            max_recommendations: 3,
            min_word_length: 3,
            max_tags_per_problem: 5,
            levenshtein_similarity_threshold: 0.9,
            ..Self::default()
        }
    }

    pub fn lenient() -> Self {
        Self {
            similarity_threshold: 0.4,
            max_suggestions: 10,
            max_recommendations: 10,
            max_tags_per_problem: 20,
            max_search_results: 50,
            levenshtein_similarity_threshold: 0.6,
            ..Self::default()
        }
    }

    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Default => Self::default(),
            Profile::Strict => Self::strict(),
            Profile::Lenient => Self::lenient(),
        }
    }
}

/// Top-level quizforge configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizforgeConfig {
    pub profile: Profile,
    pub grading: GradingConfig,
    pub tags: TagManagementConfig,
}

/// Raw document shape: every section is optional and only overrides keys.
#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    profile: Option<Profile>,
    #[serde(default)]
    grading: Option<toml::Table>,
    #[serde(default)]
    tags: Option<toml::Table>,
}

impl QuizforgeConfig {
    /// All sections filled from the given profile.
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            profile,
            grading: GradingConfig::for_profile(profile),
            tags: TagManagementConfig::for_profile(profile),
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::from_toml_str_with_profile(content, None)
    }

    /// Parse a TOML document, optionally forcing the profile.
    ///
    /// Keys present in `[grading]` or `[tags]` override the profile values.
    pub fn from_toml_str_with_profile(
        content: &str,
        profile_override: Option<Profile>,
    ) -> Result<Self, ConfigError> {
        let doc: ConfigDocument = toml::from_str(content)?;
        let profile = profile_override.or(doc.profile).unwrap_or_default();
        Ok(Self {
            profile,
            grading: overlay(GradingConfig::for_profile(profile), doc.grading)?,
            tags: overlay(TagManagementConfig::for_profile(profile), doc.tags)?,
        })
    }
}

fn overlay<T>(base: T, patch: Option<toml::Table>) -> Result<T, ConfigError>
where
    T: Serialize + DeserializeOwned,
{
    let Some(patch) = patch else {
        return Ok(base);
    };
    let mut table = toml::Table::try_from(base)?;
    table.extend(patch);
    Ok(toml::Value::Table(table).try_into()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = QuizforgeConfig::default();
        assert_eq!(config.profile, Profile::Default);
        assert_eq!(config.tags.max_tags_per_problem, 10);
        assert_eq!(config.grading.rounding, RoundingStrategy::Round);
        assert!(!config.grading.apply_minimum_thresholds);
    }

    #[test]
    fn empty_document_is_default() {
        let config = QuizforgeConfig::from_toml_str("").unwrap();
        assert_eq!(config, QuizforgeConfig::default());
    }

    #[test]
    fn profile_then_overrides() {
        let toml_str = r#"
profile = "strict"

[grading]
rounding = "ceil"

[tags]
max_tags_per_problem = 8
"#;
        let config = QuizforgeConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.profile, Profile::Strict);
        assert_eq!(config.grading.rounding, RoundingStrategy::Ceil);
        assert!(config.grading.apply_minimum_thresholds);
        assert_eq!(config.tags.max_tags_per_problem, 8);
        assert_eq!(config.tags.min_word_length, 3);
    }

    #[test]
    fn profile_override_wins_over_document() {
        let config =
            QuizforgeConfig::from_toml_str_with_profile("profile = \"strict\"", Some(Profile::Lenient))
                .unwrap();
        assert_eq!(config.profile, Profile::Lenient);
        assert_eq!(config.tags, TagManagementConfig::lenient());
    }

    #[test]
    fn bad_values_are_reported() {
        let err = QuizforgeConfig::from_toml_str("[tags]\nmax_suggestions = \"many\"").unwrap_err();
        assert!(err.to_string().contains("failed to"));
        assert!(QuizforgeConfig::from_toml_str("profile = \"chaotic\"").is_err());
    }

    #[test]
    fn profile_parse() {
        assert_eq!("Strict".parse::<Profile>().unwrap(), Profile::Strict);
        assert!(matches!(
            "x".parse::<Profile>(),
            Err(ConfigError::UnknownProfile(_))
        ));
    }
}
