//! Locating and loading `quizforge.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quizforge_core::config::{Profile, QuizforgeConfig};

/// Environment variable that forces the profile, whatever the file says.
pub const PROFILE_ENV: &str = "QUIZFORGE_PROFILE";

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizforge.toml` in the current directory
/// 2. `~/.config/quizforge/config.toml`
///
/// Without a file the defaults of the selected profile are used.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizforgeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizforge.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let profile_override = profile_from_env()?;

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loading config");
            QuizforgeConfig::from_toml_str_with_profile(&content, profile_override)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizforgeConfig::for_profile(profile_override.unwrap_or_default()),
    };

    Ok(config)
}

fn profile_from_env() -> Result<Option<Profile>> {
    match std::env::var(PROFILE_ENV) {
        Ok(value) if !value.trim().is_empty() => {
            let profile = value
                .parse::<Profile>()
                .with_context(|| format!("invalid {PROFILE_ENV}"))?;
            Ok(Some(profile))
        }
        _ => Ok(None),
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizforge"))
}
