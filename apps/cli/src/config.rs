//! Configuration from the environment.

use anyhow::{anyhow, Context, Result};
use correction_core::MatchingMode;
use std::path::PathBuf;
use std::time::Duration;

pub const CONTENT_DIR_VAR: &str = "CORRECTION_CONTENT_DIR";
pub const MATCHING_MODE_VAR: &str = "CORRECTION_MATCHING_MODE";
pub const REVEAL_DELAY_VAR: &str = "CORRECTION_REVEAL_DELAY_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory with `catalog.md` and `texts.md`; bundled content when unset.
    pub content_dir: Option<PathBuf>,
    pub matching_mode: MatchingMode,
    /// Pause between a successful check and showing the correction stage.
    pub reveal_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: None,
            matching_mode: MatchingMode::default(),
            reveal_delay: Duration::ZERO,
        }
    }
}

impl Config {
    /// Read `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup(CONTENT_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            config.content_dir = Some(PathBuf::from(dir));
        }

        if let Some(mode) = lookup(MATCHING_MODE_VAR) {
            config.matching_mode = MatchingMode::from_name(mode.trim()).ok_or_else(|| {
                anyhow!(
                    "{} must be standard or accent_insensitive, got {:?}",
                    MATCHING_MODE_VAR,
                    mode
                )
            })?;
        }

        if let Some(ms) = lookup(REVEAL_DELAY_VAR) {
            let ms: u64 = ms
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of milliseconds", REVEAL_DELAY_VAR))?;
            config.reveal_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }
}
