//! Engine configuration.

use std::path::Path;

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{ConfigError, ConfigErrorKind};
use crate::history::DEFAULT_HISTORY_BOUND;

/// Rule variant of the game model.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Variant {
    /// Only the current player's pieces are visible.
    #[default]
    Classic,
    /// Pieces that fought stay visible to both players.
    Reveal,
}

/// Tunables of a [`GameModel`](crate::GameModel).
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the history log.
    #[serde(default = "default_history_bound")]
    history_bound: usize,

    /// Returns to the recorded square allowed before the piece is blocked.
    #[serde(default = "default_back_and_forth_limit")]
    back_and_forth_limit: u32,

    /// Reveal rules.
    #[serde(default)]
    variant: Variant,

    /// Pseudonym used for Red when none is given.
    #[serde(default = "default_red_name")]
    red_name: String,

    /// Pseudonym used for Blue when none is given.
    #[serde(default = "default_blue_name")]
    blue_name: String,
}

fn default_history_bound() -> usize {
    DEFAULT_HISTORY_BOUND
}

fn default_back_and_forth_limit() -> u32 {
    3
}

fn default_red_name() -> String {
    "Red".to_string()
}

fn default_blue_name() -> String {
    "Blue".to_string()
}

impl EngineConfig {
    /// Default configuration with another variant.
    pub fn with_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Replaces the variant.
    pub fn set_variant(&mut self, variant: Variant) {
        self.variant = variant;
    }

    /// Parses and validates a TOML document.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(ConfigErrorKind::Parse, e.to_string()))?;
        config.validate()?;
        debug!(?config, "Config parsed");
        Ok(config)
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(ConfigErrorKind::Read, e.to_string()))?;

        let config = Self::from_toml_str(&content)?;
        info!(variant = %config.variant, "Config loaded successfully");
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_bound == 0 {
            return Err(ConfigError::new(
                ConfigErrorKind::Invalid,
                "history_bound must be greater than 0",
            ));
        }
        if self.back_and_forth_limit == 0 {
            return Err(ConfigError::new(
                ConfigErrorKind::Invalid,
                "back_and_forth_limit must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_bound: default_history_bound(),
            back_and_forth_limit: default_back_and_forth_limit(),
            variant: Variant::default(),
            red_name: default_red_name(),
            blue_name: default_blue_name(),
        }
    }
}
