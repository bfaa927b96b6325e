//! Configuration file handling
//!
//! Layering: built-in defaults, then the TOML config file, then command line
//! flags.
//!
//! ```toml
//! [logging]
//! level = "info"
//! json = false
//!
//! [preference]
//! media_type = "audio"
//! direction = "send"
//! codec = "opus/48000"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use audiopref_sdp_core::{CodecPreference, Direction};
use serde::{Deserialize, Serialize};

use crate::logging::LoggingConfig;

/// Whole-application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging setup
    pub logging: LoggingConfig,
    /// Codec preference applied by `prefer`
    pub preference: CodecPreference,
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid configuration")
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("In config file {}", path.display()))
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Preference values given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceOverrides {
    pub media_type: Option<String>,
    pub direction: Option<Direction>,
    pub codec: Option<String>,
}

impl PreferenceOverrides {
    /// Overlay the given values on `base`
    pub fn apply_to(&self, base: &CodecPreference) -> CodecPreference {
        CodecPreference {
            media_type: self.media_type.clone().unwrap_or_else(|| base.media_type.clone()),
            direction: self.direction.unwrap_or(base.direction),
            codec: self.codec.clone().unwrap_or_else(|| base.codec.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = AppConfig::from_toml(
            r#"
            [preference]
            codec = "ISAC/16000"
            "#,
        )
        .unwrap();
        assert_eq!(config.preference.codec, "ISAC/16000");
        assert_eq!(config.preference.media_type, "audio");
        assert_eq!(config.preference.direction, Direction::Send);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_invalid_direction_rejected() {
        let err = AppConfig::from_toml(
            r#"
            [preference]
            direction = "both"
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_overrides() {
        let base = CodecPreference::audio_send("opus/48000");

        let none = PreferenceOverrides::default();
        assert_eq!(none.apply_to(&base), base);

        let some = PreferenceOverrides {
            direction: Some(Direction::Recv),
            codec: Some(String::new()),
            ..Default::default()
        };
        let merged = some.apply_to(&base);
        assert_eq!(merged.media_type, "audio");
        assert_eq!(merged.direction, Direction::Recv);
        assert!(merged.is_noop());
    }
}
