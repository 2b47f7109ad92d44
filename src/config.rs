//! Configuration for ttydialog.
//!
//! The configuration file is located at `~/.ttydialog/config.toml`:
//!
//! ```toml
//! # Seconds to wait for a key before giving up (5-25). Omit to wait forever.
//! refresh_secs = 25
//!
//! # Glyph shown for each character in masked mode (printable ASCII)
//! mask_char = "*"
//!
//! # Put the prompt on the last row inside the border
//! prompt_at_bottom = true
//!
//! # Seconds a --message stays on screen
//! message_hold_secs = 2.0
//! ```

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ui::editor::{EchoMode, DEFAULT_MASK};

/// Shortest read timeout the operator can configure, in tenths of a second.
pub const MIN_REFRESH_TENTHS: u8 = 50;
/// Longest read timeout the operator can configure, in tenths of a second.
pub const MAX_REFRESH_TENTHS: u8 = 250;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Read timeout in seconds, `None` blocks
    pub refresh_secs: Option<f64>,
    /// Mask glyph for masked echo
    pub mask_char: char,
    /// Default prompt placement
    pub prompt_at_bottom: bool,
    /// How long a message-only dialog stays up
    pub message_hold_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_secs: None,
            mask_char: DEFAULT_MASK,
            prompt_at_bottom: true,
            message_hold_secs: 2.0,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Self {
        match Self::get_config_path() {
            Some(path) if path.exists() => match fs::read_to_string(&path) {
                Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                    warn!(path = %path.display(), error = %e, "ignoring unparsable config");
                    Self::default()
                }),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not read config");
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Parse configuration from TOML text
    ///
    /// A `mask_char` that is not printable ASCII is replaced by the default.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(content)?;
        if !EchoMode::is_valid_mask(config.mask_char) {
            warn!(mask_char = ?config.mask_char, "mask_char must be printable ASCII, using default");
            config.mask_char = DEFAULT_MASK;
        }
        Ok(config)
    }

    /// Get config file path
    pub fn get_config_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Read timeout for the session, in tenths of a second.
    ///
    /// The configured interval is clamped to 5-25 seconds; a missing interval
    /// means reads block.
    pub fn timeout_tenths(&self) -> Option<u8> {
        self.refresh_secs.map(refresh_to_tenths)
    }

    pub fn message_hold(&self) -> Duration {
        Duration::try_from_secs_f64(self.message_hold_secs).unwrap_or_default()
    }
}

/// Convert a refresh interval in seconds to clamped tenths.
pub fn refresh_to_tenths(secs: f64) -> u8 {
    if secs.is_nan() {
        return MIN_REFRESH_TENTHS;
    }
    let tenths = (secs * 10.0).clamp(f64::from(MIN_REFRESH_TENTHS), f64::from(MAX_REFRESH_TENTHS));
    tenths as u8
}

/// `~/.ttydialog`, created on demand
pub fn config_dir() -> Option<PathBuf> {
    let dir = home_dir()?.join(".ttydialog");
    if !dir.exists() {
        let _ = fs::create_dir_all(&dir);
    }
    Some(dir)
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout_tenths(), None);
        assert_eq!(config.mask_char, '*');
        assert!(config.prompt_at_bottom);
        assert_eq!(config.message_hold(), Duration::from_secs(2));
    }

    #[test]
    fn test_parse_partial_file() {
        let config = Config::parse("refresh_secs = 10\nmask_char = \"#\"\n").unwrap();
        assert_eq!(config.timeout_tenths(), Some(100));
        assert_eq!(config.mask_char, '#');
        // Unset fields keep their defaults
        assert!(config.prompt_at_bottom);
        assert_eq!(config.message_hold_secs, 2.0);
    }

    #[test]
    fn test_wide_mask_char_replaced() {
        let config = Config::parse("mask_char = \"＊\"").unwrap();
        assert_eq!(config.mask_char, DEFAULT_MASK);

        let config = Config::parse("mask_char = \"\\u0007\"").unwrap();
        assert_eq!(config.mask_char, DEFAULT_MASK);

        let config = Config::parse("mask_char = \"x\"").unwrap();
        assert_eq!(config.mask_char, 'x');
    }

    #[test]
    fn test_parse_rejects_bad_types() {
        assert!(Config::parse("prompt_at_bottom = \"yes\"").is_err());
    }

    #[test]
    fn test_refresh_clamping() {
        assert_eq!(refresh_to_tenths(1.0), 50);
        assert_eq!(refresh_to_tenths(12.5), 125);
        assert_eq!(refresh_to_tenths(25.0), 250);
        assert_eq!(refresh_to_tenths(600.0), 250);
        assert_eq!(refresh_to_tenths(-3.0), 50);
        assert_eq!(refresh_to_tenths(f64::NAN), 50);
    }

    #[test]
    fn test_negative_hold_is_zero() {
        let config = Config {
            message_hold_secs: -1.0,
            ..Config::default()
        };
        assert_eq!(config.message_hold(), Duration::ZERO);
    }
}
