//! Configuration for rotating tab groups.
//!
//! A [`TabsConfig`] can be loaded from TOML, or assembled from loose
//! `key = value` attributes the way a page annotates a tab group:
//!
//! ```rust
//! use autotabs_widgets::config::TabsConfig;
//! use std::time::Duration;
//!
//! let cfg = TabsConfig::from_attributes([
//!     ("data-delay", "3000"),
//!     ("data-pause-on-hover", "false"),
//!     ("data-delay-typo", "ignored"),
//! ]);
//! assert_eq!(cfg.delay(), Duration::from_millis(3000));
//! assert!(!cfg.pause_on_hover);
//! ```
//!
//! Invalid attribute values never fail: they are logged and the default is
//! kept. Malformed TOML, on the other hand, is reported as a [`ConfigError`].

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Errors raised while loading a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or has mistyped fields.
    #[error("invalid tabs configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for one rotating tab group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    /// How long each tab stays active before rotating, in milliseconds.
    pub delay_ms: u64,
    /// Whether hovering the group pauses the rotation.
    pub pause_on_hover: bool,
    /// Whether to track and render rotation progress.
    pub show_progress: bool,
    /// Index of the tab activated on init.
    pub start_index: usize,
    /// Whether rotation wraps from the last tab to the first.
    pub loop_tabs: bool,
    /// Width of the progress bar; `0` matches the width of the tab row.
    pub bar_width: usize,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            delay_ms: 5000,
            pause_on_hover: true,
            show_progress: true,
            start_index: 0,
            loop_tabs: true,
            bar_width: 0,
        }
    }
}

impl TabsConfig {
    /// The rotation delay as a [`Duration`].
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Parses a TOML document; missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Builds a configuration from attribute pairs.
    ///
    /// Keys may carry a `data-` prefix. Unknown keys are ignored and values
    /// that fail to parse keep the default.
    pub fn from_attributes<I, K, V>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut cfg = Self::default();
        for (key, value) in attrs {
            let key = key.as_ref();
            let value = value.as_ref().trim();
            match key.strip_prefix("data-").unwrap_or(key) {
                "delay" => set_or_warn(&mut cfg.delay_ms, key, value, value.parse().ok()),
                "pause-on-hover" => {
                    set_or_warn(&mut cfg.pause_on_hover, key, value, parse_flag(value))
                }
                "show-progress" => {
                    set_or_warn(&mut cfg.show_progress, key, value, parse_flag(value))
                }
                "start" => set_or_warn(&mut cfg.start_index, key, value, value.parse().ok()),
                "loop" => set_or_warn(&mut cfg.loop_tabs, key, value, parse_flag(value)),
                "bar-width" => set_or_warn(&mut cfg.bar_width, key, value, value.parse().ok()),
                _ => {}
            }
        }
        cfg
    }
}

fn set_or_warn<T: std::fmt::Debug>(slot: &mut T, key: &str, raw: &str, parsed: Option<T>) {
    match parsed {
        Some(v) => *slot = v,
        None => warn!(attribute = key, value = raw, default = ?slot, "invalid attribute, using default"),
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = TabsConfig::default();
        assert_eq!(cfg.delay(), Duration::from_secs(5));
        assert!(cfg.pause_on_hover);
        assert!(cfg.show_progress);
        assert!(cfg.loop_tabs);
        assert_eq!(cfg.start_index, 0);
        assert_eq!(cfg.bar_width, 0);
    }

    #[test]
    fn test_from_toml_partial() {
        let cfg = TabsConfig::from_toml_str("delay_ms = 1500\nloop_tabs = false\n").unwrap();
        assert_eq!(cfg.delay_ms, 1500);
        assert!(!cfg.loop_tabs);
        assert!(cfg.pause_on_hover);
    }

    #[test]
    fn test_from_toml_rejects_wrong_type() {
        let err = TabsConfig::from_toml_str("delay_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid tabs configuration"));
    }

    #[test]
    fn test_attributes_with_and_without_prefix() {
        let cfg = TabsConfig::from_attributes([
            ("delay", "2500"),
            ("data-start", "2"),
            ("data-loop", "no"),
            ("show-progress", "0"),
            ("data-bar-width", "30"),
        ]);
        assert_eq!(cfg.delay_ms, 2500);
        assert_eq!(cfg.start_index, 2);
        assert!(!cfg.loop_tabs);
        assert!(!cfg.show_progress);
        assert_eq!(cfg.bar_width, 30);
    }

    #[test]
    fn test_invalid_attributes_fall_back() {
        let cfg = TabsConfig::from_attributes([
            ("data-delay", "-5"),
            ("data-pause-on-hover", "maybe"),
            ("data-start", "first"),
        ]);
        assert_eq!(cfg, TabsConfig::default());
    }

    #[test]
    fn test_bare_flag_attribute_is_true() {
        let cfg = TabsConfig::from_attributes([("data-loop", "false"), ("data-loop", "")]);
        assert!(cfg.loop_tabs);
    }
}
