//! User configuration for polish.
//!
//! Read once at startup from `$XDG_CONFIG_HOME/polish/config.toml` (falling back
//! to `~/.config/polish/config.toml`). Every key is optional:
//!
//! ```toml
//! theme = "catppuccin-mocha"
//!
//! [ai]
//! base_url = "http://localhost:3000"
//! timeout_secs = 60
//!
//! [diff]
//! strategy = "lookahead"   # or "myers"
//! lookahead = 5
//! ```

use std::path::PathBuf;

use log::warn;
use polish_core::{DiffOptions, DiffStrategy};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub theme: String,
    pub ai: AiConfig,
    pub diff: DiffConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            ai: AiConfig::default(),
            diff: DiffConfig::default(),
        }
    }
}

/// Where the polish endpoint lives.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    /// Base URL of the proposals backend; `/api/ai/polish` is appended.
    pub base_url: String,
    /// Request timeout. Unset keeps the HTTP client's default.
    pub timeout_secs: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:3000".to_owned(), timeout_secs: None }
    }
}

impl AiConfig {
    pub fn polish_url(&self) -> String {
        format!("{}/api/ai/polish", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiffConfig {
    pub strategy: DiffStrategy,
    pub lookahead: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        let defaults = DiffOptions::default();
        Self { strategy: defaults.strategy, lookahead: defaults.lookahead }
    }
}

impl DiffConfig {
    pub fn options(&self) -> DiffOptions {
        DiffOptions { strategy: self.strategy, lookahead: self.lookahead }
    }
}

/// Returns the path to the polish config file.
///
/// Prefers `$XDG_CONFIG_HOME/polish/config.toml`; falls back to
/// `~/.config/polish/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("polish").join("config.toml")
}

/// Loads the config file, falling back to defaults.
///
/// A missing file is silent; an unparsable one is logged and ignored so a bad
/// edit never prevents startup.
pub fn load_config() -> Config {
    let path = config_path();
    match std::fs::read_to_string(&path) {
        Ok(raw) => parse_config(&raw).unwrap_or_else(|e| {
            warn!("config parse error in {:?}: {}", path, e);
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}

pub fn parse_config(raw: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = parse_config(
            r#"
            theme = "dark"
            [ai]
            base_url = "https://proposals.example.edu/"
            [diff]
            strategy = "myers"
            "#,
        )
        .unwrap();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.ai.polish_url(), "https://proposals.example.edu/api/ai/polish");
        assert_eq!(config.ai.timeout_secs, None);
        assert_eq!(config.diff.strategy, DiffStrategy::Myers);
        assert_eq!(config.diff.lookahead, 5);
    }

    #[test]
    fn unknown_strategy_is_an_error() {
        assert!(parse_config("[diff]\nstrategy = \"patience\"").is_err());
    }
}
