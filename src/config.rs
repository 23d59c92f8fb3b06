// =============================================================================
// Application Configuration
// =============================================================================
//
// Loaded once at startup from an optional JSON file.  All fields carry
// `#[serde(default)]` so a partial (or empty) file is always valid.
// Environment variables override the file for deployment knobs.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::Period;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_symbol() -> String {
    "RELIANCE.NS".to_string()
}

fn default_recent_capacity() -> usize {
    50
}

fn default_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) pattern-scout/1.0".to_string()
}

// =============================================================================
// ProviderConfig
// =============================================================================

/// Settings for the market-data HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Scheme + host of the chart API, without a trailing path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listen address for `serve`.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Symbol used when the CLI is given none.
    #[serde(default = "default_symbol")]
    pub default_symbol: String,

    /// Period used when a request omits one.
    #[serde(default)]
    pub default_period: Period,

    /// Number of report digests the API server remembers.
    #[serde(default = "default_recent_capacity")]
    pub recent_capacity: usize,

    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            default_symbol: default_symbol(),
            default_period: Period::default(),
            recent_capacity: default_recent_capacity(),
            provider: ProviderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can fall back to defaults
    /// with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            default_period = %config.default_period,
            provider = %config.provider.base_url,
            "config loaded"
        );

        Ok(config)
    }

    /// Apply `SCOUT_BIND_ADDR` / `SCOUT_PROVIDER_URL` when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("SCOUT_BIND_ADDR").ok(),
            std::env::var("SCOUT_PROVIDER_URL").ok(),
        );
    }

    fn apply_overrides(&mut self, bind_addr: Option<String>, provider_url: Option<String>) {
        if let Some(addr) = bind_addr.filter(|s| !s.trim().is_empty()) {
            self.bind_addr = addr.trim().to_string();
        }
        if let Some(url) = provider_url.filter(|s| !s.trim().is_empty()) {
            self.provider.base_url = url.trim().to_string();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
        assert_eq!(cfg.default_symbol, "RELIANCE.NS");
        assert_eq!(cfg.default_period, Period::SixMonths);
        assert_eq!(cfg.recent_capacity, 50);
        assert_eq!(cfg.provider.base_url, "https://query1.finance.yahoo.com");
        assert_eq!(cfg.provider.timeout_secs, 10);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.default_period, Period::SixMonths);
        assert_eq!(cfg.provider.timeout_secs, 10);
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "default_period": "2y", "provider": { "timeout_secs": 3 } }"#;
        let cfg: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.default_period, Period::TwoYears);
        assert_eq!(cfg.provider.timeout_secs, 3);
        assert_eq!(cfg.provider.base_url, "https://query1.finance.yahoo.com");
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
    }

    #[test]
    fn unknown_period_is_rejected() {
        let json = r#"{ "default_period": "10y" }"#;
        assert!(serde_json::from_str::<AppConfig>(json).is_err());
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(AppConfig::load("/nonexistent/scout_config.json").is_err());
    }

    #[test]
    fn overrides_replace_non_blank_values() {
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(Some("127.0.0.1:8080".into()), Some("  ".into()));
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.provider.base_url, "https://query1.finance.yahoo.com");

        cfg.apply_overrides(None, Some("http://localhost:9000".into()));
        assert_eq!(cfg.provider.base_url, "http://localhost:9000");
    }
}
