//! # Checkout Configuration
//!
//! Settings for checkout sessions.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Defaults (lowest)                                                   │
//! │     └── round-off on, INR, 200 lines, taxed, filter "info"              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  2. Config file (storefront.toml)                                       │
//! │     └── explicit path or the platform config dir                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  3. Environment (highest)                                               │
//! │     └── STOREFRONT_* variables                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [pricing]
//! round_off_totals = true
//! currency_code = "INR"
//! max_line_items = 200
//!
//! [tax]
//! default_tax_exempt = false
//!
//! [logging]
//! filter = "info,storefront_checkout=debug"
//! ```
//!
//! ## Environment Variables
//! | Variable                         | Setting                    |
//! |----------------------------------|----------------------------|
//! | `STOREFRONT_ROUND_OFF_TOTALS`    | `pricing.round_off_totals` |
//! | `STOREFRONT_CURRENCY_CODE`       | `pricing.currency_code`    |
//! | `STOREFRONT_MAX_LINE_ITEMS`      | `pricing.max_line_items`   |
//! | `STOREFRONT_DEFAULT_TAX_EXEMPT`  | `tax.default_tax_exempt`   |
//! | `STOREFRONT_LOG_FILTER`          | `logging.filter`           |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storefront_core::MAX_CART_LINES;
use tracing::{debug, info, warn};

use crate::error::{CheckoutError, CheckoutResult};

// =============================================================================
// Pricing Settings
// =============================================================================

/// How totals are computed and capped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Round the grand total to a whole currency unit.
    #[serde(default = "default_true")]
    pub round_off_totals: bool,

    /// Currency used when the buyer record carries none.
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Largest order/quote accepted, in lines.
    #[serde(default = "default_max_line_items")]
    pub max_line_items: usize,
}

fn default_true() -> bool {
    true
}

fn default_currency_code() -> String {
    "INR".to_string()
}

fn default_max_line_items() -> usize {
    MAX_CART_LINES
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            round_off_totals: default_true(),
            currency_code: default_currency_code(),
            max_line_items: default_max_line_items(),
        }
    }
}

// =============================================================================
// Tax Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxSettings {
    /// Start every session tax-exempt (e.g. SEZ storefronts).
    #[serde(default)]
    pub default_tax_exempt: bool,
}

// =============================================================================
// Logging Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Checkout Configuration
// =============================================================================

/// Complete checkout configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub tax: TaxSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl CheckoutConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CheckoutResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`CheckoutConfig::load`] with a custom variable source.
    pub fn load_with<F>(config_path: Option<PathBuf>, lookup: F) -> CheckoutResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading checkout config from file");
                config = Self::read_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides_from(lookup);
        config.validate()?;

        Ok(config)
    }

    fn read_file(path: &Path) -> CheckoutResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load checkout config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CheckoutResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CheckoutError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Checkout config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CheckoutResult<()> {
        let max = self.pricing.max_line_items;
        if max == 0 || max > MAX_CART_LINES {
            return Err(CheckoutError::InvalidConfig(format!(
                "max_line_items must be between 1 and {}, got {}",
                MAX_CART_LINES, max
            )));
        }

        let code = &self.pricing.currency_code;
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(CheckoutError::InvalidConfig(format!(
                "currency_code must be a 3-letter ISO code, got '{}'",
                code
            )));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(CheckoutError::InvalidConfig("logging filter must not be empty".into()));
        }

        Ok(())
    }

    /// Applies `STOREFRONT_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides read through `lookup`. Unparsable values are
    /// logged and ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("STOREFRONT_ROUND_OFF_TOTALS") {
            match parse_bool(&value) {
                Some(flag) => {
                    debug!(round_off = flag, "Overriding round-off from environment");
                    self.pricing.round_off_totals = flag;
                }
                None => warn!(value = %value, "Invalid STOREFRONT_ROUND_OFF_TOTALS"),
            }
        }

        if let Some(code) = lookup("STOREFRONT_CURRENCY_CODE") {
            debug!(currency = %code, "Overriding currency from environment");
            self.pricing.currency_code = code.trim().to_uppercase();
        }

        if let Some(value) = lookup("STOREFRONT_MAX_LINE_ITEMS") {
            match value.trim().parse::<usize>() {
                Ok(max) => {
                    debug!(max, "Overriding max line items from environment");
                    self.pricing.max_line_items = max;
                }
                Err(_) => warn!(value = %value, "Invalid STOREFRONT_MAX_LINE_ITEMS"),
            }
        }

        if let Some(value) = lookup("STOREFRONT_DEFAULT_TAX_EXEMPT") {
            match parse_bool(&value) {
                Some(flag) => self.tax.default_tax_exempt = flag,
                None => warn!(value = %value, "Invalid STOREFRONT_DEFAULT_TAX_EXEMPT"),
            }
        }

        if let Some(filter) = lookup("STOREFRONT_LOG_FILTER") {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "checkout")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CheckoutConfig::default();
        assert!(config.pricing.round_off_totals);
        assert_eq!(config.pricing.currency_code, "INR");
        assert_eq!(config.pricing.max_line_items, MAX_CART_LINES);
        assert!(!config.tax.default_tax_exempt);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CheckoutConfig::default();

        config.pricing.max_line_items = 0;
        assert!(config.validate().is_err());

        config.pricing.max_line_items = 50;
        config.pricing.currency_code = "rupee".to_string();
        assert!(config.validate().is_err());

        config.pricing.currency_code = "USD".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "[tax]\ndefault_tax_exempt = true\n").unwrap();

        let config = CheckoutConfig::load_with(Some(path), env(&[])).unwrap();
        assert!(config.tax.default_tax_exempt);
        assert!(config.pricing.round_off_totals);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(
            &path,
            "[pricing]\nround_off_totals = false\ncurrency_code = \"USD\"\nmax_line_items = 20\n",
        )
        .unwrap();

        let lookup = env(&[
            ("STOREFRONT_CURRENCY_CODE", "eur"),
            ("STOREFRONT_MAX_LINE_ITEMS", "not-a-number"),
        ]);
        let config = CheckoutConfig::load_with(Some(path), lookup).unwrap();

        assert!(!config.pricing.round_off_totals);
        assert_eq!(config.pricing.currency_code, "EUR");
        // bad env value leaves the file value in place
        assert_eq!(config.pricing.max_line_items, 20);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = CheckoutConfig::load_with(Some(path), env(&[])).unwrap();
        assert_eq!(config, CheckoutConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "[pricing\nround_off_totals = ").unwrap();

        let err = CheckoutConfig::load_with(Some(path), env(&[])).unwrap_err();
        assert!(matches!(err, CheckoutError::TomlDe(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storefront.toml");

        let mut config = CheckoutConfig::default();
        config.pricing.round_off_totals = false;
        config.logging.filter = "debug".to_string();
        config.save(Some(path.clone())).unwrap();

        let toml_str = std::fs::read_to_string(&path).unwrap();
        assert!(toml_str.contains("[pricing]"));
        assert!(toml_str.contains("[logging]"));

        let reloaded = CheckoutConfig::load_with(Some(path), env(&[])).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool(" Yes "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
