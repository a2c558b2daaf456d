//! # Checkout Configuration
//!
//! Logging filter and pricing tables for checkout processes.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CARTAGE_LOG=info,cartage=trace                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     explicit path, else $CARTAGE_CONFIG, else                          │
//! │     ~/.config/cartage/checkout.toml (Linux)                            │
//! │     ~/Library/Application Support/com.cartage.cartage/checkout.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     PricingPolicy::STANDARD, filter "info,cartage=debug"               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # checkout.toml
//! [logging]
//! filter = "info,cartage=debug"
//!
//! [pricing.freight]
//! minimum_fee = "12.00"
//! fragile_fee_per_unit = "5.00"
//!
//! [pricing.regions]
//! north = "1.30"
//! midwest = "1.20"
//!
//! [pricing.loyalty]
//! silver = 5000   # basis points
//! ```
//!
//! Every section is optional; missing values take the standard tables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use cartage_core::PricingPolicy;

use crate::error::ConfigResult;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "CARTAGE_CONFIG";

/// Environment variable overriding the log filter.
pub const LOG_FILTER_ENV: &str = "CARTAGE_LOG";

/// Log filter used when nothing else is configured.
pub const DEFAULT_LOG_FILTER: &str = "info,cartage=debug";

// =============================================================================
// Sections
// =============================================================================

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives. `RUST_LOG` still wins when set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

/// Complete checkout configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Pricing tables. Immutable once an engine is built from them.
    #[serde(default)]
    pub pricing: PricingPolicy,
}

impl CheckoutConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (checkout.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading checkout config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load checkout config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document without touching the environment.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.pricing.validate()?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(filter) = std::env::var(LOG_FILTER_ENV) {
            debug!(filter = %filter, "Overriding log filter from environment");
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cartage", "cartage")
            .map(|dirs| dirs.config_dir().join("checkout.toml"))
    }
}
