//! Sale configuration.
//!
//! Provides [`SaleConfig`], the write-once parameter set a [`SaleEngine`]
//! is constructed from. Loaded from a TOML file with `STEPMINT_*`
//! environment overrides, or built programmatically.
//!
//! Amounts may be written as TOML integers or as decimal strings; the
//! latter allows values above `i64::MAX`. Environment overrides are always
//! read as strings, so `STEPMINT_START_PRICE=20000000000000000000000` keeps
//! full precision.
//!
//! [`SaleEngine`]: crate::engine::SaleEngine

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use stepmint_core::constants::{DEFAULT_BASE_URI, DEFAULT_NAME, DEFAULT_SYMBOL, ENV_PREFIX};
use stepmint_core::error::ConfigError;
use stepmint_core::types::{Amount, Anchor, SaleParameters, Timestamp};

/// Configuration for a sale instance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SaleConfig {
    /// Anchor price in effect at `start_time`.
    #[serde(deserialize_with = "de_amount")]
    pub start_price: Amount,
    /// Sale start; purchases before it are rejected.
    pub start_time: Timestamp,
    /// Minimum unit price.
    #[serde(deserialize_with = "de_amount")]
    pub floor_price: Amount,
    /// Price reduction per second.
    #[serde(deserialize_with = "de_amount")]
    pub decay_rate: Amount,
    /// Increase applied after each sale.
    #[serde(deserialize_with = "de_amount")]
    pub price_step: Amount,
    /// Maximum number of items.
    pub supply_cap: u64,
    /// Collection name (display only).
    #[serde(default = "default_name")]
    pub name: String,
    /// Collection symbol (display only).
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Prefix for item URIs.
    #[serde(default = "default_base_uri")]
    pub base_uri: String,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_symbol() -> String {
    DEFAULT_SYMBOL.to_string()
}

fn default_base_uri() -> String {
    DEFAULT_BASE_URI.to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Int(u64),
    Text(String),
}

/// Deserialize an [`Amount`] from an unsigned integer or a decimal string.
///
/// Strings may carry surrounding whitespace and `_` digit separators.
pub fn de_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
    match AmountRepr::deserialize(deserializer)? {
        AmountRepr::Int(v) => Ok(v as Amount),
        AmountRepr::Text(s) => s
            .trim()
            .replace('_', "")
            .parse::<Amount>()
            .map_err(|e| serde::de::Error::custom(format!("invalid amount {s:?}: {e}"))),
    }
}

impl SaleConfig {
    /// Load from a TOML file, applying `STEPMINT_*` environment overrides, then validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        Self::from_settings(settings)
    }

    /// Parse from a TOML string without environment overrides, then validate.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        Self::from_settings(settings)
    }

    fn from_settings(settings: ::config::Config) -> Result<Self, ConfigError> {
        let cfg: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.supply_cap == 0 {
            return Err(ConfigError::ZeroSupply);
        }
        if self.start_price < self.floor_price {
            return Err(ConfigError::StartBelowFloor {
                start: self.start_price,
                floor: self.floor_price,
            });
        }
        Ok(())
    }

    /// The immutable pricing and supply parameters.
    pub fn parameters(&self) -> SaleParameters {
        SaleParameters {
            floor_price: self.floor_price,
            decay_rate: self.decay_rate,
            price_step: self.price_step,
            supply_cap: self.supply_cap,
        }
    }

    /// The initial decay anchor.
    pub fn start_anchor(&self) -> Anchor {
        Anchor::new(self.start_price, self.start_time)
    }
}
