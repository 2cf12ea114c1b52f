//! Sale constants. All monetary values in base units (1 MINT = 10^18 base units).

use crate::types::Amount;

/// Base units per whole coin.
pub const COIN: Amount = 1_000_000_000_000_000_000;

/// Length in bytes of a buyer [`Address`](crate::types::Address).
pub const ADDRESS_LEN: usize = 20;

/// Environment variable prefix for configuration overrides (`STEPMINT_DECAY_RATE`, ...).
pub const ENV_PREFIX: &str = "STEPMINT";

/// Default collection name used when a config omits `name`.
pub const DEFAULT_NAME: &str = "Stepmint";

/// Default collection symbol used when a config omits `symbol`.
pub const DEFAULT_SYMBOL: &str = "STEP";

/// Default item URI prefix used when a config omits `base_uri`.
pub const DEFAULT_BASE_URI: &str = "";
