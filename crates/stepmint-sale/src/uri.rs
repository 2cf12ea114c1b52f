//! Item URI formatting: a fixed prefix followed by the decimal item id.

use serde::{Deserialize, Serialize};
use stepmint_core::error::UriError;
use stepmint_core::traits::IssuanceLedger;
use stepmint_core::types::ItemId;

use crate::config::SaleConfig;

/// Display metadata for the collection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ItemUri {
    pub name: String,
    pub symbol: String,
    pub base_uri: String,
}

impl ItemUri {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, base_uri: impl Into<String>) -> Self {
        Self { name: name.into(), symbol: symbol.into(), base_uri: base_uri.into() }
    }

    pub fn from_config(cfg: &SaleConfig) -> Self {
        Self::new(cfg.name.clone(), cfg.symbol.clone(), cfg.base_uri.clone())
    }

    /// URI of an issued item. Unissued ids are rejected.
    pub fn uri<L: IssuanceLedger + ?Sized>(&self, ledger: &L, item: ItemId) -> Result<String, UriError> {
        if !ledger.exists(item) {
            return Err(UriError::NonexistentItem(item));
        }
        Ok(format!("{}{}", self.base_uri, item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use stepmint_core::types::Address;

    #[test]
    fn formats_prefix_and_decimal_id() {
        let mut ledger = MemoryLedger::new();
        ledger.issue(Address([1; 20]), 0).unwrap();
        ledger.issue(Address([1; 20]), 1).unwrap();
        let u = ItemUri::new("Steps", "STP", "ipfs://abc/");
        assert_eq!(u.uri(&ledger, 0).unwrap(), "ipfs://abc/0");
        assert_eq!(u.uri(&ledger, 1).unwrap(), "ipfs://abc/1");
    }

    #[test]
    fn empty_prefix_yields_bare_id() {
        let mut ledger = MemoryLedger::new();
        ledger.issue(Address([1; 20]), 12).unwrap();
        let u = ItemUri::new("", "", "");
        assert_eq!(u.uri(&ledger, 12).unwrap(), "12");
    }

    #[test]
    fn rejects_unissued_item() {
        let ledger = MemoryLedger::new();
        let u = ItemUri::new("Steps", "STP", "ipfs://abc/");
        assert_eq!(u.uri(&ledger, 3).unwrap_err(), UriError::NonexistentItem(3));
    }

    #[test]
    fn works_through_dyn_ledger() {
        let mut ledger = MemoryLedger::new();
        ledger.issue(Address([2; 20]), 0).unwrap();
        let dyn_ledger: &dyn IssuanceLedger = &ledger;
        let u = ItemUri::new("a", "b", "x/");
        assert_eq!(u.uri(dyn_ledger, 0).unwrap(), "x/0");
    }
}
