//! In-memory issuance ledger.
//!
//! Not thread-safe on its own; the sale engine keeps it behind its lock.

use std::collections::{BTreeMap, HashMap};

use stepmint_core::error::LedgerError;
use stepmint_core::traits::IssuanceLedger;
use stepmint_core::types::{Address, ItemId};

/// Ownership records keyed by item id.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    owners: BTreeMap<ItemId, Address>,
    balances: HashMap<Address, u64>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items recorded.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Items held by `owner`, in id order.
    pub fn items_of(&self, owner: &Address) -> Vec<ItemId> {
        self.owners
            .iter()
            .filter(|(_, o)| *o == owner)
            .map(|(id, _)| *id)
            .collect()
    }
}

impl IssuanceLedger for MemoryLedger {
    fn issue(&mut self, owner: Address, item: ItemId) -> Result<(), LedgerError> {
        if owner.is_zero() {
            return Err(LedgerError::InvalidOwner(owner));
        }
        if self.owners.contains_key(&item) {
            return Err(LedgerError::AlreadyIssued(item));
        }
        self.owners.insert(item, owner);
        *self.balances.entry(owner).or_insert(0) += 1;
        Ok(())
    }

    fn owner_of(&self, item: ItemId) -> Option<Address> {
        self.owners.get(&item).copied()
    }

    fn balance_of(&self, owner: &Address) -> u64 {
        self.balances.get(owner).copied().unwrap_or(0)
    }
}
