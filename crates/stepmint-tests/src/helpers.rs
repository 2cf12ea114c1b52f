//! Shared test helpers for integration and adversarial tests.

use stepmint_core::error::{LedgerError, PayoutError};
use stepmint_core::traits::{IssuanceLedger, Treasury};
use stepmint_core::types::{Address, Amount, ItemId, PayoutReceipt};
use stepmint_sale::{MemoryLedger, MemoryTreasury, SaleConfig, SaleEngine};

/// Simple address from a seed byte.
pub fn addr(seed: u8) -> Address {
    Address([seed; 20])
}

/// Sale config with the given curve and a fixed display section.
pub fn sale_config(
    start_price: Amount,
    start_time: u64,
    floor_price: Amount,
    decay_rate: Amount,
    price_step: Amount,
    supply_cap: u64,
) -> SaleConfig {
    SaleConfig {
        start_price,
        start_time,
        floor_price,
        decay_rate,
        price_step,
        supply_cap,
        name: "Test Steps".to_string(),
        symbol: "TST".to_string(),
        base_uri: "https://items.example/".to_string(),
    }
}

/// Engine backed by the in-memory ledger and treasury.
pub fn memory_engine(cfg: &SaleConfig) -> SaleEngine<MemoryLedger, MemoryTreasury> {
    SaleEngine::new(cfg, MemoryLedger::new(), MemoryTreasury::new()).unwrap()
}

/// Ledger wrapper that fails the issuance of one chosen item id.
///
/// Models a ledger that rejects after the engine's own checks passed,
/// forcing the engine down its refund-reversal path.
#[derive(Debug, Default)]
pub struct FlakyLedger {
    pub inner: MemoryLedger,
    pub fail_on: Option<ItemId>,
}

impl IssuanceLedger for FlakyLedger {
    fn issue(&mut self, owner: Address, item: ItemId) -> Result<(), LedgerError> {
        if self.fail_on == Some(item) {
            return Err(LedgerError::Unavailable(format!("injected failure for item {item}")));
        }
        self.inner.issue(owner, item)
    }

    fn owner_of(&self, item: ItemId) -> Option<Address> {
        self.inner.owner_of(item)
    }

    fn balance_of(&self, owner: &Address) -> u64 {
        self.inner.balance_of(owner)
    }
}

/// Treasury wrapper that counts calls, for asserting exactly-once delivery.
#[derive(Debug, Default)]
pub struct CountingTreasury {
    pub inner: MemoryTreasury,
    pub payouts: usize,
    pub reversals: usize,
}

impl Treasury for CountingTreasury {
    fn payout(&mut self, to: Address, amount: Amount) -> Result<PayoutReceipt, PayoutError> {
        self.payouts += 1;
        self.inner.payout(to, amount)
    }

    fn reverse_payout(&mut self, receipt: PayoutReceipt) {
        self.reversals += 1;
        self.inner.reverse_payout(receipt);
    }
}
