//! In-memory treasury for refunds.
//!
//! Records credited amounts per recipient. Recipients registered with
//! [`MemoryTreasury::refuse`] reject every payout, the way a contract
//! without a payable fallback refuses incoming funds.

use std::collections::{HashMap, HashSet};

use stepmint_core::error::PayoutError;
use stepmint_core::traits::Treasury;
use stepmint_core::types::{Address, Amount, PayoutReceipt};

#[derive(Debug, Clone, Default)]
pub struct MemoryTreasury {
    credited: HashMap<Address, Amount>,
    refusing: HashSet<Address>,
    total_paid: Amount,
    next_sequence: u64,
}

impl MemoryTreasury {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `addr` reject all future payouts.
    pub fn refuse(&mut self, addr: Address) {
        self.refusing.insert(addr);
    }

    /// Total credited to `addr` and not reversed.
    pub fn credited(&self, addr: &Address) -> Amount {
        self.credited.get(addr).copied().unwrap_or(0)
    }

    /// Total credited across all recipients.
    pub fn total_paid(&self) -> Amount {
        self.total_paid
    }
}

impl Treasury for MemoryTreasury {
    fn payout(&mut self, to: Address, amount: Amount) -> Result<PayoutReceipt, PayoutError> {
        if self.refusing.contains(&to) {
            return Err(PayoutError::Rejected(to));
        }
        *self.credited.entry(to).or_insert(0) += amount;
        self.total_paid += amount;
        self.next_sequence += 1;
        Ok(PayoutReceipt { to, amount, sequence: self.next_sequence })
    }

    fn reverse_payout(&mut self, receipt: PayoutReceipt) {
        if let Some(balance) = self.credited.get_mut(&receipt.to) {
            *balance = balance.saturating_sub(receipt.amount);
            if *balance == 0 {
                self.credited.remove(&receipt.to);
            }
        }
        self.total_paid = self.total_paid.saturating_sub(receipt.amount);
    }
}
