//! Trait interfaces for the stepmint sale engine.
//!
//! These traits define the contracts between crates:
//! - [`PriceCurve`] — pure price computation (stepmint-pricing implements)
//! - [`IssuanceLedger`] — system of record for item ownership
//! - [`Treasury`] — delivery of overpayment refunds
//!
//! stepmint-sale ships in-memory implementations of the latter two.

use crate::error::{LedgerError, PayoutError};
use crate::types::{Address, Amount, Anchor, ItemId, PayoutReceipt, Timestamp};

/// Pure computation of the decayed sale price.
///
/// All price math is integer-only and total: overflow or underflow in the
/// decay term clamps to the floor instead of wrapping.
pub trait PriceCurve: Send + Sync {
    /// Price at `now` for a decay window starting at `anchor`.
    ///
    /// `now` must not precede `anchor.time`.
    fn price_at(&self, anchor: Anchor, now: Timestamp) -> Amount;

    /// The minimum price the curve is clamped to.
    fn floor_price(&self) -> Amount;

    /// Earliest timestamp at which the curve starting at `anchor` reaches the floor.
    ///
    /// Returns `None` if the curve never reaches it (zero decay above the floor)
    /// or the timestamp is not representable.
    fn floor_reached_at(&self, anchor: Anchor) -> Option<Timestamp>;

    /// Whether the price at `now` is the floor.
    ///
    /// Default implementation compares [`price_at`](Self::price_at) with
    /// [`floor_price`](Self::floor_price).
    fn at_floor(&self, anchor: Anchor, now: Timestamp) -> bool {
        self.price_at(anchor, now) == self.floor_price()
    }
}

/// System of record for item ownership.
///
/// The sale engine only proposes strictly increasing ids; the ledger is
/// responsible for rejecting collisions.
pub trait IssuanceLedger: Send {
    /// Record `owner` as the owner of the new item `item`.
    fn issue(&mut self, owner: Address, item: ItemId) -> Result<(), LedgerError>;

    /// Current owner of `item`, or `None` if it was never issued.
    fn owner_of(&self, item: ItemId) -> Option<Address>;

    /// Whether `item` has an owner.
    ///
    /// Default implementation delegates to [`owner_of`](Self::owner_of).
    fn exists(&self, item: ItemId) -> bool {
        self.owner_of(item).is_some()
    }

    /// Number of items held by `owner`.
    fn balance_of(&self, owner: &Address) -> u64;
}

/// Delivery of funds back to buyers.
pub trait Treasury: Send {
    /// Credit `amount` to `to`. The returned receipt reverses the credit.
    fn payout(&mut self, to: Address, amount: Amount) -> Result<PayoutReceipt, PayoutError>;

    /// Undo a payout previously returned by [`payout`](Self::payout).
    fn reverse_payout(&mut self, receipt: PayoutReceipt);
}
