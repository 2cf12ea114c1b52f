//! Sale engine: the only mutable authority over sale state.
//!
//! Every purchase runs start to finish under one [`parking_lot::Mutex`]
//! guarding the state and both collaborators. All validation and all
//! arithmetic happen before the first external effect; the new state is
//! written in a single assignment after the ledger accepts the issuance.
//! If issuance fails after a refund was delivered, the refund is reversed
//! with its receipt, so a failed purchase leaves no trace.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use stepmint_core::error::{ConfigError, SaleError, UriError};
use stepmint_core::traits::{IssuanceLedger, PriceCurve, Treasury};
use stepmint_core::types::{Address, Amount, Anchor, ItemId, SaleParameters, Timestamp};
use stepmint_pricing::PriceClock;

use crate::config::SaleConfig;
use crate::state::{SalePhase, SaleState};
use crate::uri::ItemUri;

/// Outcome of a successful purchase.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Purchase {
    /// Id of the newly issued item.
    pub item: ItemId,
    pub buyer: Address,
    /// Amount charged: the decayed price at the purchase time.
    pub price: Amount,
    /// Overpayment returned to the buyer. `price + refund` equals the payment.
    pub refund: Amount,
    /// Anchor in effect for the next purchase.
    pub next_anchor: Anchor,
}

/// Serializable view of a sale's parameters and state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SaleSnapshot {
    pub collection: ItemUri,
    pub params: SaleParameters,
    pub state: SaleState,
}

struct Inner<L, T> {
    state: SaleState,
    ledger: L,
    treasury: T,
}

/// Reverse Dutch auction with mint-triggered repricing.
///
/// Shareable across threads behind an `Arc`; purchases are serialized.
pub struct SaleEngine<L, T> {
    params: SaleParameters,
    clock: PriceClock,
    collection: ItemUri,
    inner: Mutex<Inner<L, T>>,
}

impl<L: IssuanceLedger, T: Treasury> SaleEngine<L, T> {
    /// Build an engine from a validated configuration.
    pub fn new(config: &SaleConfig, ledger: L, treasury: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let params = config.parameters();
        Ok(Self {
            params,
            clock: PriceClock::from_params(&params),
            collection: ItemUri::from_config(config),
            inner: Mutex::new(Inner {
                state: SaleState::new(config.start_anchor()),
                ledger,
                treasury,
            }),
        })
    }

    /// Buy the next item for `buyer` with `payment` at time `now`.
    ///
    /// Returns the new item's id. See [`settle`](Self::settle) for the
    /// full settlement details.
    pub fn purchase(&self, buyer: Address, payment: Amount, now: Timestamp) -> Result<ItemId, SaleError> {
        self.settle(buyer, payment, now).map(|p| p.item)
    }

    /// Buy the next item and report the charged price, refund, and next anchor.
    ///
    /// On any error the sale state, the ledger, and the treasury are left as
    /// they were before the call.
    pub fn settle(&self, buyer: Address, payment: Amount, now: Timestamp) -> Result<Purchase, SaleError> {
        let mut guard = self.inner.lock();
        let Inner { state, ledger, treasury } = &mut *guard;

        let price = self.check_open(state, now)?;
        if payment < price {
            debug!(%buyer, price, paid = payment, "purchase rejected: insufficient payment");
            return Err(SaleError::InsufficientPayment { price, paid: payment });
        }

        let refund = payment.checked_sub(price).ok_or(SaleError::ArithmeticOverflow)?;
        let item = state.issued_count;
        let next = SaleState {
            anchor_price: price
                .checked_add(self.params.price_step)
                .ok_or(SaleError::ArithmeticOverflow)?,
            anchor_time: now,
            issued_count: item.checked_add(1).ok_or(SaleError::ArithmeticOverflow)?,
            proceeds: state.proceeds.saturating_add(price),
        };

        let receipt = if refund > 0 {
            match treasury.payout(buyer, refund) {
                Ok(receipt) => Some(receipt),
                Err(source) => {
                    warn!(%buyer, refund, "refund failed: {source}");
                    return Err(SaleError::RefundFailed { to: buyer, amount: refund, source });
                }
            }
        } else {
            None
        };

        if let Err(source) = ledger.issue(buyer, item) {
            warn!(%buyer, item, "issuance failed: {source}");
            if let Some(receipt) = receipt {
                error!(%buyer, amount = receipt.amount, sequence = receipt.sequence, "reversing refund");
                treasury.reverse_payout(receipt);
            }
            return Err(SaleError::IssuanceFailed { item, source });
        }

        *state = next;
        info!(%buyer, item, price, refund, next_price = next.anchor_price, "item sold");

        Ok(Purchase { item, buyer, price, refund, next_anchor: next.anchor() })
    }

    /// Price a purchase at `now` would settle at.
    pub fn quote(&self, now: Timestamp) -> Result<Amount, SaleError> {
        let guard = self.inner.lock();
        self.check_open(&guard.state, now)
    }

    /// Phase of the sale at `now`.
    pub fn phase(&self, now: Timestamp) -> SalePhase {
        self.inner.lock().state.phase(&self.params, now)
    }

    /// Copy of the current state.
    pub fn state(&self) -> SaleState {
        self.inner.lock().state
    }

    pub fn params(&self) -> &SaleParameters {
        &self.params
    }

    pub fn collection(&self) -> &ItemUri {
        &self.collection
    }

    pub fn remaining_supply(&self) -> u64 {
        self.inner.lock().state.remaining(&self.params)
    }

    pub fn snapshot(&self) -> SaleSnapshot {
        SaleSnapshot {
            collection: self.collection.clone(),
            params: self.params,
            state: self.state(),
        }
    }

    /// Owner of `item` according to the ledger.
    pub fn owner_of(&self, item: ItemId) -> Option<Address> {
        self.inner.lock().ledger.owner_of(item)
    }

    /// URI of an issued item.
    pub fn item_uri(&self, item: ItemId) -> Result<String, UriError> {
        let guard = self.inner.lock();
        self.collection.uri(&guard.ledger, item)
    }

    /// Run `f` with shared access to the ledger and treasury.
    pub fn inspect<R>(&self, f: impl FnOnce(&L, &T) -> R) -> R {
        let guard = self.inner.lock();
        f(&guard.ledger, &guard.treasury)
    }

    /// Time gate, supply gate, and current price.
    fn check_open(&self, state: &SaleState, now: Timestamp) -> Result<Amount, SaleError> {
        if now < state.anchor_time {
            debug!(start = state.anchor_time, now, "purchase rejected: not started");
            return Err(SaleError::NotStarted { start: state.anchor_time, now });
        }
        if state.issued_count >= self.params.supply_cap {
            debug!(cap = self.params.supply_cap, "purchase rejected: sold out");
            return Err(SaleError::SoldOut { cap: self.params.supply_cap });
        }
        Ok(self.clock.price_at(state.anchor(), now))
    }
}
