//! Mutable sale state and the phase derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;
use stepmint_core::types::{Amount, Anchor, SaleParameters, Timestamp};

/// Lifecycle phase of a sale at a given instant.
///
/// Derived from [`SaleState`] and the query time, never stored.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SalePhase {
    /// `now` precedes the anchor time (the configured start before the first sale).
    NotStarted,
    /// Items remain and the sale has started.
    Open,
    /// Every item has been issued. Terminal.
    Exhausted,
}

impl fmt::Display for SalePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotStarted => "not started",
            Self::Open => "open",
            Self::Exhausted => "exhausted",
        };
        f.write_str(s)
    }
}

/// Mutable sale state, owned by the engine.
///
/// Replaced as a whole on each successful purchase; a failed purchase
/// leaves it untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleState {
    /// Price at `anchor_time` before decay.
    pub anchor_price: Amount,
    /// Start of the current decay window.
    pub anchor_time: Timestamp,
    /// Items sold so far. Also the id of the next item.
    pub issued_count: u64,
    /// Sum of settled prices, saturating at `Amount::MAX`.
    pub proceeds: Amount,
}

impl SaleState {
    /// Fresh state anchored at the configured start.
    pub fn new(start: Anchor) -> Self {
        Self {
            anchor_price: start.price,
            anchor_time: start.time,
            issued_count: 0,
            proceeds: 0,
        }
    }

    pub fn anchor(&self) -> Anchor {
        Anchor::new(self.anchor_price, self.anchor_time)
    }

    /// Phase at `now`, checked in the order a purchase checks them.
    pub fn phase(&self, params: &SaleParameters, now: Timestamp) -> SalePhase {
        if now < self.anchor_time {
            SalePhase::NotStarted
        } else if self.issued_count >= params.supply_cap {
            SalePhase::Exhausted
        } else {
            SalePhase::Open
        }
    }

    /// Items still available.
    pub fn remaining(&self, params: &SaleParameters) -> u64 {
        params.supply_cap.saturating_sub(self.issued_count)
    }
}
