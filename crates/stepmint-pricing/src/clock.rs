//! Price clock implementing the [`PriceCurve`] trait.
//!
//! Linear decay from the last sale anchor, clamped at the floor price.
//! All arithmetic is integer-only with checked u128 operations.

use serde::{Deserialize, Serialize};
use stepmint_core::traits::PriceCurve;
use stepmint_core::types::{Amount, Anchor, SaleParameters, Timestamp};

/// Current sale price for a decay window starting at `(anchor_price, anchor_time)`.
///
/// Computes `max(anchor_price - (now - anchor_time) * decay_rate, floor_price)`.
/// If the decay term overflows or exceeds `anchor_price`, the result is
/// exactly `floor_price`.
///
/// Callers must not pass `now < anchor_time`; such input is treated as zero
/// elapsed time.
pub fn current_price(
    anchor_price: Amount,
    anchor_time: Timestamp,
    now: Timestamp,
    decay_rate: Amount,
    floor_price: Amount,
) -> Amount {
    debug_assert!(now >= anchor_time, "price queried before anchor: {now} < {anchor_time}");
    let elapsed = now.saturating_sub(anchor_time) as u128;

    elapsed
        .checked_mul(decay_rate)
        .and_then(|decay| anchor_price.checked_sub(decay))
        .map_or(floor_price, |raw| raw.max(floor_price))
}

/// The production price curve: linear decay with a floor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceClock {
    /// Price reduction per second.
    pub decay_rate: Amount,
    /// Minimum price.
    pub floor_price: Amount,
}

impl PriceClock {
    /// Create a new PriceClock.
    pub fn new(decay_rate: Amount, floor_price: Amount) -> Self {
        Self { decay_rate, floor_price }
    }

    /// Clock using the decay parameters of a sale.
    pub fn from_params(params: &SaleParameters) -> Self {
        Self::new(params.decay_rate, params.floor_price)
    }
}

impl PriceCurve for PriceClock {
    fn price_at(&self, anchor: Anchor, now: Timestamp) -> Amount {
        current_price(anchor.price, anchor.time, now, self.decay_rate, self.floor_price)
    }

    fn floor_price(&self) -> Amount {
        self.floor_price
    }

    fn floor_reached_at(&self, anchor: Anchor) -> Option<Timestamp> {
        if anchor.price <= self.floor_price {
            return Some(anchor.time);
        }
        if self.decay_rate == 0 {
            return None;
        }

        // elapsed = ceil((price - floor) / rate)
        let gap = anchor.price - self.floor_price;
        let elapsed = gap.div_ceil(self.decay_rate);
        let elapsed = Timestamp::try_from(elapsed).ok()?;
        anchor.time.checked_add(elapsed)
    }
}
