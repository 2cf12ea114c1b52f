//! # stepmint-pricing — Descending sale price clock.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! The price decays linearly from an anchor `(price, time)`:
//! `max(price - elapsed * decay_rate, floor_price)`.
//! The decay term is checked at every step; any overflow or underflow
//! clamps to the floor, so the curve can never wrap to an enormous value.

pub mod clock;

pub use clock::{current_price, PriceClock};
