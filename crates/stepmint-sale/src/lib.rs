//! # stepmint-sale — Reverse Dutch auction with mint-triggered repricing.
//!
//! - **SaleEngine**: serializes purchases behind a single lock, prices them
//!   with the [`PriceClock`](stepmint_pricing::PriceClock), settles the
//!   overpayment refund, issues the item, and re-anchors the price at
//!   `settled + price_step`.
//! - **SaleConfig**: write-once parameters loaded from TOML and `STEPMINT_*`
//!   environment overrides.
//! - **MemoryLedger / MemoryTreasury**: in-memory collaborators for tests and
//!   simulation.
//! - **ItemUri**: `base_uri + id` formatting for issued items.

pub mod config;
pub mod engine;
pub mod ledger;
pub mod state;
pub mod treasury;
pub mod uri;

pub use crate::config::{de_amount, SaleConfig};
pub use engine::{Purchase, SaleEngine, SaleSnapshot};
pub use ledger::MemoryLedger;
pub use state::{SalePhase, SaleState};
pub use treasury::MemoryTreasury;
pub use uri::ItemUri;
