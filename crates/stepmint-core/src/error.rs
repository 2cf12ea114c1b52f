//! Error types for the stepmint sale engine.
use thiserror::Error;

use crate::types::{Address, Amount, ItemId, Timestamp};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaleError {
    #[error("sale not started: starts at {start}, now {now}")] NotStarted { start: Timestamp, now: Timestamp },
    #[error("sold out: all {cap} items issued")] SoldOut { cap: u64 },
    #[error("insufficient payment: price {price}, paid {paid}")] InsufficientPayment { price: Amount, paid: Amount },
    #[error("refund of {amount} to {to} failed: {source}")] RefundFailed { to: Address, amount: Amount, source: PayoutError },
    #[error("issuance of item {item} failed: {source}")] IssuanceFailed { item: ItemId, source: LedgerError },
    #[error("arithmetic overflow")] ArithmeticOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid owner: {0}")] InvalidOwner(Address),
    #[error("item already issued: {0}")] AlreadyIssued(ItemId),
    #[error("ledger unavailable: {0}")] Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayoutError {
    #[error("recipient {0} rejected funds")] Rejected(Address),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    #[error("nonexistent item: {0}")] NonexistentItem(ItemId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid length: {0} hex digits")] InvalidLength(usize),
    #[error("invalid hex: {0}")] InvalidHex(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("supply cap must be positive")] ZeroSupply,
    #[error("start price {start} below floor {floor}")] StartBelowFloor { start: Amount, floor: Amount },
    #[error("load: {0}")] Load(String),
}

#[derive(Error, Debug)]
pub enum StepmintError {
    #[error(transparent)] Sale(#[from] SaleError),
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Payout(#[from] PayoutError),
    #[error(transparent)] Uri(#[from] UriError),
    #[error(transparent)] Address(#[from] AddressError),
    #[error(transparent)] Config(#[from] ConfigError),
}
