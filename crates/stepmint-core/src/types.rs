//! Core sale types: addresses, price anchors, sale parameters.
//!
//! All monetary values are in base units (see [`COIN`](crate::constants::COIN)).
//! Amounts use u128, timestamps are u64 seconds, item ids are u64.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::ADDRESS_LEN;
use crate::error::AddressError;

/// Monetary amount in base units.
pub type Amount = u128;

/// Timestamp in seconds, supplied by the host environment.
pub type Timestamp = u64;

/// Identifier of an issued item. Assigned densely from 0.
pub type ItemId = u64;

/// A 20-byte account identity.
///
/// Displays as `0x`-prefixed lowercase hex and serializes the same way.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// The null address (20 zero bytes). Never a valid item owner.
    pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

    /// Create an Address from a byte array.
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Check if this is the null address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(AddressError::InvalidLength(digits.len()));
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

/// The `(price, time)` pair the current decayed price is computed from.
///
/// Re-anchored after every sale to `(settled_price + price_step, sale_time)`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Anchor {
    /// Price in effect at `time`, before decay.
    pub price: Amount,
    /// Start of the current decay window.
    pub time: Timestamp,
}

impl Anchor {
    pub fn new(price: Amount, time: Timestamp) -> Self {
        Self { price, time }
    }
}

/// Proof of a delivered payout, used to reverse it if the enclosing purchase fails.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayoutReceipt {
    /// Recipient credited by the payout.
    pub to: Address,
    /// Amount credited.
    pub amount: Amount,
    /// Treasury-assigned sequence number.
    pub sequence: u64,
}

/// Immutable sale parameters, fixed at construction.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaleParameters {
    /// Minimum unit price; the decay curve never goes below it.
    pub floor_price: Amount,
    /// Price reduction per second elapsed since the anchor.
    pub decay_rate: Amount,
    /// Increase added to the settled price after each sale.
    pub price_step: Amount,
    /// Maximum number of items ever issuable. Always positive.
    pub supply_cap: u64,
}
