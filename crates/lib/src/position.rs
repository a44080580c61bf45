//! Position value type used for ordering items within a scope.
//!
//! A `Position` is an exact decimal number. It is compared numerically and
//! serialized as a plain decimal string, never as a native binary float, so
//! the value survives language and database boundaries without silent
//! precision loss.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::DEFAULT_INCREMENT;

/// An orderable position within a sibling scope.
///
/// Internally an exact decimal, so chains of midpoint bisections do not
/// accumulate binary rounding error. The wire representation is the decimal
/// string form (`"1000"`, `"562.5"`), with trailing zeros stripped.
///
/// Two siblings in the same scope must never share a position; ordering by
/// position ascending yields the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position(Decimal);

impl Position {
    /// The zero position. Used when pinning an existing first item in place
    /// so that a new item can be inserted before it.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a position from an exact decimal value.
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// The default spacing unit, `DEFAULT_INCREMENT` as a position.
    pub fn default_increment() -> Self {
        Self(Decimal::from(DEFAULT_INCREMENT))
    }

    /// The before-first sentinel, `-DEFAULT_INCREMENT` as a position.
    ///
    /// Returned by midpoint calculation when an item is placed before a first
    /// item that sits at or below zero; the mover pins that neighbor to zero
    /// in the same call.
    pub fn negative_increment() -> Self {
        Self(Decimal::from(-DEFAULT_INCREMENT))
    }

    /// Parses a wire string into a position, returning `None` on malformed
    /// input instead of an error.
    ///
    /// Client-supplied neighbor positions can be stale or corrupt; index
    /// arithmetic degrades to defaults rather than failing, and this is the
    /// single place that degradation happens.
    pub fn parse_lossy(s: &str) -> Option<Self> {
        Decimal::from_str(s.trim()).ok().map(Self)
    }

    /// Returns the underlying decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// True when the position is at or below zero.
    pub fn is_at_most_zero(&self) -> bool {
        self.0 <= Decimal::ZERO
    }

    /// Returns the value exactly halfway between `self` and `other`.
    pub fn midpoint_with(&self, other: &Self) -> Self {
        Self((self.0 + other.0) / Decimal::from(2))
    }

    /// Returns half of this position.
    pub fn halve(&self) -> Self {
        Self(self.0 / Decimal::from(2))
    }

    /// Number of digits after the decimal point, trailing zeros stripped.
    ///
    /// This is the precision proxy the drift detector compares against
    /// [`REBALANCE_THRESHOLD`](crate::constants::REBALANCE_THRESHOLD).
    pub fn fraction_digits(&self) -> u32 {
        self.0.normalize().scale()
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position(self.0 + rhs.0)
    }
}

impl From<Decimal> for Position {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Position {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl FromStr for Position {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Normalize so arithmetic artifacts like "1500.0" never reach the wire.
        write!(f, "{}", self.0.normalize())
    }
}

// Hand-written serde keeps the wire contract string-typed regardless of the
// rust_decimal feature set in use.
impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Position::from_str(&s).map_err(serde::de::Error::custom)
    }
}
