//! Exact decimal values for prices and quantities
//!
//! Exchanges quote prices as decimal strings. `Fixed` keeps them exact so that
//! two venues quoting "49950.00" and "49950" compare equal and the tie-break
//! between them is decided by configuration order, not by float rounding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display};
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Exact decimal number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed {
    value: Decimal,
}

impl Fixed {
    pub const ZERO: Fixed = Fixed { value: Decimal::ZERO };

    pub const ONE: Fixed = Fixed { value: Decimal::ONE };

    pub fn from_i64(value: i64) -> Self {
        Fixed { value: Decimal::from(value) }
    }

    /// Parse a decimal string exactly, also accepting exponent form ("1e-5")
    pub fn from_str_exact(s: &str) -> Result<Self, FixedError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(FixedError::Empty);
        }
        let value = Decimal::from_str_exact(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| FixedError::InvalidValue(s.to_string()))?;
        Ok(Fixed { value })
    }

    /// Plain positional notation only. Order amounts go on the wire as typed
    /// and neither venue accepts an exponent there.
    pub fn from_plain_str(s: &str) -> Result<Self, FixedError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(FixedError::Empty);
        }
        let value = Decimal::from_str_exact(trimmed).map_err(|_| FixedError::InvalidValue(s.to_string()))?;
        Ok(Fixed { value })
    }

    /// Parse a JSON price field, which exchanges send either as a string or a number
    pub fn from_json(value: &Value) -> Result<Self, FixedError> {
        match value {
            Value::String(s) => Self::from_str_exact(s),
            Value::Number(n) => Self::from_str_exact(&n.to_string()),
            Value::Null => Err(FixedError::Empty),
            other => Err(FixedError::InvalidValue(other.to_string())),
        }
    }

    /// Strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Fixed { value: self.value.abs() }
    }

    /// Drop trailing zeros, "49950.00" -> "49950"
    pub fn normalize(&self) -> Self {
        Fixed { value: self.value.normalize() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixedError {
    #[error("Empty decimal value")]
    Empty,
    #[error("Invalid decimal value: {0}")]
    InvalidValue(String),
}

impl Add for Fixed {
    type Output = Fixed;

    fn add(self, rhs: Self) -> Self::Output {
        Fixed { value: self.value + rhs.value }
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    fn sub(self, rhs: Self) -> Self::Output {
        Fixed { value: self.value - rhs.value }
    }
}

impl Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for Fixed {
    type Err = FixedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_exact(s)
    }
}

/// Build a `Fixed` from a literal, panicking on malformed input (tests and constants)
#[macro_export]
macro_rules! fixed {
    ($value:expr) => {
        $crate::fixed::Fixed::from_str_exact(stringify!($value)).unwrap()
    };
}
