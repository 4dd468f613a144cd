//! Exact decimal conversion for API quantities
//!
//! Floats are converted through their shortest round-trip text, so a value
//! printed as `24.390015` becomes exactly `24.390015` and not the expansion
//! of its binary representation.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{Error, Result};

/// A numeric value as received from a caller or an API payload
#[derive(Debug, Clone, PartialEq)]
pub enum Quantity {
    /// Binary floating-point value
    Float(f64),
    /// Integer value
    Integer(i64),
    /// Decimal text
    Text(String),
}

impl Quantity {
    /// Build from a JSON scalar
    ///
    /// Numbers and strings map onto a quantity, anything else is `None`.
    /// Integers too large for `i64` are kept as text.
    pub fn from_json(value: &Value) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Convert to an exact decimal
    pub fn to_decimal(&self) -> Result<Decimal> {
        match self {
            Self::Float(f) => parse_decimal(&f.to_string()),
            Self::Integer(i) => Ok(Decimal::from(*i)),
            Self::Text(s) => parse_decimal(s),
        }
    }
}

impl TryFrom<&Value> for Quantity {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
                (Some(i), _, _) => Ok(Self::Integer(i)),
                (None, Some(u), _) => Ok(Self::from(u)),
                (None, None, Some(f)) => Ok(Self::Float(f)),
                _ => Err(Error::InvalidQuantity(value.to_string())),
            },
            Value::String(s) => Ok(Self::Text(s.clone())),
            other => Err(Error::InvalidQuantity(other.to_string())),
        }
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for Quantity {
    fn from(value: f32) -> Self {
        // Shortest text of the f32 itself, not of its widened f64
        Self::Text(value.to_string())
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Quantity {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Self::Integer(i),
            Err(_) => Self::Text(value.to_string()),
        }
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Quantity {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Convert an optional quantity to an exact decimal
///
/// `None` stays `None`. Text that is not a valid decimal, floats that are not
/// finite, and values that cannot be held without rounding (more than 28
/// fractional digits, or beyond the 96-bit range) fail with
/// [`Error::Decimal`](crate::Error::Decimal).
pub fn as_decimal(value: Option<Quantity>) -> Result<Option<Decimal>> {
    value.as_ref().map(Quantity::to_decimal).transpose()
}

fn parse_decimal(text: &str) -> Result<Decimal> {
    let text = text.trim();
    let Some((mantissa, exponent)) = text.split_once(['e', 'E']) else {
        return Ok(Decimal::from_str_exact(text)?);
    };

    let mut value = Decimal::from_str_exact(mantissa)?;
    let exponent: i64 = exponent.parse().map_err(|_| {
        rust_decimal::Error::ErrorString(format!("Invalid exponent in {text}"))
    })?;

    if exponent < 0 {
        let scale = u32::try_from(i64::from(value.scale()) - exponent)
            .map_err(|_| rust_decimal::Error::ScaleExceedsMaximumPrecision(u32::MAX))?;
        // Fails above 28 instead of rounding
        value.set_scale(scale)?;
    } else if !value.is_zero() {
        for _ in 0..exponent {
            value = value
                .checked_mul(Decimal::TEN)
                .ok_or(rust_decimal::Error::ExceedsMaximumPossibleValue)?;
        }
    }

    Ok(value)
}
