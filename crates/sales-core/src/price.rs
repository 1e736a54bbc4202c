//! # Price Module
//!
//! Provides the `Price` type for product unit prices: a fixed-point decimal
//! with precision 10 and scale 2, the same domain as SQL `NUMERIC(10, 2)`.
//!
//! ## Why Not f64?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    9.99_f64 is really 9.9900000000000002131628207280300557613372802... │
//! │                                                                         │
//! │  OUR SOLUTION: Decimal in memory, integer hundredths on disk            │
//! │    Price(9.99)  ──► unit_price = 999 (INTEGER)  ──► Price(9.99)         │
//! │    No step of the round trip ever goes through a float                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sales_core::price::Price;
//!
//! let price: Price = "9.99".parse().unwrap();
//! assert_eq!(price.hundredths(), 999);
//! assert_eq!(price.to_string(), "9.99");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Total significant digits a price may carry.
pub const PRICE_PRECISION: u32 = 10;

/// Digits after the decimal point.
pub const PRICE_SCALE: u32 = 2;

/// Largest magnitude in hundredths: 99,999,999.99.
pub const MAX_HUNDREDTHS: i64 = 9_999_999_999;

/// A unit price with exactly two decimal places.
///
/// Values with more than two decimal places are rounded half-to-even on
/// construction, the way a `NUMERIC(10, 2)` column quantizes its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Creates a price from a decimal value.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use sales_core::price::Price;
    ///
    /// let price = Price::new(Decimal::new(12345, 3)).unwrap(); // 12.345
    /// assert_eq!(price.to_string(), "12.34"); // banker's rounding
    /// ```
    pub fn new(value: Decimal) -> CoreResult<Self> {
        let rounded = value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointNearestEven);

        if rounded.abs() > Decimal::new(MAX_HUNDREDTHS, PRICE_SCALE) {
            return Err(out_of_range(value));
        }

        let mut scaled = rounded;
        scaled.rescale(PRICE_SCALE);
        Ok(Price(scaled))
    }

    /// Creates a price from an integer count of hundredths (cents).
    ///
    /// This is the on-disk representation.
    pub fn from_hundredths(hundredths: i64) -> CoreResult<Self> {
        if hundredths.unsigned_abs() > MAX_HUNDREDTHS.unsigned_abs() {
            return Err(out_of_range(hundredths));
        }
        Ok(Price(Decimal::new(hundredths, PRICE_SCALE)))
    }

    /// Returns the value as a count of hundredths.
    #[inline]
    pub fn hundredths(&self) -> i64 {
        // scale is always PRICE_SCALE and magnitude is bounded by MAX_HUNDREDTHS
        self.0.mantissa() as i64
    }

    /// Returns the exact decimal value.
    #[inline]
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

fn out_of_range(value: impl fmt::Display) -> CoreError {
    CoreError::PriceOutOfRange {
        value: value.to_string(),
        precision: PRICE_PRECISION,
        scale: PRICE_SCALE,
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|e| CoreError::InvalidPrice {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Price::new(value)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = CoreError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Price::new(value)
    }
}

/// Used by row decoding: `unit_price` is stored as INTEGER hundredths.
impl TryFrom<i64> for Price {
    type Error = CoreError;

    fn try_from(hundredths: i64) -> Result<Self, Self::Error> {
        Price::from_hundredths(hundredths)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}
