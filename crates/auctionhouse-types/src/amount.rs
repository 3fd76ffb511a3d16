//! Token amounts in base units.
//!
//! All escrow and settlement arithmetic runs on integer base units so that
//! the platform fee floors exactly. Human-readable token values (e.g. `"12.5"`
//! with 18 decimals) are converted through [`rust_decimal::Decimal`] at the
//! edges only.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{AuctionError, Result};

/// Largest scale a `Decimal` can carry.
const MAX_DECIMAL_SCALE: u32 = 28;

/// An amount of the auction's payment token, in base units.
///
/// Serialized as a decimal string so 18-decimal values survive JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Amount(pub u128);

impl Amount {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(u128::MAX);

    #[must_use]
    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    #[must_use]
    pub const fn get(self) -> u128 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if the sum exceeds `u128::MAX`.
    pub fn try_add(self, rhs: Self) -> Result<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(AuctionError::AmountOverflow)
    }

    /// Checked subtraction.
    ///
    /// # Errors
    /// Returns `AmountUnderflow` if `rhs > self`.
    pub fn try_sub(self, rhs: Self) -> Result<Self> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or(AuctionError::AmountUnderflow)
    }

    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// `floor(self * percent / 100)`.
    ///
    /// Splits `self` into `100q + r` so the product never exceeds `self`
    /// for `percent <= 100`.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if `percent > 100` pushes the result past `u128`.
    pub fn percent_floor(self, percent: u32) -> Result<Self> {
        let pct = u128::from(percent);
        let q = self.0 / 100;
        let r = self.0 % 100;
        q.checked_mul(pct)
            .and_then(|whole| whole.checked_add(r * pct / 100))
            .map(Self)
            .ok_or(AuctionError::AmountOverflow)
    }

    /// Convert a human-readable token value into base units.
    ///
    /// # Errors
    /// - `InvalidAmount` if `tokens` is negative or finer than `decimals` allows
    /// - `AmountOverflow` if the scaled value does not fit
    pub fn from_tokens(tokens: Decimal, decimals: u32) -> Result<Self> {
        if decimals > MAX_DECIMAL_SCALE {
            return Err(AuctionError::InvalidAmount {
                reason: format!("token decimals {decimals} exceed {MAX_DECIMAL_SCALE}"),
            });
        }
        if tokens.is_sign_negative() && !tokens.is_zero() {
            return Err(AuctionError::InvalidAmount {
                reason: format!("negative token amount {tokens}"),
            });
        }
        let scale = Decimal::from_i128_with_scale(10_i128.pow(decimals), 0);
        let scaled = tokens
            .checked_mul(scale)
            .ok_or(AuctionError::AmountOverflow)?;
        if !scaled.fract().is_zero() {
            return Err(AuctionError::InvalidAmount {
                reason: format!("{tokens} has more than {decimals} decimal places"),
            });
        }
        scaled
            .to_u128()
            .map(Self)
            .ok_or(AuctionError::AmountOverflow)
    }

    /// Render base units as a token value with `decimals` places.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if the amount exceeds `Decimal`'s 96-bit mantissa.
    pub fn to_tokens(self, decimals: u32) -> Result<Decimal> {
        let units = i128::try_from(self.0).map_err(|_| AuctionError::AmountOverflow)?;
        Decimal::try_from_i128_with_scale(units, decimals)
            .map(|d| d.normalize())
            .map_err(|_| AuctionError::AmountOverflow)
    }
}

impl From<u128> for Amount {
    fn from(units: u128) -> Self {
        Self(units)
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Self(u128::from(units))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct AmountVisitor;

        impl de::Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a base-unit amount as a decimal string or unsigned integer")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Amount, E> {
                Ok(Amount::from(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Amount, E> {
                v.parse::<u128>().map(Amount).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
