//! Denominated token amounts.
//!
//! Amounts are whole base units held as `u128`; fractional quantities only
//! exist transiently as `rust_decimal::Decimal` and are truncated before
//! anything touches a balance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum length of a denomination string.
pub const DENOM_MIN_LEN: usize = 3;
/// Maximum length of a denomination string.
pub const DENOM_MAX_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoinError {
    #[error("invalid denom {denom:?}: {reason}")]
    InvalidDenom { denom: String, reason: &'static str },
    #[error("amount overflow for denom {0}")]
    Overflow(String),
    #[error("denom mismatch: {left} vs {right}")]
    DenomMismatch { left: String, right: String },
}

/// Validate a denomination: 3-128 chars, leading ASCII letter, then
/// alphanumerics or one of `/ : . _ -`.
pub fn validate_denom(denom: &str) -> Result<(), CoinError> {
    let invalid = |reason| CoinError::InvalidDenom {
        denom: denom.to_string(),
        reason,
    };

    if denom.len() < DENOM_MIN_LEN || denom.len() > DENOM_MAX_LEN {
        return Err(invalid("length must be between 3 and 128"));
    }
    if !denom.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(invalid("must start with a letter"));
    }
    if !denom
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'))
    {
        return Err(invalid("contains unsupported characters"));
    }
    Ok(())
}

/// A whole-unit amount of a single denomination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    pub fn zero(denom: impl Into<String>) -> Self {
        Self::new(denom, 0)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn validate(&self) -> Result<(), CoinError> {
        validate_denom(&self.denom)
    }

    pub fn checked_add(&self, other: &Coin) -> Result<Coin, CoinError> {
        self.same_denom(other)?;
        self.amount
            .checked_add(other.amount)
            .map(|amount| Coin::new(self.denom.clone(), amount))
            .ok_or_else(|| CoinError::Overflow(self.denom.clone()))
    }

    /// Returns `None` when `other` exceeds `self` or denoms differ.
    pub fn checked_sub(&self, other: &Coin) -> Option<Coin> {
        if self.denom != other.denom {
            return None;
        }
        self.amount
            .checked_sub(other.amount)
            .map(|amount| Coin::new(self.denom.clone(), amount))
    }

    fn same_denom(&self, other: &Coin) -> Result<(), CoinError> {
        if self.denom != other.denom {
            return Err(CoinError::DenomMismatch {
                left: self.denom.clone(),
                right: other.denom.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
