//! Mint parameters
//!
//! Replicated configuration, changed only through the governed
//! [`crate::MintKeeper::set_params`] path. Every fractional field is a
//! `rust_decimal::Decimal`; nothing here is ever a float.

use crate::errors::{MintError, Result};
use epochmint_epochs::identifiers;
use epochmint_types::{validate_denom, Address, EpochNumber};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shares of each epoch's issuance.
///
/// The four shares need not add up to one; whatever the first three leave
/// over (including rounding dust) lands in the community pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionProportions {
    pub staking: Decimal,
    pub pool_incentives: Decimal,
    pub developer_rewards: Decimal,
    pub community_pool: Decimal,
}

impl DistributionProportions {
    /// Sum of the four shares, `None` if it leaves decimal range.
    pub fn total(&self) -> Option<Decimal> {
        self.staking
            .checked_add(self.pool_incentives)?
            .checked_add(self.developer_rewards)?
            .checked_add(self.community_pool)
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("distribution_proportions.staking", self.staking),
            ("distribution_proportions.pool_incentives", self.pool_incentives),
            ("distribution_proportions.developer_rewards", self.developer_rewards),
            ("distribution_proportions.community_pool", self.community_pool),
        ];
        for (field, value) in fields {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(MintError::invalid(field, format!("{value} is negative")));
            }
        }

        let total = self.total().ok_or_else(|| {
            MintError::invalid("distribution_proportions", "shares overflow when summed")
        })?;
        if total > Decimal::ONE {
            return Err(MintError::invalid(
                "distribution_proportions",
                format!("shares add up to {total}, more than 1"),
            ));
        }
        Ok(())
    }
}

impl Default for DistributionProportions {
    fn default() -> Self {
        Self {
            staking: Decimal::new(4, 1),
            pool_incentives: Decimal::new(3, 1),
            developer_rewards: Decimal::new(2, 1),
            community_pool: Decimal::new(1, 1),
        }
    }
}

/// The full parameter set. Missing fields in a config file fall back to
/// [`MintParams::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MintParams {
    /// Denomination created by the mint.
    pub mint_denom: String,
    /// Issuance per epoch before the first reduction.
    pub genesis_epoch_provisions: Decimal,
    /// Epoch track that drives minting.
    pub epoch_identifier: String,
    /// Epochs between reductions.
    pub reduction_period_in_epochs: i64,
    /// Multiplier applied to provisions at each reduction.
    pub reduction_factor: Decimal,
    pub distribution_proportions: DistributionProportions,
    /// Recipient of developer rewards; empty folds that share into staking.
    #[serde(with = "optional_address")]
    pub developer_rewards_receiver: Option<Address>,
    /// First epoch that mints anything.
    pub minting_rewards_distribution_start_epoch: EpochNumber,
}

impl Default for MintParams {
    fn default() -> Self {
        Self {
            mint_denom: "stake".to_string(),
            genesis_epoch_provisions: Decimal::new(5_000_000, 0),
            epoch_identifier: identifiers::WEEK.to_string(),
            // three years of weekly epochs
            reduction_period_in_epochs: 156,
            reduction_factor: Decimal::new(5, 1),
            distribution_proportions: DistributionProportions::default(),
            developer_rewards_receiver: None,
            minting_rewards_distribution_start_epoch: 0,
        }
    }
}

impl MintParams {
    /// Validate the whole set; the first invalid field is reported.
    pub fn validate(&self) -> Result<()> {
        validate_denom(&self.mint_denom)
            .map_err(|err| MintError::invalid("mint_denom", err.to_string()))?;

        if self.genesis_epoch_provisions.is_sign_negative()
            && !self.genesis_epoch_provisions.is_zero()
        {
            return Err(MintError::invalid(
                "genesis_epoch_provisions",
                "must not be negative",
            ));
        }

        if self.epoch_identifier.trim().is_empty() {
            return Err(MintError::invalid("epoch_identifier", "must not be blank"));
        }

        if self.reduction_period_in_epochs <= 0 {
            return Err(MintError::invalid(
                "reduction_period_in_epochs",
                format!("must be positive, got {}", self.reduction_period_in_epochs),
            ));
        }

        if self.reduction_factor < Decimal::ZERO || self.reduction_factor > Decimal::ONE {
            return Err(MintError::invalid(
                "reduction_factor",
                format!("must be within [0, 1], got {}", self.reduction_factor),
            ));
        }

        self.distribution_proportions.validate()?;

        if self.minting_rewards_distribution_start_epoch < 0 {
            return Err(MintError::invalid(
                "minting_rewards_distribution_start_epoch",
                "must not be negative",
            ));
        }

        Ok(())
    }

    pub fn has_developer_receiver(&self) -> bool {
        self.developer_rewards_receiver.is_some()
    }
}

/// `Option<Address>` as a string where `""` means unset.
mod optional_address {
    use epochmint_types::Address;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Address>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(address) => serializer.serialize_str(&address.to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some).map_err(de::Error::custom),
        }
    }
}
