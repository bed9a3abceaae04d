//! Distribution splitter
//!
//! Splits one epoch's minted amount into four buckets. Each of the first
//! three buckets is `floor(total * share)`; the community pool receives the
//! residual, so the buckets always add up to the total exactly.

use crate::params::{DistributionProportions, MintParams};
use epochmint_types::{decimal, Coin};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Destinations of minted supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Staking,
    PoolIncentives,
    DeveloperRewards,
    CommunityPool,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bucket::Staking => "staking",
            Bucket::PoolIncentives => "pool_incentives",
            Bucket::DeveloperRewards => "developer_rewards",
            Bucket::CommunityPool => "community_pool",
        };
        f.write_str(name)
    }
}

/// Amounts per bucket for one epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionResult {
    pub total: u128,
    pub staking: u128,
    pub pool_incentives: u128,
    /// Absent when no receiver is configured or the share floors to zero.
    pub developer_rewards: Option<u128>,
    pub community_pool: u128,
}

impl DistributionResult {
    pub fn sum(&self) -> u128 {
        self.staking
            + self.pool_incentives
            + self.developer_rewards.unwrap_or(0)
            + self.community_pool
    }

    /// Buckets in transfer order. The developer bucket is omitted when absent.
    pub fn buckets(&self) -> Vec<(Bucket, u128)> {
        let mut out = vec![
            (Bucket::Staking, self.staking),
            (Bucket::PoolIncentives, self.pool_incentives),
        ];
        if let Some(amount) = self.developer_rewards {
            out.push((Bucket::DeveloperRewards, amount));
        }
        out.push((Bucket::CommunityPool, self.community_pool));
        out
    }
}

/// Shares actually applied for one allocation. Without a developer receiver
/// the developer share is added to staking; stored parameters are untouched.
pub fn effective_proportions(params: &MintParams) -> DistributionProportions {
    let mut shares = params.distribution_proportions.clone();
    if !params.has_developer_receiver() {
        shares.staking += shares.developer_rewards;
        shares.developer_rewards = Decimal::ZERO;
    }
    shares
}

/// Split `total` according to `params`.
///
/// Never fails. Each floor bucket is capped by what remains, so a total
/// beyond decimal range degrades to sending everything to the community
/// pool rather than over-allocating.
pub fn allocate(total: u128, params: &MintParams) -> DistributionResult {
    let shares = effective_proportions(params);
    let mut remaining = total;
    let mut take = |share: Decimal| {
        let amount = match decimal::mul_floor(total, share) {
            Some(amount) => amount.min(remaining),
            None => {
                warn!(
                    target: "mint",
                    "{} x {} is out of decimal range; share left to the community pool",
                    total,
                    share
                );
                0
            }
        };
        remaining -= amount;
        amount
    };

    let staking = take(shares.staking);
    let pool_incentives = take(shares.pool_incentives);
    let developer = if params.has_developer_receiver() {
        take(shares.developer_rewards)
    } else {
        0
    };

    DistributionResult {
        total,
        staking,
        pool_incentives,
        developer_rewards: (developer > 0).then_some(developer),
        community_pool: remaining,
    }
}

/// `floor(coin.amount * ratio)` in the coin's denomination, or `None` if the
/// product is out of decimal range.
pub fn proportion_of(coin: &Coin, ratio: Decimal) -> Option<Coin> {
    decimal::mul_floor(coin.amount, ratio).map(|amount| Coin::new(coin.denom.clone(), amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use epochmint_types::Address;
    use proptest::prelude::*;

    fn params(receiver: Option<Address>) -> MintParams {
        MintParams {
            distribution_proportions: DistributionProportions {
                staking: Decimal::new(3, 1),
                pool_incentives: Decimal::new(4, 1),
                developer_rewards: Decimal::new(2, 1),
                community_pool: Decimal::new(1, 1),
            },
            developer_rewards_receiver: receiver,
            ..Default::default()
        }
    }

    #[test]
    fn splits_by_share_with_receiver() {
        let result = allocate(100_000, &params(Some(Address([1; 32]))));
        assert_eq!(result.staking, 30_000);
        assert_eq!(result.pool_incentives, 40_000);
        assert_eq!(result.developer_rewards, Some(20_000));
        assert_eq!(result.community_pool, 10_000);
        assert_eq!(result.sum(), 100_000);
    }

    #[test]
    fn folds_developer_share_into_staking_without_receiver() {
        let p = params(None);
        let result = allocate(100_000, &p);
        assert_eq!(result.staking, 50_000);
        assert_eq!(result.pool_incentives, 40_000);
        assert_eq!(result.developer_rewards, None);
        assert_eq!(result.community_pool, 10_000);
        // stored shares unchanged
        assert_eq!(p.distribution_proportions.staking, Decimal::new(3, 1));
    }

    #[test]
    fn rounding_dust_goes_to_community_pool() {
        let result = allocate(7, &params(Some(Address([1; 32]))));
        // floor(2.1) + floor(2.8) + floor(1.4)
        assert_eq!(result.staking, 2);
        assert_eq!(result.pool_incentives, 2);
        assert_eq!(result.developer_rewards, Some(1));
        assert_eq!(result.community_pool, 2);
    }

    #[test]
    fn zero_developer_amount_is_absent() {
        let result = allocate(4, &params(Some(Address([1; 32]))));
        assert_eq!(result.developer_rewards, None);
        assert_eq!(result.sum(), 4);
        assert!(!result
            .buckets()
            .iter()
            .any(|(bucket, _)| *bucket == Bucket::DeveloperRewards));
    }

    #[test]
    fn shares_below_one_leave_residual_in_community_pool() {
        let mut p = params(None);
        p.distribution_proportions.community_pool = Decimal::ZERO;
        p.distribution_proportions.pool_incentives = Decimal::new(1, 1);
        let result = allocate(1_000, &p);
        assert_eq!(result.staking, 500);
        assert_eq!(result.pool_incentives, 100);
        assert_eq!(result.community_pool, 400);
    }

    #[test]
    fn total_beyond_decimal_range_goes_to_community_pool() {
        let result = allocate(u128::MAX, &params(Some(Address([1; 32]))));
        assert_eq!(result.staking, 0);
        assert_eq!(result.pool_incentives, 0);
        assert_eq!(result.developer_rewards, None);
        assert_eq!(result.community_pool, u128::MAX);
        assert_eq!(result.sum(), u128::MAX);
    }

    #[test]
    fn zero_total_allocates_nothing() {
        assert_eq!(
            allocate(0, &params(Some(Address([1; 32])))),
            DistributionResult::default()
        );
    }

    #[test]
    fn proportion_of_keeps_denom() {
        let coin = Coin::new("stake", 1_001);
        assert_eq!(
            proportion_of(&coin, Decimal::new(5, 1)),
            Some(Coin::new("stake", 500))
        );
        assert_eq!(proportion_of(&Coin::new("stake", u128::MAX), Decimal::ONE), None);
    }

    #[test]
    fn bucket_names() {
        assert_eq!(Bucket::PoolIncentives.to_string(), "pool_incentives");
        assert_eq!(
            serde_json::to_string(&Bucket::DeveloperRewards).unwrap(),
            "\"developer_rewards\""
        );
    }

    fn shares() -> impl Strategy<Value = DistributionProportions> {
        (0u32..=1_000, 0u32..=1_000, 0u32..=1_000).prop_map(|(a, b, c)| {
            // scale three draws so they never exceed one together
            let total = Decimal::from(a + b + c).max(Decimal::from(1_000));
            let staking = Decimal::from(a) / total;
            let pool = Decimal::from(b) / total;
            let dev = Decimal::from(c) / total;
            DistributionProportions {
                staking,
                pool_incentives: pool,
                developer_rewards: dev,
                community_pool: (Decimal::ONE - staking - pool - dev).max(Decimal::ZERO),
            }
        })
    }

    proptest! {
        #[test]
        fn buckets_always_sum_to_total(
            total in 0u128..=1_000_000_000_000_000,
            shares in shares(),
            with_receiver in any::<bool>(),
        ) {
            let p = MintParams {
                distribution_proportions: shares,
                developer_rewards_receiver: with_receiver.then_some(Address([9; 32])),
                ..Default::default()
            };
            let result = allocate(total, &p);
            prop_assert_eq!(result.sum(), total);
            if !with_receiver {
                prop_assert_eq!(result.developer_rewards, None);
            }
        }

        #[test]
        fn fallback_staking_matches_merged_share(
            total in 0u128..=1_000_000_000_000,
            shares in shares(),
        ) {
            let merged = shares.staking + shares.developer_rewards;
            let p = MintParams {
                distribution_proportions: shares,
                developer_rewards_receiver: None,
                ..Default::default()
            };
            let result = allocate(total, &p);
            prop_assert_eq!(Some(result.staking), decimal::mul_floor(total, merged));
        }
    }
}
