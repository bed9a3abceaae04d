//! Staking reward intake
//!
//! Newly minted staking rewards are handed to the fee collector module,
//! from which the staking distribution pays delegators. This module only
//! tracks what was collected; per-staker payout is not handled here.

use crate::error::Result;
use epochmint_types::Coin;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Entry point of the staking-reward distribution.
pub trait StakingRewards {
    /// Move `coin` from `from_module` into the fee collector.
    fn add_collected_fees(&mut self, from_module: &str, coin: &Coin) -> Result<()>;
}

/// Running tally of rewards handed to stakers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardSink {
    collected: BTreeMap<String, u128>,
    /// Number of non-zero hand-offs.
    pub batches: u64,
}

impl RewardSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, coin: &Coin) {
        if coin.is_zero() {
            return;
        }
        let entry = self.collected.entry(coin.denom.clone()).or_insert(0);
        *entry = entry.saturating_add(coin.amount);
        self.batches += 1;

        debug!(
            target: "treasury",
            "Staking rewards: collected {} (lifetime {}{})",
            coin,
            *entry,
            coin.denom
        );
    }

    pub fn total(&self, denom: &str) -> u128 {
        self.collected.get(denom).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_accumulate() {
        let mut sink = RewardSink::new();
        sink.record(&Coin::new("stake", 300));
        sink.record(&Coin::new("stake", 200));
        sink.record(&Coin::zero("stake"));

        assert_eq!(sink.total("stake"), 500);
        assert_eq!(sink.batches, 2);
        assert_eq!(sink.total("other"), 0);
    }
}
