//! Community treasury accumulator
//!
//! Deposits move from a module account into the distribution module and are
//! tallied per denomination so governance can see what the treasury holds.

use crate::error::Result;
use epochmint_types::Coin;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Deposit entry point of the community treasury.
pub trait CommunityPool {
    /// Move `coin` out of `from_module` into the community pool.
    fn fund_community_pool(&mut self, from_module: &str, coin: &Coin) -> Result<()>;

    /// Amount of `denom` currently held by the community pool.
    fn community_pool(&self, denom: &str) -> u128;
}

/// Summary statistics for monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeePoolStats {
    pub deposits: u64,
    pub denoms: usize,
    pub largest_deposit: u128,
}

/// Bookkeeping side of the community pool; the balance itself lives in the
/// ledger under the distribution module account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeePool {
    community_pool: BTreeMap<String, u128>,
    deposits: u64,
    largest_deposit: u128,
}

impl FeePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deposit that has already been moved on the ledger.
    pub fn record_deposit(&mut self, coin: &Coin) {
        if coin.is_zero() {
            debug!(target: "treasury", "Community pool: ignoring zero deposit of {}", coin.denom);
            return;
        }

        let entry = self.community_pool.entry(coin.denom.clone()).or_insert(0);
        *entry = entry.saturating_add(coin.amount);
        self.deposits += 1;
        self.largest_deposit = self.largest_deposit.max(coin.amount);

        info!(
            target: "treasury",
            "Community pool: received {} (holding {}{})",
            coin,
            *entry,
            coin.denom
        );
    }

    pub fn amount(&self, denom: &str) -> u128 {
        self.community_pool.get(denom).copied().unwrap_or(0)
    }

    /// Every denomination held, in deterministic order.
    pub fn coins(&self) -> Vec<Coin> {
        self.community_pool
            .iter()
            .map(|(denom, amount)| Coin::new(denom.clone(), *amount))
            .collect()
    }

    pub fn statistics(&self) -> FeePoolStats {
        FeePoolStats {
            deposits: self.deposits,
            denoms: self.community_pool.len(),
            largest_deposit: self.largest_deposit,
        }
    }
}
