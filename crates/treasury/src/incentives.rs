//! Incentive pots
//!
//! A pot escrows coins in the incentives module and pays them out over a
//! number of epochs to locks matching its [`QueryCondition`]. Paying out is
//! the incentives subsystem's job; this module only creates and records pots.

use crate::error::{LedgerError, Result};
use epochmint_types::{Coin, EpochNumber};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

pub type PotId = u64;

/// How locks are selected for a pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockQueryType {
    /// Locks whose duration is at least `duration_secs`.
    ByDuration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCondition {
    pub lock_query_type: LockQueryType,
    pub denom: String,
    pub duration_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub id: PotId,
    /// Perpetual pots have no end and pay out every epoch; the rest pay out
    /// over `num_epochs_paid_over` epochs.
    pub is_perpetual: bool,
    pub funder_module: String,
    pub coins: Coin,
    pub distribute_to: QueryCondition,
    pub start_epoch: EpochNumber,
    pub num_epochs_paid_over: u64,
}

/// Pot-creation entry point.
pub trait IncentivePots {
    /// Create a pot funded with `coin` taken from `funder_module`.
    fn create_pot(
        &mut self,
        funder_module: &str,
        coin: &Coin,
        distribute_to: &QueryCondition,
        start_epoch: EpochNumber,
        num_epochs_paid_over: u64,
    ) -> Result<PotId>;

    fn pot(&self, id: PotId) -> Option<&Pot>;
}

/// Registry of created pots, ordered by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PotRegistry {
    pots: BTreeMap<PotId, Pot>,
    next_id: PotId,
}

impl PotRegistry {
    pub fn new() -> Self {
        Self {
            pots: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Check a pot request before any funds move.
    pub fn validate_request(
        coin: &Coin,
        distribute_to: &QueryCondition,
        num_epochs_paid_over: u64,
    ) -> Result<()> {
        coin.validate()?;
        if coin.is_zero() {
            return Err(LedgerError::InvalidPot("pot must be funded".into()));
        }
        if num_epochs_paid_over == 0 {
            return Err(LedgerError::InvalidPot(
                "num_epochs_paid_over must be positive".into(),
            ));
        }
        epochmint_types::validate_denom(&distribute_to.denom)?;
        Ok(())
    }

    /// Record a pot whose funds have already been escrowed.
    pub fn insert(
        &mut self,
        funder_module: &str,
        coin: &Coin,
        distribute_to: &QueryCondition,
        start_epoch: EpochNumber,
        num_epochs_paid_over: u64,
    ) -> PotId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;

        let pot = Pot {
            id,
            is_perpetual: false,
            funder_module: funder_module.to_string(),
            coins: coin.clone(),
            distribute_to: distribute_to.clone(),
            start_epoch,
            num_epochs_paid_over,
        };
        info!(
            target: "treasury",
            "Created pot {} with {} for {} locks over {} epoch(s) from epoch {}",
            id,
            coin,
            distribute_to.denom,
            num_epochs_paid_over,
            start_epoch
        );
        self.pots.insert(id, pot);
        id
    }

    pub fn get(&self, id: PotId) -> Option<&Pot> {
        self.pots.get(&id)
    }

    pub fn len(&self) -> usize {
        self.pots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pot> {
        self.pots.values()
    }
}
