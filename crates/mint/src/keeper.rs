//! Mint keeper
//!
//! Ties the parameter set, the minter and the halving scheduler to the
//! ledger and treasury collaborators. The epoch subsystem reaches it through
//! [`MintHooks`]; hosts that drive epochs by hand call
//! [`MintKeeper::process_epoch_end`] directly.

use crate::distribution::{self, Bucket, DistributionResult};
use crate::errors::{MintError, Result};
use crate::genesis::GenesisState;
use crate::halving::HalvingScheduler;
use crate::minter::Minter;
use crate::params::MintParams;
use crate::store::{MemoryMintStore, MintStore};
use epochmint_epochs::EpochHooks;
use epochmint_treasury::{
    AccountLedger, CommunityPool, IncentivePots, LockQueryType, PotId, QueryCondition,
    StakingRewards, Transactional,
};
use epochmint_types::{modules, Coin, EpochNumber};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything the keeper needs from the host for one epoch-end step.
pub trait MintHost:
    AccountLedger + StakingRewards + IncentivePots + CommunityPool + Transactional
{
}

impl<T> MintHost for T where
    T: AccountLedger + StakingRewards + IncentivePots + CommunityPool + Transactional
{
}

/// How the pool-incentives bucket is escrowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotPolicy {
    /// Lock denomination eligible for the pot.
    pub lp_denom: String,
    pub lock_duration_secs: u64,
    pub num_epochs_paid_over: u64,
}

impl PotPolicy {
    pub fn condition(&self) -> QueryCondition {
        QueryCondition {
            lock_query_type: LockQueryType::ByDuration,
            denom: self.lp_denom.clone(),
            duration_secs: self.lock_duration_secs,
        }
    }
}

impl Default for PotPolicy {
    fn default() -> Self {
        Self {
            lp_denom: "gamm/pool/1".to_string(),
            lock_duration_secs: 7 * 24 * 60 * 60,
            num_epochs_paid_over: 1,
        }
    }
}

/// What one processed epoch did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochMintReport {
    pub epoch: EpochNumber,
    pub minted: Coin,
    pub distribution: DistributionResult,
    /// Pot funded with the pool-incentives bucket, if any.
    pub pot_id: Option<PotId>,
    pub halved: bool,
    pub last_halven_epoch: EpochNumber,
    pub epoch_provisions: Decimal,
}

pub struct MintKeeper<S: MintStore = MemoryMintStore> {
    store: S,
    pot_policy: PotPolicy,
    last_report: RwLock<Option<EpochMintReport>>,
}

impl MintKeeper<MemoryMintStore> {
    /// Keeper over a fresh in-memory store seeded from `genesis`.
    pub fn in_memory(genesis: &GenesisState) -> Result<Self> {
        let keeper = Self::new(MemoryMintStore::default());
        keeper.init_genesis(genesis)?;
        Ok(keeper)
    }
}

impl<S: MintStore> MintKeeper<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            pot_policy: PotPolicy::default(),
            last_report: RwLock::new(None),
        }
    }

    pub fn with_pot_policy(mut self, pot_policy: PotPolicy) -> Self {
        self.pot_policy = pot_policy;
        self
    }

    pub fn init_genesis(&self, genesis: &GenesisState) -> Result<()> {
        genesis.validate()?;
        self.store.set_params(genesis.params.clone());
        self.store.set_minter(genesis.resolved_minter());
        self.store.set_halven_started_epoch(genesis.halven_started_epoch);
        info!(
            target: "mint",
            "Initialised mint genesis: denom {}, provisions {}, identifier {}",
            genesis.params.mint_denom,
            genesis.params.genesis_epoch_provisions,
            genesis.params.epoch_identifier
        );
        Ok(())
    }

    pub fn export_genesis(&self) -> GenesisState {
        GenesisState {
            params: self.store.params(),
            minter: Some(self.store.minter()),
            halven_started_epoch: self.store.halven_started_epoch(),
        }
    }

    pub fn params(&self) -> MintParams {
        self.store.params()
    }

    /// Replace the whole parameter set. Nothing is stored unless every
    /// field is valid.
    pub fn set_params(&self, params: MintParams) -> Result<()> {
        params.validate()?;
        info!(
            target: "mint",
            "Mint parameters updated: identifier {}, period {}, factor {}",
            params.epoch_identifier,
            params.reduction_period_in_epochs,
            params.reduction_factor
        );
        self.store.set_params(params);
        Ok(())
    }

    pub fn minter(&self) -> Minter {
        self.store.minter()
    }

    pub fn epoch_provisions(&self) -> Decimal {
        self.store.minter().epoch_provisions
    }

    pub fn last_halven_epoch(&self) -> EpochNumber {
        self.store.minter().last_halven_epoch
    }

    pub fn last_report(&self) -> Option<EpochMintReport> {
        self.last_report.read().clone()
    }

    /// Nothing happens at epoch start.
    pub fn before_epoch_start(&self, identifier: &str, epoch: EpochNumber) {
        debug!(target: "mint", "before_epoch_start {} #{}", identifier, epoch);
    }

    /// Mint and distribute for a finished epoch.
    ///
    /// Returns `Ok(None)` when the epoch belongs to another track or
    /// precedes the distribution start. Any collaborator failure rolls back
    /// the minter and every ledger change made for this epoch.
    pub fn process_epoch_end<H: MintHost>(
        &self,
        host: &mut H,
        identifier: &str,
        epoch: EpochNumber,
    ) -> Result<Option<EpochMintReport>> {
        let params = self.store.params();

        if identifier != params.epoch_identifier {
            debug!(
                target: "mint",
                "Ignoring epoch {} #{}: minting runs on {}",
                identifier,
                epoch,
                params.epoch_identifier
            );
            return Ok(None);
        }

        let start = params.minting_rewards_distribution_start_epoch;
        if epoch < start {
            debug!(
                target: "mint",
                "Epoch {} precedes distribution start {}",
                epoch,
                start
            );
            return Ok(None);
        }

        let previous_minter = self.store.minter();
        let previous_started = self.store.halven_started_epoch();

        let mut minter = previous_minter.clone();
        if previous_started.is_none() {
            minter.last_halven_epoch = start;
            self.store.set_halven_started_epoch(Some(start));
            info!(
                target: "mint",
                "Distribution starts at epoch {}; halving clock aligned to {}",
                epoch,
                start
            );
        }

        let halving = HalvingScheduler::new(&params).maybe_advance(&minter, epoch);
        let minter = halving.minter;
        self.store.set_minter(minter.clone());

        let minted = minter.epoch_provision(&params);
        let split = distribution::allocate(minted.amount, &params);

        let outcome =
            host.atomically(|host| self.distribute(host, &params, &minted, &split, epoch));
        let pot_id = match outcome {
            Ok(pot_id) => pot_id,
            Err(err) => {
                self.store.set_minter(previous_minter);
                self.store.set_halven_started_epoch(previous_started);
                warn!(target: "mint", "Epoch {} aborted: {}", epoch, err);
                return Err(err);
            }
        };

        let report = EpochMintReport {
            epoch,
            minted,
            distribution: split,
            pot_id,
            halved: halving.halved,
            last_halven_epoch: minter.last_halven_epoch,
            epoch_provisions: minter.epoch_provisions,
        };
        info!(
            target: "mint",
            "Epoch {} minted {} (staking {}, pool incentives {}, developer {}, community {}){}",
            epoch,
            report.minted,
            report.distribution.staking,
            report.distribution.pool_incentives,
            report.distribution.developer_rewards.unwrap_or(0),
            report.distribution.community_pool,
            if report.halved { ", provisions reduced" } else { "" }
        );
        *self.last_report.write() = Some(report.clone());
        Ok(Some(report))
    }

    fn distribute<H: MintHost>(
        &self,
        host: &mut H,
        params: &MintParams,
        minted: &Coin,
        split: &DistributionResult,
        epoch: EpochNumber,
    ) -> Result<Option<PotId>> {
        if minted.is_zero() {
            return Ok(None);
        }

        host.mint_coins(modules::MINT, minted)
            .map_err(|source| MintError::Mint {
                coin: minted.clone(),
                source,
            })?;

        let mut pot_id = None;
        for (bucket, amount) in split.buckets() {
            if amount == 0 {
                continue;
            }
            let coin = Coin::new(minted.denom.clone(), amount);
            let sent = match bucket {
                Bucket::Staking => host.add_collected_fees(modules::MINT, &coin),
                Bucket::PoolIncentives => host
                    .create_pot(
                        modules::MINT,
                        &coin,
                        &self.pot_policy.condition(),
                        epoch,
                        self.pot_policy.num_epochs_paid_over,
                    )
                    .map(|id| pot_id = Some(id)),
                Bucket::DeveloperRewards => match &params.developer_rewards_receiver {
                    Some(receiver) => {
                        host.send_from_module_to_account(modules::MINT, receiver, &coin)
                    }
                    None => Ok(()),
                },
                Bucket::CommunityPool => host.fund_community_pool(modules::MINT, &coin),
            };
            sent.map_err(|source| MintError::Distribution {
                bucket,
                coin,
                source,
            })?;
        }
        Ok(pot_id)
    }

    /// Hook adapter sharing this keeper.
    pub fn hooks(self: &Arc<Self>) -> MintHooks<S> {
        MintHooks {
            keeper: Arc::clone(self),
        }
    }
}

/// [`EpochHooks`] implementation for the mint.
pub struct MintHooks<S: MintStore = MemoryMintStore> {
    keeper: Arc<MintKeeper<S>>,
}

impl<S, H> EpochHooks<H> for MintHooks<S>
where
    S: MintStore,
    H: MintHost,
{
    fn name(&self) -> &str {
        "mint"
    }

    fn before_epoch_start(
        &mut self,
        _ctx: &mut H,
        identifier: &str,
        epoch_number: EpochNumber,
    ) -> anyhow::Result<()> {
        self.keeper.before_epoch_start(identifier, epoch_number);
        Ok(())
    }

    fn after_epoch_end(
        &mut self,
        ctx: &mut H,
        identifier: &str,
        epoch_number: EpochNumber,
    ) -> anyhow::Result<()> {
        self.keeper.process_epoch_end(ctx, identifier, epoch_number)?;
        Ok(())
    }
}
