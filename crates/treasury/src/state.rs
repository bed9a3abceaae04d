//! In-memory host state bundling the ledger and the treasury collaborators.
//!
//! `TreasuryState` is what the simulator and the tests hand to the mint
//! engine as its state-transition context. `atomically` gives the
//! all-or-nothing semantics a state-transition step needs: if the closure
//! fails, every balance, pot and tally is restored.

use crate::account_ledger::{AccountLedger, InMemoryLedger, Permission};
use crate::community_pool::{CommunityPool, FeePool};
use crate::error::{LedgerError, Result};
use crate::incentives::{IncentivePots, Pot, PotId, PotRegistry, QueryCondition};
use crate::reward_pool::{RewardSink, StakingRewards};
use epochmint_types::{modules, Address, Coin, EpochNumber};
use tracing::warn;

/// Run a group of collaborator calls as one unit.
pub trait Transactional {
    /// Apply `f`; if it returns `Err`, roll back everything `f` changed.
    fn atomically<T, E, F>(&mut self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Self) -> std::result::Result<T, E>;
}

/// Collaborator call that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    Mint,
    AccountTransfer,
    StakingRewards,
    CreatePot,
    CommunityPool,
}

#[derive(Debug, Clone)]
struct Books {
    ledger: InMemoryLedger,
    fee_pool: FeePool,
    rewards: RewardSink,
    pots: PotRegistry,
}

#[derive(Debug, Clone)]
pub struct TreasuryState {
    books: Books,
    failure: Option<FailurePoint>,
}

impl TreasuryState {
    /// Fresh state with the standard module accounts registered; only the
    /// mint module may create supply.
    pub fn new() -> Self {
        let ledger = InMemoryLedger::new()
            .with_module(modules::MINT, &[Permission::Minter])
            .with_module(modules::FEE_COLLECTOR, &[])
            .with_module(modules::DISTRIBUTION, &[])
            .with_module(modules::INCENTIVES, &[]);
        Self::with_ledger(ledger)
    }

    pub fn with_ledger(ledger: InMemoryLedger) -> Self {
        Self {
            books: Books {
                ledger,
                fee_pool: FeePool::new(),
                rewards: RewardSink::new(),
                pots: PotRegistry::new(),
            },
            failure: None,
        }
    }

    /// Make the next call at `point` fail with [`LedgerError::Rejected`].
    pub fn fail_next(&mut self, point: FailurePoint) {
        self.failure = Some(point);
    }

    pub fn ledger(&self) -> &InMemoryLedger {
        &self.books.ledger
    }

    pub fn fee_pool(&self) -> &FeePool {
        &self.books.fee_pool
    }

    pub fn rewards(&self) -> &RewardSink {
        &self.books.rewards
    }

    pub fn pots(&self) -> &PotRegistry {
        &self.books.pots
    }

    fn check_failure(&mut self, point: FailurePoint) -> Result<()> {
        if self.failure == Some(point) {
            self.failure = None;
            warn!(target: "treasury", "Injected failure at {:?}", point);
            return Err(LedgerError::Rejected(format!("injected failure at {point:?}")));
        }
        Ok(())
    }
}

impl Default for TreasuryState {
    fn default() -> Self {
        Self::new()
    }
}

impl Transactional for TreasuryState {
    fn atomically<T, E, F>(&mut self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Self) -> std::result::Result<T, E>,
    {
        let snapshot = self.books.clone();
        let outcome = f(self);
        if outcome.is_err() {
            warn!(target: "treasury", "Rolling back failed state transition");
            self.books = snapshot;
        }
        outcome
    }
}

impl AccountLedger for TreasuryState {
    fn mint_coins(&mut self, module: &str, coin: &Coin) -> Result<()> {
        self.check_failure(FailurePoint::Mint)?;
        self.books.ledger.mint_coins(module, coin)
    }

    fn send_from_module_to_account(
        &mut self,
        module: &str,
        to: &Address,
        coin: &Coin,
    ) -> Result<()> {
        self.check_failure(FailurePoint::AccountTransfer)?;
        self.books.ledger.send_from_module_to_account(module, to, coin)
    }

    fn send_from_module_to_module(&mut self, from: &str, to: &str, coin: &Coin) -> Result<()> {
        self.books.ledger.send_from_module_to_module(from, to, coin)
    }

    fn balance(&self, owner: &Address, denom: &str) -> u128 {
        self.books.ledger.balance(owner, denom)
    }

    fn supply(&self, denom: &str) -> u128 {
        self.books.ledger.supply(denom)
    }
}

impl StakingRewards for TreasuryState {
    fn add_collected_fees(&mut self, from_module: &str, coin: &Coin) -> Result<()> {
        self.check_failure(FailurePoint::StakingRewards)?;
        self.books
            .ledger
            .send_from_module_to_module(from_module, modules::FEE_COLLECTOR, coin)?;
        self.books.rewards.record(coin);
        Ok(())
    }
}

impl CommunityPool for TreasuryState {
    fn fund_community_pool(&mut self, from_module: &str, coin: &Coin) -> Result<()> {
        self.check_failure(FailurePoint::CommunityPool)?;
        self.books
            .ledger
            .send_from_module_to_module(from_module, modules::DISTRIBUTION, coin)?;
        self.books.fee_pool.record_deposit(coin);
        Ok(())
    }

    fn community_pool(&self, denom: &str) -> u128 {
        self.books.fee_pool.amount(denom)
    }
}

impl IncentivePots for TreasuryState {
    fn create_pot(
        &mut self,
        funder_module: &str,
        coin: &Coin,
        distribute_to: &QueryCondition,
        start_epoch: EpochNumber,
        num_epochs_paid_over: u64,
    ) -> Result<PotId> {
        self.check_failure(FailurePoint::CreatePot)?;
        PotRegistry::validate_request(coin, distribute_to, num_epochs_paid_over)?;
        self.books
            .ledger
            .send_from_module_to_module(funder_module, modules::INCENTIVES, coin)?;
        Ok(self.books.pots.insert(
            funder_module,
            coin,
            distribute_to,
            start_epoch,
            num_epochs_paid_over,
        ))
    }

    fn pot(&self, id: PotId) -> Option<&Pot> {
        self.books.pots.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incentives::LockQueryType;

    fn funded() -> TreasuryState {
        let mut state = TreasuryState::new();
        state
            .mint_coins(modules::MINT, &Coin::new("stake", 1_000))
            .unwrap();
        state
    }

    #[test]
    fn collaborators_move_funds_out_of_the_mint_module() {
        let mut state = funded();
        state
            .add_collected_fees(modules::MINT, &Coin::new("stake", 300))
            .unwrap();
        state
            .fund_community_pool(modules::MINT, &Coin::new("stake", 100))
            .unwrap();
        let cond = QueryCondition {
            lock_query_type: LockQueryType::ByDuration,
            denom: "lptoken".into(),
            duration_secs: 1,
        };
        let pot = state
            .create_pot(modules::MINT, &Coin::new("stake", 400), &cond, 3, 1)
            .unwrap();

        assert_eq!(state.module_balance(modules::MINT, "stake"), 200);
        assert_eq!(state.module_balance(modules::FEE_COLLECTOR, "stake"), 300);
        assert_eq!(state.module_balance(modules::DISTRIBUTION, "stake"), 100);
        assert_eq!(state.module_balance(modules::INCENTIVES, "stake"), 400);
        assert_eq!(state.community_pool("stake"), 100);
        assert_eq!(state.rewards().total("stake"), 300);
        assert_eq!(state.pot(pot).unwrap().start_epoch, 3);
    }

    #[test]
    fn atomically_rolls_back_on_error() {
        let mut state = funded();
        let result: std::result::Result<(), LedgerError> = state.atomically(|s| {
            s.add_collected_fees(modules::MINT, &Coin::new("stake", 300))?;
            s.fund_community_pool(modules::MINT, &Coin::new("stake", 5_000))
        });

        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(state.module_balance(modules::MINT, "stake"), 1_000);
        assert_eq!(state.module_balance(modules::FEE_COLLECTOR, "stake"), 0);
        assert_eq!(state.rewards().total("stake"), 0);
    }

    #[test]
    fn atomically_keeps_successful_changes() {
        let mut state = funded();
        let result: std::result::Result<(), LedgerError> = state.atomically(|s| {
            s.fund_community_pool(modules::MINT, &Coin::new("stake", 250))
        });

        assert!(result.is_ok());
        assert_eq!(state.community_pool("stake"), 250);
    }

    #[test]
    fn injected_failure_fires_once() {
        let mut state = funded();
        state.fail_next(FailurePoint::CommunityPool);

        let coin = Coin::new("stake", 10);
        assert!(matches!(
            state.fund_community_pool(modules::MINT, &coin),
            Err(LedgerError::Rejected(_))
        ));
        assert!(state.fund_community_pool(modules::MINT, &coin).is_ok());
    }
}
