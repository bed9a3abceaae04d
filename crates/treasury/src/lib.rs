//! Treasury and ledger collaborators
//!
//! Interfaces the mint engine uses to move newly minted supply, together
//! with deterministic in-memory implementations:
//!
//! - [`AccountLedger`]: mint into module accounts, transfer out of them
//! - [`StakingRewards`]: hand staking rewards to the fee collector
//! - [`IncentivePots`]: escrow liquidity incentives in a new pot
//! - [`CommunityPool`]: deposit into the community treasury
//! - [`Transactional`]: all-or-nothing grouping of the above

pub mod account_ledger;
pub mod community_pool;
pub mod error;
pub mod incentives;
pub mod reward_pool;
pub mod state;

pub use account_ledger::{AccountLedger, InMemoryLedger, Permission};
pub use community_pool::{CommunityPool, FeePool, FeePoolStats};
pub use error::LedgerError;
pub use incentives::{IncentivePots, LockQueryType, Pot, PotId, PotRegistry, QueryCondition};
pub use reward_pool::{RewardSink, StakingRewards};
pub use state::{FailurePoint, Transactional, TreasuryState};
