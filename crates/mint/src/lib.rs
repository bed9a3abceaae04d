//! Epoch-triggered token issuance.
//!
//! At the end of every epoch on its configured track the mint issues the
//! current epoch provisions and splits them between staking rewards, a new
//! pool-incentives pot, the developer receiver and the community pool.
//! Provisions are reduced by a fixed factor once per reduction period,
//! counted from the distribution start epoch.
//!
//! ```text
//! epoch end ─▶ identifier / start guards ─▶ halving ─▶ mint ─▶ split ─▶ transfers
//! ```

pub mod distribution;
pub mod errors;
pub mod genesis;
pub mod halving;
pub mod keeper;
pub mod minter;
pub mod params;
pub mod store;

pub use distribution::{allocate, effective_proportions, proportion_of, Bucket, DistributionResult};
pub use errors::{MintError, Result};
pub use genesis::GenesisState;
pub use halving::{Halving, HalvingScheduler};
pub use keeper::{EpochMintReport, MintHooks, MintHost, MintKeeper, PotPolicy};
pub use minter::Minter;
pub use params::{DistributionProportions, MintParams};
pub use store::{MemoryMintStore, MintStore};
