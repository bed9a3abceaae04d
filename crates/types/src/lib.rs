//! Shared primitives for the epoch mint engine.
//!
//! Addresses, module accounts, denominated coins and fixed-point helpers
//! used by the mint, treasury and epoch crates.

pub mod address;
pub mod coin;
pub mod decimal;

pub use address::*;
pub use coin::*;

/// Monotonic epoch counter delivered by the epoch-timing subsystem.
pub type EpochNumber = i64;

/// Well-known module account names.
pub mod modules {
    /// Mints new supply and holds it until distributed.
    pub const MINT: &str = "mint";
    /// Collects staking rewards before they are paid to stakers.
    pub const FEE_COLLECTOR: &str = "fee_collector";
    /// Holds the community treasury.
    pub const DISTRIBUTION: &str = "distribution";
    /// Holds funds escrowed in incentive pots.
    pub const INCENTIVES: &str = "incentives";
}
