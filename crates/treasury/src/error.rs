use epochmint_types::CoinError;
use thiserror::Error;

/// Failures reported by the ledger and the collaborators built on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("module {module} lacks the {permission} permission")]
    MissingPermission { module: String, permission: String },

    #[error("unknown module account {0}")]
    UnknownModule(String),

    #[error("insufficient funds in {account}: need {needed}{denom}, have {available}{denom}")]
    InsufficientFunds {
        account: String,
        denom: String,
        needed: u128,
        available: u128,
    },

    #[error("supply overflow for denom {denom}")]
    Overflow { denom: String },

    #[error("invalid coin: {0}")]
    InvalidCoin(#[from] CoinError),

    #[error("invalid incentive pot: {0}")]
    InvalidPot(String),

    #[error("operation rejected: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
