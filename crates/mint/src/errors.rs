use crate::distribution::Bucket;
use epochmint_treasury::LedgerError;
use epochmint_types::Coin;
use thiserror::Error;

/// Errors surfaced by the mint engine.
///
/// Guard skips (foreign epoch identifier, epoch before the distribution
/// start) are not errors. Ledger failures abort the whole epoch-end step.
#[derive(Debug, Error)]
pub enum MintError {
    #[error("invalid mint parameter {field}: {reason}")]
    InvalidParams { field: &'static str, reason: String },

    #[error("invalid mint genesis: {0}")]
    InvalidGenesis(String),

    #[error("minting {coin} failed: {source}")]
    Mint {
        coin: Coin,
        #[source]
        source: LedgerError,
    },

    #[error("distributing {coin} to {bucket} failed: {source}")]
    Distribution {
        bucket: Bucket,
        coin: Coin,
        #[source]
        source: LedgerError,
    },

    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl MintError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        MintError::InvalidParams {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MintError>;
