//! Persistence seam for mint state.
//!
//! The host owns the key-value layer; the keeper only needs the current
//! parameter set, the minter and whether distribution has started.

use crate::minter::Minter;
use crate::params::MintParams;
use epochmint_types::EpochNumber;
use parking_lot::RwLock;
use std::sync::Arc;

pub trait MintStore {
    fn params(&self) -> MintParams;
    fn set_params(&self, params: MintParams);

    fn minter(&self) -> Minter;
    fn set_minter(&self, minter: Minter);

    /// Start epoch the halving clock was aligned to, once distribution has
    /// begun. `None` until the first epoch at or after the start is processed.
    fn halven_started_epoch(&self) -> Option<EpochNumber>;
    fn set_halven_started_epoch(&self, epoch: Option<EpochNumber>);
}

/// In-memory store. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryMintStore {
    params: Arc<RwLock<MintParams>>,
    minter: Arc<RwLock<Minter>>,
    started: Arc<RwLock<Option<EpochNumber>>>,
}

impl MemoryMintStore {
    pub fn new(params: MintParams, minter: Minter) -> Self {
        Self {
            params: Arc::new(RwLock::new(params)),
            minter: Arc::new(RwLock::new(minter)),
            started: Arc::new(RwLock::new(None)),
        }
    }
}

impl MintStore for MemoryMintStore {
    fn params(&self) -> MintParams {
        self.params.read().clone()
    }

    fn set_params(&self, params: MintParams) {
        *self.params.write() = params;
    }

    fn minter(&self) -> Minter {
        self.minter.read().clone()
    }

    fn set_minter(&self, minter: Minter) {
        *self.minter.write() = minter;
    }

    fn halven_started_epoch(&self) -> Option<EpochNumber> {
        *self.started.read()
    }

    fn set_halven_started_epoch(&self, epoch: Option<EpochNumber>) {
        *self.started.write() = epoch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn clones_share_state() {
        let store = MemoryMintStore::default();
        let other = store.clone();

        other.set_minter(Minter::new(Decimal::new(42, 0), 7));
        other.set_halven_started_epoch(Some(3));

        assert_eq!(store.minter().last_halven_epoch, 7);
        assert_eq!(store.halven_started_epoch(), Some(3));
        assert_eq!(store.params(), MintParams::default());
    }
}
