//! Halving scheduler
//!
//! Every `reduction_period_in_epochs` epochs the provisions are multiplied by
//! the reduction factor. At most one reduction is applied per epoch end; an
//! epoch counter that jumps by several periods catches up one step per call.

use crate::minter::Minter;
use crate::params::MintParams;
use epochmint_types::EpochNumber;
use rust_decimal::Decimal;
use tracing::debug;

/// Outcome of a scheduler step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Halving {
    pub minter: Minter,
    pub halved: bool,
}

/// Parameter snapshot the scheduler works from.
#[derive(Debug, Clone, Copy)]
pub struct HalvingScheduler {
    period: i64,
    factor: Decimal,
}

impl HalvingScheduler {
    pub fn new(params: &MintParams) -> Self {
        Self {
            period: params.reduction_period_in_epochs,
            factor: params.reduction_factor,
        }
    }

    /// First epoch at which the next reduction fires.
    pub fn next_reduction_epoch(&self, minter: &Minter) -> EpochNumber {
        minter.last_halven_epoch.saturating_add(self.period)
    }

    pub fn is_due(&self, minter: &Minter, current_epoch: EpochNumber) -> bool {
        current_epoch >= self.next_reduction_epoch(minter)
    }

    /// Apply a reduction if one is due at `current_epoch`.
    pub fn maybe_advance(&self, minter: &Minter, current_epoch: EpochNumber) -> Halving {
        if !self.is_due(minter, current_epoch) {
            return Halving {
                minter: minter.clone(),
                halved: false,
            };
        }

        let next = Minter {
            epoch_provisions: minter.epoch_provisions * self.factor,
            last_halven_epoch: self.next_reduction_epoch(minter),
        };
        debug!(
            target: "mint",
            "reduction at epoch {}: provisions {} -> {}, last halven {} -> {}",
            current_epoch,
            minter.epoch_provisions,
            next.epoch_provisions,
            minter.last_halven_epoch,
            next.last_halven_epoch
        );
        Halving {
            minter: next,
            halved: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler(period: i64) -> HalvingScheduler {
        HalvingScheduler::new(&MintParams {
            reduction_period_in_epochs: period,
            reduction_factor: Decimal::new(5, 1),
            ..Default::default()
        })
    }

    #[test]
    fn fires_exactly_at_period_boundary() {
        let s = scheduler(25);
        let minter = Minter::new(Decimal::new(100_000, 0), 1);

        let before = s.maybe_advance(&minter, 25);
        assert!(!before.halved);
        assert_eq!(before.minter, minter);

        let at = s.maybe_advance(&minter, 26);
        assert!(at.halved);
        assert_eq!(at.minter.epoch_provisions, Decimal::new(50_000, 0));
        assert_eq!(at.minter.last_halven_epoch, 26);
    }

    #[test]
    fn catches_up_one_period_per_call() {
        let s = scheduler(10);
        let minter = Minter::new(Decimal::new(1_000, 0), 0);

        let first = s.maybe_advance(&minter, 35);
        assert!(first.halved);
        assert_eq!(first.minter.last_halven_epoch, 10);
        assert_eq!(first.minter.epoch_provisions, Decimal::new(500, 0));

        let second = s.maybe_advance(&first.minter, 36);
        assert_eq!(second.minter.last_halven_epoch, 20);
        let third = s.maybe_advance(&second.minter, 37);
        assert_eq!(third.minter.last_halven_epoch, 30);
        let fourth = s.maybe_advance(&third.minter, 38);
        assert!(!fourth.halved);
        assert_eq!(fourth.minter.epoch_provisions, Decimal::new(125, 0));
    }

    #[test]
    fn saturates_near_epoch_limit() {
        let s = scheduler(10);
        let minter = Minter::new(Decimal::ONE, i64::MAX - 3);
        assert!(!s.maybe_advance(&minter, i64::MAX - 1).halved);
        assert_eq!(s.next_reduction_epoch(&minter), i64::MAX);
    }
}
