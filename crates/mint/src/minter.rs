//! Minter state and the per-epoch provision calculation.

use crate::errors::{MintError, Result};
use crate::params::MintParams;
use epochmint_types::{decimal, Coin, EpochNumber};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mutable issuance state, persisted between epochs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minter {
    /// Issuance for the current epoch, at full precision.
    pub epoch_provisions: Decimal,
    /// Epoch at which the last reduction took effect.
    pub last_halven_epoch: EpochNumber,
}

impl Minter {
    pub fn new(epoch_provisions: Decimal, last_halven_epoch: EpochNumber) -> Self {
        Self {
            epoch_provisions,
            last_halven_epoch,
        }
    }

    /// Fresh minter seeded from the parameters.
    pub fn genesis(params: &MintParams) -> Self {
        Self::new(params.genesis_epoch_provisions, 0)
    }

    pub fn validate(&self) -> Result<()> {
        if self.epoch_provisions.is_sign_negative() && !self.epoch_provisions.is_zero() {
            return Err(MintError::InvalidGenesis(format!(
                "epoch provisions {} are negative",
                self.epoch_provisions
            )));
        }
        if self.last_halven_epoch < 0 {
            return Err(MintError::InvalidGenesis(format!(
                "last halven epoch {} is negative",
                self.last_halven_epoch
            )));
        }
        Ok(())
    }

    /// Provisions after one reduction step.
    pub fn next_epoch_provisions(&self, params: &MintParams) -> Decimal {
        self.epoch_provisions * params.reduction_factor
    }

    /// The coin minted for the current epoch: provisions truncated to whole
    /// units. The fractional remainder is not carried forward.
    pub fn epoch_provision(&self, params: &MintParams) -> Coin {
        Coin::new(
            params.mint_denom.clone(),
            decimal::truncate(self.epoch_provisions),
        )
    }
}

impl Default for Minter {
    fn default() -> Self {
        Self::genesis(&MintParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_uses_parameter_provisions() {
        let params = MintParams {
            genesis_epoch_provisions: Decimal::new(100_000, 0),
            ..Default::default()
        };
        let minter = Minter::genesis(&params);
        assert_eq!(minter.epoch_provisions, Decimal::new(100_000, 0));
        assert_eq!(minter.last_halven_epoch, 0);
    }

    #[test]
    fn provision_truncates_fraction() {
        let params = MintParams {
            mint_denom: "uosmo".into(),
            ..Default::default()
        };
        let minter = Minter::new(Decimal::new(48_828_125, 3), 0);
        assert_eq!(minter.epoch_provision(&params), Coin::new("uosmo", 48_828));

        let dust = Minter::new(Decimal::new(7, 1), 0);
        assert!(dust.epoch_provision(&params).is_zero());
    }

    #[test]
    fn next_provisions_apply_the_factor() {
        let params = MintParams::default();
        let minter = Minter::new(Decimal::new(5_000_000, 0), 0);
        assert_eq!(
            minter.next_epoch_provisions(&params),
            Decimal::new(2_500_000, 0)
        );

        let frozen = MintParams {
            reduction_factor: Decimal::ZERO,
            ..Default::default()
        };
        assert!(minter.next_epoch_provisions(&frozen).is_zero());
    }

    #[test]
    fn repeated_halving_keeps_precision() {
        let params = MintParams::default();
        let mut minter = Minter::new(Decimal::new(100_000, 0), 0);
        for _ in 0..11 {
            minter.epoch_provisions = minter.next_epoch_provisions(&params);
        }
        // 100000 / 2^11 = 48.828125
        assert_eq!(minter.epoch_provisions, Decimal::new(48_828_125, 6));
        assert_eq!(minter.epoch_provision(&params).amount, 48);
    }

    #[test]
    fn rejects_negative_state() {
        assert!(Minter::new(Decimal::new(-1, 0), 0).validate().is_err());
        assert!(Minter::new(Decimal::ONE, -1).validate().is_err());
        assert!(Minter::new(Decimal::ZERO, 0).validate().is_ok());
    }
}
