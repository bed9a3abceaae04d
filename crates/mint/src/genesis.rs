//! Genesis state and configuration loading.
//!
//! A genesis file (TOML, JSON or YAML, chosen by extension) is layered under
//! `EPOCHMINT_*` environment variables, e.g.
//! `EPOCHMINT_PARAMS__REDUCTION_PERIOD_IN_EPOCHS=52`.

use crate::errors::{MintError, Result};
use crate::minter::Minter;
use crate::params::MintParams;
use config::{Config, Environment, File};
use epochmint_types::EpochNumber;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_PREFIX: &str = "EPOCHMINT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub params: MintParams,
    /// Absent means "seed from `params.genesis_epoch_provisions`".
    #[serde(default)]
    pub minter: Option<Minter>,
    /// Epoch at which halving was aligned to the distribution start, once
    /// distribution has begun.
    #[serde(default)]
    pub halven_started_epoch: Option<EpochNumber>,
}

impl GenesisState {
    pub fn new(params: MintParams, minter: Minter) -> Self {
        Self {
            params,
            minter: Some(minter),
            halven_started_epoch: None,
        }
    }

    /// Minter to install: the explicit one, or a fresh one from the params.
    pub fn resolved_minter(&self) -> Minter {
        self.minter
            .clone()
            .unwrap_or_else(|| Minter::genesis(&self.params))
    }

    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        self.resolved_minter().validate()?;
        if let Some(epoch) = self.halven_started_epoch {
            if epoch < self.params.minting_rewards_distribution_start_epoch {
                return Err(MintError::InvalidGenesis(format!(
                    "halving started at epoch {epoch}, before distribution start {}",
                    self.params.minting_rewards_distribution_start_epoch
                )));
            }
        }
        Ok(())
    }

    /// Load and validate a genesis file with environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let genesis: GenesisState = config.try_deserialize()?;
        genesis.validate()?;
        Ok(genesis)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| MintError::InvalidGenesis(err.to_string()))
    }
}

impl Default for GenesisState {
    fn default() -> Self {
        let params = MintParams::default();
        let minter = Minter::genesis(&params);
        Self::new(params, minter)
    }
}
