//! Account ledger interface
//!
//! The ledger owns balances and total supply per denomination. Modules act
//! through their keyless module accounts; only modules holding the `Minter`
//! permission may create supply.

use crate::error::{LedgerError, Result};
use epochmint_types::{module_address, Address, Coin};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

/// Capabilities a module account may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    Minter,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Minter => f.write_str("minter"),
        }
    }
}

/// Interface for the ledger operations the mint engine depends on.
pub trait AccountLedger {
    /// Create `coin` out of thin air into `module`'s account.
    fn mint_coins(&mut self, module: &str, coin: &Coin) -> Result<()>;

    /// Move `coin` from a module account to an ordinary address.
    fn send_from_module_to_account(&mut self, module: &str, to: &Address, coin: &Coin)
        -> Result<()>;

    /// Move `coin` between two module accounts.
    fn send_from_module_to_module(&mut self, from: &str, to: &str, coin: &Coin) -> Result<()>;

    /// Balance of `owner` in `denom`.
    fn balance(&self, owner: &Address, denom: &str) -> u128;

    /// Total supply of `denom`.
    fn supply(&self, denom: &str) -> u128;

    /// Convenience: balance of a module account.
    fn module_balance(&self, module: &str, denom: &str) -> u128 {
        self.balance(&module_address(module), denom)
    }
}

// -----------------------------------------------------------------------------
// In-memory implementation (for the simulator and tests)
// -----------------------------------------------------------------------------

/// Deterministic in-memory ledger. `BTreeMap`s keep iteration order stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryLedger {
    balances: BTreeMap<Address, BTreeMap<String, u128>>,
    supply: BTreeMap<String, u128>,
    permissions: BTreeMap<String, BTreeSet<Permission>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module account and grant it `permissions`.
    pub fn with_module(mut self, module: &str, permissions: &[Permission]) -> Self {
        self.register_module(module, permissions);
        self
    }

    pub fn register_module(&mut self, module: &str, permissions: &[Permission]) {
        self.permissions
            .entry(module.to_string())
            .or_default()
            .extend(permissions.iter().copied());
    }

    pub fn has_permission(&self, module: &str, permission: Permission) -> bool {
        self.permissions
            .get(module)
            .map_or(false, |set| set.contains(&permission))
    }

    /// Seed a balance directly (genesis accounts, tests). Counts toward supply.
    pub fn set_balance(&mut self, owner: &Address, coin: &Coin) -> Result<()> {
        coin.validate()?;
        let previous = self.balance(owner, &coin.denom);
        let supply = self.supply(&coin.denom).saturating_sub(previous);
        let supply = supply
            .checked_add(coin.amount)
            .ok_or_else(|| LedgerError::Overflow {
                denom: coin.denom.clone(),
            })?;
        self.supply.insert(coin.denom.clone(), supply);
        self.balances
            .entry(*owner)
            .or_default()
            .insert(coin.denom.clone(), coin.amount);
        Ok(())
    }

    /// Every non-zero balance, ordered by address then denom.
    pub fn all_balances(&self) -> Vec<(Address, Coin)> {
        self.balances
            .iter()
            .flat_map(|(owner, coins)| {
                coins
                    .iter()
                    .filter(|(_, amount)| **amount > 0)
                    .map(move |(denom, amount)| (*owner, Coin::new(denom.clone(), *amount)))
            })
            .collect()
    }

    fn require_module(&self, module: &str) -> Result<()> {
        if self.permissions.contains_key(module) {
            Ok(())
        } else {
            Err(LedgerError::UnknownModule(module.to_string()))
        }
    }

    fn credit(&mut self, owner: &Address, coin: &Coin) -> Result<()> {
        let entry = self
            .balances
            .entry(*owner)
            .or_default()
            .entry(coin.denom.clone())
            .or_insert(0);
        *entry = entry
            .checked_add(coin.amount)
            .ok_or_else(|| LedgerError::Overflow {
                denom: coin.denom.clone(),
            })?;
        Ok(())
    }

    fn debit(&mut self, owner: &Address, label: &str, coin: &Coin) -> Result<()> {
        let available = self.balance(owner, &coin.denom);
        if available < coin.amount {
            return Err(LedgerError::InsufficientFunds {
                account: label.to_string(),
                denom: coin.denom.clone(),
                needed: coin.amount,
                available,
            });
        }
        if let Some(coins) = self.balances.get_mut(owner) {
            coins.insert(coin.denom.clone(), available - coin.amount);
        }
        Ok(())
    }

    fn transfer(&mut self, from: &Address, label: &str, to: &Address, coin: &Coin) -> Result<()> {
        coin.validate()?;
        // Check the destination can absorb the amount before touching the source.
        let dest = self.balance(to, &coin.denom);
        if from != to && dest.checked_add(coin.amount).is_none() {
            return Err(LedgerError::Overflow {
                denom: coin.denom.clone(),
            });
        }
        self.debit(from, label, coin)?;
        self.credit(to, coin)
    }
}

impl AccountLedger for InMemoryLedger {
    fn mint_coins(&mut self, module: &str, coin: &Coin) -> Result<()> {
        coin.validate()?;
        self.require_module(module)?;
        if !self.has_permission(module, Permission::Minter) {
            return Err(LedgerError::MissingPermission {
                module: module.to_string(),
                permission: Permission::Minter.to_string(),
            });
        }

        let supply = self
            .supply(&coin.denom)
            .checked_add(coin.amount)
            .ok_or_else(|| LedgerError::Overflow {
                denom: coin.denom.clone(),
            })?;
        self.credit(&module_address(module), coin)?;
        self.supply.insert(coin.denom.clone(), supply);

        debug!(target: "treasury", "Minted {} into module {}", coin, module);
        Ok(())
    }

    fn send_from_module_to_account(
        &mut self,
        module: &str,
        to: &Address,
        coin: &Coin,
    ) -> Result<()> {
        self.require_module(module)?;
        self.transfer(&module_address(module), module, to, coin)?;
        debug!(target: "treasury", "Sent {} from module {} to {}", coin, module, to);
        Ok(())
    }

    fn send_from_module_to_module(&mut self, from: &str, to: &str, coin: &Coin) -> Result<()> {
        self.require_module(from)?;
        self.require_module(to)?;
        self.transfer(&module_address(from), from, &module_address(to), coin)?;
        debug!(target: "treasury", "Sent {} from module {} to module {}", coin, from, to);
        Ok(())
    }

    fn balance(&self, owner: &Address, denom: &str) -> u128 {
        self.balances
            .get(owner)
            .and_then(|coins| coins.get(denom))
            .copied()
            .unwrap_or(0)
    }

    fn supply(&self, denom: &str) -> u128 {
        self.supply.get(denom).copied().unwrap_or(0)
    }
}
