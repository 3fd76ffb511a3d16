//! Supply conservation invariant checker.
//!
//! Mathematical invariant enforced by the token ledger:
//! ```text
//! Σ(balances) == Σ(mints) - Σ(burns)
//! ```
//!
//! Transfers only move value between accounts, so any drift means a
//! transfer path created or destroyed tokens.

use auctionhouse_types::{Amount, AuctionError, Result};

/// Tracks minted and burned totals and validates the sum of balances.
#[derive(Debug, Default)]
pub struct SupplyConservation {
    minted: Amount,
    burned: Amount,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns `AmountOverflow` if lifetime mints exceed `u128::MAX`.
    pub fn record_mint(&mut self, amount: Amount) -> Result<()> {
        self.minted = self.minted.try_add(amount)?;
        Ok(())
    }

    /// # Errors
    /// Returns `AmountOverflow` if lifetime burns exceed `u128::MAX`.
    pub fn record_burn(&mut self, amount: Amount) -> Result<()> {
        self.burned = self.burned.try_add(amount)?;
        Ok(())
    }

    /// Expected circulating supply: mints - burns.
    #[must_use]
    pub fn expected_supply(&self) -> Amount {
        self.minted.saturating_sub(self.burned)
    }

    #[must_use]
    pub fn total_minted(&self) -> Amount {
        self.minted
    }

    #[must_use]
    pub fn total_burned(&self) -> Amount {
        self.burned
    }

    /// Verify that the actual supply (sum of all balances) matches.
    ///
    /// # Errors
    /// Returns [`AuctionError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, actual_supply: Amount) -> Result<()> {
        let expected = self.expected_supply();
        if actual_supply != expected {
            return Err(AuctionError::SupplyInvariantViolation {
                reason: format!(
                    "actual supply {actual_supply} != expected {expected} \
                     (minted={}, burned={})",
                    self.minted, self.burned,
                ),
            });
        }
        Ok(())
    }
}
