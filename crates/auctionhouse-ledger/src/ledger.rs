//! The value ledger seam consumed by the auction engine.

use auctionhouse_types::{AccountId, Amount, Result};

/// One leg of a [`ValueLedger::transfer_batch`], relative to the escrow account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// Pull from `from` into escrow, spending the allowance `from` granted.
    In { from: AccountId, amount: Amount },
    /// Pay from escrow to `to`.
    Out { to: AccountId, amount: Amount },
}

impl Transfer {
    /// The non-escrow side of the leg.
    #[must_use]
    pub fn counterparty(&self) -> AccountId {
        match *self {
            Self::In { from, .. } => from,
            Self::Out { to, .. } => to,
        }
    }
}

/// A fungible balance service with allowance semantics.
///
/// The engine treats the implementation as a black box: failures are
/// passed back to the caller unmodified, and a failed transfer must not
/// have moved anything.
pub trait ValueLedger {
    /// Current balance of `account`.
    fn balance_of(&self, account: AccountId) -> Amount;

    /// Pull `amount` from `from` into `escrow`, spending the allowance
    /// `from` granted to `escrow`.
    ///
    /// # Errors
    /// - `InsufficientAllowance` if the allowance does not cover `amount`
    /// - `InsufficientBalance` if `from` cannot pay `amount`
    fn transfer_into(&mut self, escrow: AccountId, from: AccountId, amount: Amount) -> Result<()>;

    /// Pay `amount` out of `escrow` to `to`.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if `escrow` cannot cover `amount`.
    fn transfer_out(&mut self, escrow: AccountId, to: AccountId, amount: Amount) -> Result<()>;

    /// Apply `legs` in order as one unit. If any leg fails, the legs
    /// before it are undone and that leg's error is returned.
    ///
    /// # Errors
    /// The first failing leg's error, as from `transfer_into` / `transfer_out`.
    fn transfer_batch(&mut self, escrow: AccountId, legs: &[Transfer]) -> Result<()>;
}
