//! In-memory payment token.
//!
//! A minimal fungible token with an owner-gated mint, holder-granted
//! allowances, and direct transfers. All mutations are atomic: either the
//! full operation succeeds or every balance and allowance is unchanged.

use std::collections::HashMap;
use std::hash::Hash;

use auctionhouse_types::{AccountId, Amount, AuctionError, LedgerConfig, Result};
use rust_decimal::Decimal;

use crate::ledger::{Transfer, ValueLedger};
use crate::supply_conservation::SupplyConservation;

/// Fungible token ledger backing auction escrow.
#[derive(Debug)]
pub struct TokenLedger {
    config: LedgerConfig,
    /// Only this account may mint.
    owner: AccountId,
    balances: HashMap<AccountId, Amount>,
    /// `(holder, spender) → remaining allowance`.
    allowances: HashMap<(AccountId, AccountId), Amount>,
    supply: SupplyConservation,
}

impl TokenLedger {
    /// Create an empty token owned by `owner`.
    #[must_use]
    pub fn new(owner: AccountId, config: LedgerConfig) -> Self {
        Self {
            config,
            owner,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            supply: SupplyConservation::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    #[must_use]
    pub fn decimals(&self) -> u32 {
        self.config.decimals
    }

    #[must_use]
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    /// Convert a human-readable token value into base units.
    ///
    /// # Errors
    /// See [`Amount::from_tokens`].
    pub fn parse_units(&self, tokens: Decimal) -> Result<Amount> {
        Amount::from_tokens(tokens, self.config.decimals)
    }

    /// Create `amount` new tokens in `to`'s balance.
    ///
    /// # Errors
    /// - `NotTheTokenOwner` if `caller` is not the owner
    /// - `AmountOverflow` if the balance or total supply would overflow
    pub fn mint(&mut self, caller: AccountId, to: AccountId, amount: Amount) -> Result<()> {
        if caller != self.owner {
            return Err(AuctionError::NotTheTokenOwner);
        }
        let new_balance = self.balance_of(to).try_add(amount)?;
        self.supply.record_mint(amount)?;
        self.balances.insert(to, new_balance);
        tracing::debug!(to = %to, amount = %amount, "Tokens minted");
        Ok(())
    }

    /// Destroy `amount` of `holder`'s own tokens.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if `holder` holds less than `amount`.
    pub fn burn(&mut self, holder: AccountId, amount: Amount) -> Result<()> {
        let new_balance = self.debit_preview(holder, amount)?;
        self.supply.record_burn(amount)?;
        self.balances.insert(holder, new_balance);
        Ok(())
    }

    /// Set the allowance `holder` grants to `spender`, replacing any previous value.
    pub fn approve(&mut self, holder: AccountId, spender: AccountId, amount: Amount) {
        self.allowances.insert((holder, spender), amount);
    }

    /// Remaining allowance `holder` granted to `spender`.
    #[must_use]
    pub fn allowance(&self, holder: AccountId, spender: AccountId) -> Amount {
        self.allowances
            .get(&(holder, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Move `amount` from `from` to `to` on `from`'s own authority.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if `from` holds less than `amount`.
    pub fn transfer(&mut self, from: AccountId, to: AccountId, amount: Amount) -> Result<()> {
        let debited = self.debit_preview(from, amount)?;
        if from == to {
            return Ok(());
        }
        let credited = self.balance_of(to).try_add(amount)?;
        self.balances.insert(from, debited);
        self.balances.insert(to, credited);
        Ok(())
    }

    /// Total supply currently in circulation.
    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.supply.expected_supply()
    }

    /// Check that balances sum to the minted supply.
    ///
    /// # Errors
    /// Returns `SupplyInvariantViolation` on drift.
    pub fn verify_supply(&self) -> Result<()> {
        let actual = self
            .balances
            .values()
            .try_fold(Amount::ZERO, |acc, b| acc.try_add(*b))?;
        self.supply.verify(actual).inspect_err(|err| {
            tracing::warn!(error = %err, "Token supply invariant failed");
        })
    }

    /// `from`'s balance after paying `amount`, without applying it.
    fn debit_preview(&self, from: AccountId, amount: Amount) -> Result<Amount> {
        let balance = self.balance_of(from);
        balance
            .try_sub(amount)
            .map_err(|_| AuctionError::InsufficientBalance {
                account: from,
                balance,
                needed: amount,
            })
    }
}

impl ValueLedger for TokenLedger {
    fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    fn transfer_into(&mut self, escrow: AccountId, from: AccountId, amount: Amount) -> Result<()> {
        // Allowance is checked before balance.
        let allowance = self.allowance(from, escrow);
        if allowance < amount {
            return Err(AuctionError::InsufficientAllowance {
                spender: escrow,
                allowance,
                needed: amount,
            });
        }
        self.transfer(from, escrow, amount)?;
        if allowance != Amount::MAX {
            self.allowances
                .insert((from, escrow), allowance.saturating_sub(amount));
        }
        Ok(())
    }

    fn transfer_out(&mut self, escrow: AccountId, to: AccountId, amount: Amount) -> Result<()> {
        self.transfer(escrow, to, amount)
    }

    fn transfer_batch(&mut self, escrow: AccountId, legs: &[Transfer]) -> Result<()> {
        // Every entry a leg can touch, captured before the first leg runs.
        let balances: Vec<_> = std::iter::once(escrow)
            .chain(legs.iter().map(Transfer::counterparty))
            .map(|account| (account, self.balances.get(&account).copied()))
            .collect();
        let allowances: Vec<_> = legs
            .iter()
            .filter_map(|leg| match *leg {
                Transfer::In { from, .. } => Some((from, escrow)),
                Transfer::Out { .. } => None,
            })
            .map(|key| (key, self.allowances.get(&key).copied()))
            .collect();

        for (index, leg) in legs.iter().enumerate() {
            let applied = match *leg {
                Transfer::In { from, amount } => self.transfer_into(escrow, from, amount),
                Transfer::Out { to, amount } => self.transfer_out(escrow, to, amount),
            };
            if let Err(err) = applied {
                for (account, prior) in balances {
                    restore(&mut self.balances, account, prior);
                }
                for (key, prior) in allowances {
                    restore(&mut self.allowances, key, prior);
                }
                tracing::debug!(leg = index, error = %err, "Transfer batch rolled back");
                return Err(err);
            }
        }
        Ok(())
    }
}

fn restore<K: Eq + Hash, V>(map: &mut HashMap<K, V>, key: K, prior: Option<V>) {
    match prior {
        Some(value) => {
            map.insert(key, value);
        }
        None => {
            map.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (TokenLedger, AccountId) {
        let owner = AccountId::new();
        (TokenLedger::new(owner, LedgerConfig::default()), owner)
    }

    #[test]
    fn metadata_from_config() {
        let (ledger, owner) = setup();
        assert_eq!(ledger.name(), "AuctionHouseToken");
        assert_eq!(ledger.symbol(), "AHT");
        assert_eq!(ledger.decimals(), 18);
        assert_eq!(ledger.owner(), owner);
    }

    #[test]
    fn mint_increases_balance_and_supply() {
        let (mut ledger, owner) = setup();
        let user = AccountId::new();
        ledger.mint(owner, user, Amount(1000)).unwrap();
        assert_eq!(ledger.balance_of(user), Amount(1000));
        assert_eq!(ledger.total_supply(), Amount(1000));
        ledger.verify_supply().unwrap();
    }

    #[test]
    fn only_owner_mints() {
        let (mut ledger, _) = setup();
        let user = AccountId::new();
        let err = ledger.mint(user, user, Amount(1)).unwrap_err();
        assert_eq!(err, AuctionError::NotTheTokenOwner);
        assert_eq!(ledger.balance_of(user), Amount::ZERO);
    }

    #[test]
    fn transfer_into_requires_allowance_first() {
        let (mut ledger, owner) = setup();
        let escrow = AccountId::new();
        let user = AccountId::new();

        // No balance and no allowance: allowance error wins.
        let err = ledger.transfer_into(escrow, user, Amount(10)).unwrap_err();
        assert_eq!(
            err,
            AuctionError::InsufficientAllowance {
                spender: escrow,
                allowance: Amount::ZERO,
                needed: Amount(10),
            }
        );

        ledger.mint(owner, user, Amount(5)).unwrap();
        ledger.approve(user, escrow, Amount(100));
        let err = ledger.transfer_into(escrow, user, Amount(10)).unwrap_err();
        assert_eq!(
            err,
            AuctionError::InsufficientBalance {
                account: user,
                balance: Amount(5),
                needed: Amount(10),
            }
        );
        // Failed transfer leaves allowance untouched.
        assert_eq!(ledger.allowance(user, escrow), Amount(100));
    }

    #[test]
    fn transfer_into_spends_allowance() {
        let (mut ledger, owner) = setup();
        let escrow = AccountId::new();
        let user = AccountId::new();
        ledger.mint(owner, user, Amount(1000)).unwrap();
        ledger.approve(user, escrow, Amount(100));

        ledger.transfer_into(escrow, user, Amount(40)).unwrap();
        assert_eq!(ledger.balance_of(user), Amount(960));
        assert_eq!(ledger.balance_of(escrow), Amount(40));
        assert_eq!(ledger.allowance(user, escrow), Amount(60));
    }

    #[test]
    fn unlimited_allowance_is_not_decremented() {
        let (mut ledger, owner) = setup();
        let escrow = AccountId::new();
        let user = AccountId::new();
        ledger.mint(owner, user, Amount(1000)).unwrap();
        ledger.approve(user, escrow, Amount::MAX);
        ledger.transfer_into(escrow, user, Amount(400)).unwrap();
        assert_eq!(ledger.allowance(user, escrow), Amount::MAX);
    }

    #[test]
    fn transfer_out_pays_from_escrow() {
        let (mut ledger, owner) = setup();
        let escrow = AccountId::new();
        let seller = AccountId::new();
        ledger.mint(owner, escrow, Amount(200)).unwrap();

        ledger.transfer_out(escrow, seller, Amount(196)).unwrap();
        assert_eq!(ledger.balance_of(seller), Amount(196));
        assert_eq!(ledger.balance_of(escrow), Amount(4));

        let err = ledger.transfer_out(escrow, seller, Amount(5)).unwrap_err();
        assert!(matches!(err, AuctionError::InsufficientBalance { .. }));
        ledger.verify_supply().unwrap();
    }

    #[test]
    fn batch_applies_every_leg() {
        let (mut ledger, owner) = setup();
        let escrow = AccountId::new();
        let user = AccountId::new();
        ledger.mint(owner, user, Amount(1000)).unwrap();
        ledger.mint(owner, escrow, Amount(30)).unwrap();
        ledger.approve(user, escrow, Amount(500));

        let legs = [
            Transfer::In {
                from: user,
                amount: Amount(500),
            },
            Transfer::Out {
                to: user,
                amount: Amount(30),
            },
        ];
        ledger.transfer_batch(escrow, &legs).unwrap();
        assert_eq!(ledger.balance_of(user), Amount(530));
        assert_eq!(ledger.balance_of(escrow), Amount(500));
        assert_eq!(ledger.allowance(user, escrow), Amount::ZERO);
    }

    #[test]
    fn failed_leg_rolls_back_earlier_legs() {
        let (mut ledger, owner) = setup();
        let escrow = AccountId::new();
        let seller = AccountId::new();
        let treasury = AccountId::new();
        ledger.mint(owner, escrow, Amount(100)).unwrap();

        // Second leg needs more than is left after the first.
        let legs = [
            Transfer::Out {
                to: seller,
                amount: Amount(98),
            },
            Transfer::Out {
                to: treasury,
                amount: Amount(3),
            },
        ];
        let err = ledger.transfer_batch(escrow, &legs).unwrap_err();
        assert_eq!(
            err,
            AuctionError::InsufficientBalance {
                account: escrow,
                balance: Amount(2),
                needed: Amount(3),
            }
        );
        assert_eq!(ledger.balance_of(escrow), Amount(100));
        assert_eq!(ledger.balance_of(seller), Amount::ZERO);
        assert_eq!(ledger.balance_of(treasury), Amount::ZERO);
        ledger.verify_supply().unwrap();
    }

    #[test]
    fn failed_leg_restores_spent_allowance() {
        let (mut ledger, owner) = setup();
        let escrow = AccountId::new();
        let user = AccountId::new();
        let other = AccountId::new();
        ledger.mint(owner, user, Amount(100)).unwrap();
        ledger.approve(user, escrow, Amount(80));

        let legs = [
            Transfer::In {
                from: user,
                amount: Amount(50),
            },
            Transfer::Out {
                to: other,
                amount: Amount(60),
            },
        ];
        assert!(ledger.transfer_batch(escrow, &legs).is_err());
        assert_eq!(ledger.balance_of(user), Amount(100));
        assert_eq!(ledger.balance_of(escrow), Amount::ZERO);
        assert_eq!(ledger.allowance(user, escrow), Amount(80));
        ledger.verify_supply().unwrap();
    }

    #[test]
    fn self_transfer_is_noop() {
        let (mut ledger, owner) = setup();
        let user = AccountId::new();
        ledger.mint(owner, user, Amount(10)).unwrap();
        ledger.transfer(user, user, Amount(10)).unwrap();
        assert_eq!(ledger.balance_of(user), Amount(10));
    }

    #[test]
    fn burn_reduces_supply() {
        let (mut ledger, owner) = setup();
        let user = AccountId::new();
        ledger.mint(owner, user, Amount(10)).unwrap();
        ledger.burn(user, Amount(4)).unwrap();
        assert_eq!(ledger.total_supply(), Amount(6));
        assert!(ledger.burn(user, Amount(7)).is_err());
        ledger.verify_supply().unwrap();
    }

    #[test]
    fn parse_units_uses_token_decimals() {
        let (ledger, _) = setup();
        let amount = ledger.parse_units(Decimal::new(10, 0)).unwrap();
        assert_eq!(amount, Amount(10_000_000_000_000_000_000));
    }
}
