//! Escrow book: per-bidder deposits and per-auction held escrow.
//!
//! The book never talks to the ledger itself. Each operation is a
//! `plan_*` / `apply_*` pair so the registry can run the ledger transfer
//! in between and commit only once it has succeeded.

use std::collections::HashMap;

use auctionhouse_types::{AccountId, Amount, AuctionError, AuctionId, BidRecord, Result};
use serde::Serialize;

/// Escrow movement for an accepted bid or buy-now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositPlan {
    pub auction_id: AuctionId,
    pub bidder: AccountId,
    /// `BidRecord.deposited` once applied; equals the new highest bid.
    pub new_deposit: Amount,
    /// Pulled from the bidder into escrow.
    pub transfer_in: Amount,
    /// Paid back to the bidder from escrow (buy-now over a prior deposit).
    pub release_out: Amount,
    new_held: Amount,
}

/// Escrow movement for a losing bidder's refund claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundPlan {
    pub auction_id: AuctionId,
    pub bidder: AccountId,
    pub amount: Amount,
    new_held: Amount,
}

/// Escrow leaving an auction through settlement or arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleasePlan {
    pub auction_id: AuctionId,
    pub amount: Amount,
    new_held: Amount,
}

/// Read-only view of one auction's escrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EscrowSnapshot {
    pub auction_id: AuctionId,
    pub held: Amount,
    /// Sorted by bidder id.
    pub records: Vec<(AccountId, BidRecord)>,
}

/// Per-(auction, bidder) deposit records plus the escrow still held per auction.
#[derive(Debug, Default)]
pub struct EscrowBook {
    records: HashMap<(AuctionId, AccountId), BidRecord>,
    held: HashMap<AuctionId, Amount>,
}

impl EscrowBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn record(&self, auction_id: AuctionId, bidder: AccountId) -> Option<BidRecord> {
        self.records.get(&(auction_id, bidder)).copied()
    }

    /// Escrow held for `auction_id` and not yet paid out.
    #[must_use]
    pub fn held(&self, auction_id: AuctionId) -> Amount {
        self.held.get(&auction_id).copied().unwrap_or_default()
    }

    /// Sum of held escrow across every auction.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if the sum does not fit.
    pub fn total_held(&self) -> Result<Amount> {
        self.held
            .values()
            .try_fold(Amount::ZERO, |acc, h| acc.try_add(*h))
    }

    /// What the bidder already has in escrow and may top up from.
    ///
    /// # Errors
    /// Returns `RefundedBidderCannotRebid` once the bidder claimed a refund.
    pub fn open_deposit(&self, auction_id: AuctionId, bidder: AccountId) -> Result<Amount> {
        match self.records.get(&(auction_id, bidder)) {
            Some(record) if record.claimed => {
                Err(AuctionError::RefundedBidderCannotRebid(auction_id))
            }
            Some(record) => Ok(record.deposited),
            None => Ok(Amount::ZERO),
        }
    }

    /// Plan a bid of `amount`: only the difference to the bidder's prior
    /// deposit is pulled into escrow.
    ///
    /// # Errors
    /// - `RefundedBidderCannotRebid` if the bidder already withdrew
    /// - `AmountUnderflow` if `amount` is below the prior deposit
    pub fn plan_bid(
        &self,
        auction_id: AuctionId,
        bidder: AccountId,
        amount: Amount,
    ) -> Result<DepositPlan> {
        let prior = self.open_deposit(auction_id, bidder)?;
        let transfer_in = amount.try_sub(prior)?;
        Ok(DepositPlan {
            auction_id,
            bidder,
            new_deposit: amount,
            transfer_in,
            release_out: Amount::ZERO,
            new_held: self.held(auction_id).try_add(transfer_in)?,
        })
    }

    /// Plan a buy-now at `price`: the full price is pulled in one transfer
    /// and any prior deposit of the same bidder is paid back.
    ///
    /// # Errors
    /// Returns `RefundedBidderCannotRebid` if the bidder already withdrew.
    pub fn plan_buy_now(
        &self,
        auction_id: AuctionId,
        bidder: AccountId,
        price: Amount,
    ) -> Result<DepositPlan> {
        let prior = self.open_deposit(auction_id, bidder)?;
        let new_held = self.held(auction_id).try_add(price)?.try_sub(prior)?;
        Ok(DepositPlan {
            auction_id,
            bidder,
            new_deposit: price,
            transfer_in: price,
            release_out: prior,
            new_held,
        })
    }

    pub fn apply_deposit(&mut self, plan: &DepositPlan) {
        let record = self
            .records
            .entry((plan.auction_id, plan.bidder))
            .or_default();
        record.deposited = plan.new_deposit;
        self.held.insert(plan.auction_id, plan.new_held);
        tracing::debug!(
            auction = %plan.auction_id,
            bidder = %plan.bidder,
            deposited = %plan.new_deposit,
            transfer_in = %plan.transfer_in,
            held = %plan.new_held,
            "Escrow deposit recorded"
        );
    }

    /// Plan a refund claim by `bidder` while `leader` holds the auction.
    ///
    /// # Errors
    /// - `NoBidOrFundsClaimedAlready` if there is no unclaimed nonzero deposit
    /// - `AuctionWinnerCannotClaimFunds` if `bidder` is the current leader
    pub fn plan_refund(
        &self,
        auction_id: AuctionId,
        bidder: AccountId,
        leader: Option<AccountId>,
    ) -> Result<RefundPlan> {
        let record = self
            .records
            .get(&(auction_id, bidder))
            .filter(|r| r.is_claimable())
            .ok_or(AuctionError::NoBidOrFundsClaimedAlready)?;
        if leader == Some(bidder) {
            return Err(AuctionError::AuctionWinnerCannotClaimFunds);
        }
        Ok(RefundPlan {
            auction_id,
            bidder,
            amount: record.deposited,
            new_held: self.held(auction_id).try_sub(record.deposited)?,
        })
    }

    pub fn apply_refund(&mut self, plan: &RefundPlan) {
        if let Some(record) = self.records.get_mut(&(plan.auction_id, plan.bidder)) {
            record.claimed = true;
        }
        self.held.insert(plan.auction_id, plan.new_held);
    }

    /// Plan paying `amount` of an auction's escrow out on settlement.
    ///
    /// # Errors
    /// Returns `EscrowInvariantViolation` if the auction holds less than `amount`.
    pub fn plan_release(&self, auction_id: AuctionId, amount: Amount) -> Result<ReleasePlan> {
        let held = self.held(auction_id);
        let new_held =
            held.try_sub(amount)
                .map_err(|_| AuctionError::EscrowInvariantViolation {
                    reason: format!("{auction_id} holds {held}, cannot release {amount}"),
                })?;
        Ok(ReleasePlan {
            auction_id,
            amount,
            new_held,
        })
    }

    pub fn apply_release(&mut self, plan: &ReleasePlan) {
        self.held.insert(plan.auction_id, plan.new_held);
    }

    /// Unclaimed deposits of every bidder except `leader`.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if the sum does not fit.
    pub fn outstanding_refunds(
        &self,
        auction_id: AuctionId,
        leader: Option<AccountId>,
    ) -> Result<Amount> {
        self.records
            .iter()
            .filter(|((a, bidder), _)| *a == auction_id && Some(*bidder) != leader)
            .try_fold(Amount::ZERO, |acc, (_, r)| acc.try_add(r.outstanding()))
    }

    #[must_use]
    pub fn snapshot(&self, auction_id: AuctionId) -> EscrowSnapshot {
        let mut records: Vec<(AccountId, BidRecord)> = self
            .records
            .iter()
            .filter(|((a, _), _)| *a == auction_id)
            .map(|((_, bidder), r)| (*bidder, *r))
            .collect();
        records.sort_by_key(|(bidder, _)| *bidder);
        EscrowSnapshot {
            auction_id,
            held: self.held(auction_id),
            records,
        }
    }

    /// Check one auction: held escrow must equal what is still owed to the
    /// leader plus every unclaimed losing deposit.
    ///
    /// # Errors
    /// Returns [`AuctionError::EscrowInvariantViolation`] on mismatch.
    pub fn verify_auction(
        &self,
        auction_id: AuctionId,
        owed_on_settlement: Amount,
        leader: Option<AccountId>,
    ) -> Result<()> {
        let expected = owed_on_settlement.try_add(self.outstanding_refunds(auction_id, leader)?)?;
        let held = self.held(auction_id);
        if held != expected {
            return Err(AuctionError::EscrowInvariantViolation {
                reason: format!(
                    "{auction_id}: held {held} != expected {expected} \
                     (owed on settlement {owed_on_settlement})"
                ),
            });
        }
        Ok(())
    }

    /// Check the whole book against the escrow account's ledger balance.
    ///
    /// # Errors
    /// Returns [`AuctionError::EscrowInvariantViolation`] if they differ.
    pub fn verify_conservation(&self, escrow_balance: Amount) -> Result<()> {
        let total = self.total_held()?;
        if total != escrow_balance {
            return Err(AuctionError::EscrowInvariantViolation {
                reason: format!("escrow account balance {escrow_balance} != held escrow {total}"),
            });
        }
        Ok(())
    }
}
