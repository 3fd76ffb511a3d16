//! Settlement arithmetic and escrow disbursement.
//!
//! ```text
//! fee             = floor(highest_bid * fee_percent / 100)
//! seller_proceeds = highest_bid - fee
//! ```
//!
//! The seller receives `seller_proceeds`, the configured treasury receives
//! `fee`. Zero-value legs are skipped. Both legs are funded from the
//! auction's held escrow and go to the ledger as one batch; the escrow
//! book releases the auction's funds only after the batch succeeds.

use auctionhouse_ledger::{Transfer, ValueLedger};
use auctionhouse_types::{AccountId, Amount, AuctionError, AuctionId, Result};
use serde::Serialize;

use crate::AuctionHouse;

/// How a settled bid splits between seller and treasury.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Payout {
    pub gross: Amount,
    pub fee: Amount,
    pub seller_proceeds: Amount,
}

impl Payout {
    /// # Errors
    /// Returns `Configuration` if `fee_percent` exceeds 100.
    pub fn compute(gross: Amount, fee_percent: u32) -> Result<Self> {
        if fee_percent > 100 {
            return Err(AuctionError::Configuration(format!(
                "fee_percent {fee_percent} exceeds 100"
            )));
        }
        let fee = gross.percent_floor(fee_percent)?;
        Ok(Self {
            gross,
            fee,
            seller_proceeds: gross.try_sub(fee)?,
        })
    }
}

impl<L: ValueLedger> AuctionHouse<L> {
    /// Pay the leading bid to the seller and treasury and hand custody to
    /// the winner. The caller sets the resolved phase.
    pub(crate) fn disburse_to_seller(&mut self, auction_id: AuctionId) -> Result<Payout> {
        let auction = self.auction(auction_id)?;
        let seller = auction.seller;
        let payout = Payout::compute(auction.highest_bid, self.config.fee_percent)?;

        let release = self.escrow.plan_release(auction_id, payout.gross)?;
        self.ensure_escrow_covers(payout.gross)?;
        let legs = [
            (seller, payout.seller_proceeds),
            (self.config.treasury, payout.fee),
        ];
        self.pay_out_all(&legs)?;
        self.escrow.apply_release(&release);
        self.auction_mut(auction_id)?.transfer_custody();

        tracing::info!(
            auction = %auction_id,
            seller = %seller,
            gross = %payout.gross,
            fee = %payout.fee,
            proceeds = %payout.seller_proceeds,
            "Escrow disbursed to seller"
        );
        Ok(payout)
    }

    /// Return the full leading bid to the leader. No fee is taken and
    /// custody stays with the seller.
    pub(crate) fn refund_leader(&mut self, auction_id: AuctionId) -> Result<(AccountId, Amount)> {
        let auction = self.auction(auction_id)?;
        let leader = auction.highest_bidder.ok_or_else(|| {
            AuctionError::Internal(format!("{auction_id} has no leader to refund"))
        })?;
        let amount = auction.highest_bid;

        let release = self.escrow.plan_release(auction_id, amount)?;
        self.ensure_escrow_covers(amount)?;
        self.pay_out(leader, amount)?;
        self.escrow.apply_release(&release);

        tracing::info!(
            auction = %auction_id,
            bidder = %leader,
            amount = %amount,
            "Escrow returned to highest bidder"
        );
        Ok((leader, amount))
    }

    /// Transfer `amount` out of the escrow account, skipping zero.
    pub(crate) fn pay_out(&mut self, to: AccountId, amount: Amount) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        self.ledger
            .transfer_out(self.config.escrow_account, to, amount)
    }

    /// Pay several recipients out of escrow as one ledger batch, skipping
    /// zero legs. Either every recipient is paid or none is.
    fn pay_out_all(&mut self, payments: &[(AccountId, Amount)]) -> Result<()> {
        let legs: Vec<Transfer> = payments
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|&(to, amount)| Transfer::Out { to, amount })
            .collect();
        if legs.is_empty() {
            return Ok(());
        }
        self.ledger
            .transfer_batch(self.config.escrow_account, &legs)
    }

    fn ensure_escrow_covers(&self, amount: Amount) -> Result<()> {
        let balance = self.ledger.balance_of(self.config.escrow_account);
        if balance < amount {
            let err = AuctionError::EscrowInvariantViolation {
                reason: format!("escrow account holds {balance}, settlement needs {amount}"),
            };
            tracing::warn!(error = %err, "Escrow account underfunded");
            return Err(err);
        }
        Ok(())
    }
}
