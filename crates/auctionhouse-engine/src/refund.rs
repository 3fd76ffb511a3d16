//! Refund claims for outbid deposits.
//!
//! A bidder who is not the current leader may withdraw their escrowed
//! deposit exactly once, at any point in the auction's life.

use auctionhouse_ledger::ValueLedger;
use auctionhouse_types::{AccountId, Amount, AuctionEvent, AuctionId, Result};

use crate::AuctionHouse;

impl<L: ValueLedger> AuctionHouse<L> {
    /// Withdraw the caller's deposit on `auction_id`. Returns the amount paid.
    ///
    /// # Errors
    /// - `InvalidAuctionId`
    /// - `NoBidOrFundsClaimedAlready` if the caller has nothing left to claim
    /// - `AuctionWinnerCannotClaimFunds` if the caller currently leads
    /// - ledger errors from the payout
    pub fn refund(&mut self, auction_id: AuctionId, caller: AccountId, now: u64) -> Result<Amount> {
        let leader = self.auction(auction_id)?.highest_bidder;
        let plan = self.escrow.plan_refund(auction_id, caller, leader)?;

        self.pay_out(caller, plan.amount)?;
        self.escrow.apply_refund(&plan);
        self.emit(
            AuctionEvent::RefundProcessed {
                auction_id,
                amount: plan.amount,
                bidder: caller,
            },
            now,
        );

        tracing::debug!(
            auction = %auction_id,
            bidder = %caller,
            amount = %plan.amount,
            "Refund processed"
        );
        Ok(plan.amount)
    }
}
