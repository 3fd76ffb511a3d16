//! Dispute arbitration.
//!
//! The highest bidder may contest an auction once its deadline has passed
//! and before it is settled. Only the configured arbitrator can then
//! settle it, either in the seller's favor (ordinary fee-adjusted payout)
//! or the bidder's (full refund, no fee, custody stays with the seller).

use auctionhouse_ledger::ValueLedger;
use auctionhouse_types::{
    AccountId, AuctionError, AuctionEvent, AuctionId, AuctionPhase, DisputeStatus, Resolution,
    Result,
};

use crate::AuctionHouse;

impl<L: ValueLedger> AuctionHouse<L> {
    /// Contest an auction as its highest bidder.
    ///
    /// # Errors
    /// Checked in this order:
    /// - `InvalidAuctionId`
    /// - `AuctionAlreadyResolved`
    /// - `AuctionDeadlineNotReached` if `now < deadline`
    /// - `NotTheHighestBidder`
    /// - `DisputeAlreadyRaised`
    pub fn raise_dispute(
        &mut self,
        auction_id: AuctionId,
        caller: AccountId,
        now: u64,
    ) -> Result<()> {
        let auction = self.auction(auction_id)?;
        if auction.is_resolved() {
            return Err(AuctionError::AuctionAlreadyResolved);
        }
        if !auction.has_passed(now) {
            return Err(AuctionError::AuctionDeadlineNotReached {
                deadline: auction.deadline,
            });
        }
        if !auction.is_leader(caller) {
            return Err(AuctionError::NotTheHighestBidder);
        }
        if auction.dispute_status() != DisputeStatus::None {
            return Err(AuctionError::DisputeAlreadyRaised);
        }

        self.auction_mut(auction_id)?.phase = AuctionPhase::Disputed;
        self.emit(
            AuctionEvent::DisputeRaised {
                auction_id,
                bidder: caller,
            },
            now,
        );

        tracing::info!(auction = %auction_id, bidder = %caller, "Dispute raised");
        Ok(())
    }

    /// Settle a disputed auction as the arbitrator.
    ///
    /// # Errors
    /// - `InvalidAuctionId`
    /// - `NotTheArbitrator`
    /// - `NoDisputeRaised` unless a dispute is open
    /// - ledger errors from the payout
    pub fn resolve_dispute(
        &mut self,
        auction_id: AuctionId,
        favor_seller: bool,
        caller: AccountId,
        now: u64,
    ) -> Result<()> {
        let auction = self.auction(auction_id)?;
        if caller != self.config.arbitrator {
            return Err(AuctionError::NotTheArbitrator);
        }
        if auction.dispute_status() != DisputeStatus::Raised {
            return Err(AuctionError::NoDisputeRaised);
        }
        let seller = auction.seller;
        let amount = auction.highest_bid;
        let bidder = auction.highest_bidder.ok_or_else(|| {
            AuctionError::Internal(format!("{auction_id} is disputed without a leader"))
        })?;

        if favor_seller {
            self.disburse_to_seller(auction_id)?;
        } else {
            self.refund_leader(auction_id)?;
        }
        self.auction_mut(auction_id)?.phase =
            AuctionPhase::Resolved(Resolution::Dispute { favor_seller });
        self.emit(
            AuctionEvent::DisputeResolved {
                auction_id,
                favor_seller,
                seller,
                bidder,
            },
            now,
        );
        self.emit(
            AuctionEvent::AuctionResolved {
                auction_id,
                amount,
                winner: Some(bidder),
            },
            now,
        );

        tracing::info!(
            auction = %auction_id,
            favor_seller,
            seller = %seller,
            bidder = %bidder,
            amount = %amount,
            "Dispute resolved"
        );
        Ok(())
    }
}
