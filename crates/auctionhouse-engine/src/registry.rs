//! Auction registry and lifecycle controller.
//!
//! Owns every auction, the escrow book and the event log, and drives the
//! bidding half of the lifecycle: creation, bids, buy-now and ordinary
//! seller settlement. Dispute arbitration and refund claims live in
//! [`crate::dispute`] and [`crate::refund`] as further `impl` blocks on
//! [`AuctionHouse`].

use std::collections::BTreeMap;

use auctionhouse_escrow::{EscrowBook, EscrowSnapshot};
use auctionhouse_ledger::{Transfer, ValueLedger};
use auctionhouse_types::{
    AccountId, Amount, Auction, AuctionError, AuctionEvent, AuctionId, AuctionPhase, BidRecord,
    EventLog, EventRecord, HouseConfig, Resolution, Result,
};

/// The auction registry over a value ledger `L`.
///
/// All operations take the caller identity and the request time
/// explicitly. Every operation either fully succeeds or returns an error
/// with no state changed.
#[derive(Debug)]
pub struct AuctionHouse<L> {
    pub(crate) config: HouseConfig,
    pub(crate) ledger: L,
    pub(crate) auctions: BTreeMap<AuctionId, Auction>,
    next_id: AuctionId,
    pub(crate) escrow: EscrowBook,
    events: EventLog,
}

impl<L: ValueLedger> AuctionHouse<L> {
    /// Create an empty registry.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` does not validate.
    pub fn new(config: HouseConfig, ledger: L) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            escrow = %config.escrow_account,
            arbitrator = %config.arbitrator,
            treasury = %config.treasury,
            fee_percent = config.fee_percent,
            "AuctionHouse initialized"
        );
        Ok(Self {
            config,
            ledger,
            auctions: BTreeMap::new(),
            next_id: AuctionId::FIRST,
            escrow: EscrowBook::new(),
            events: EventLog::new(),
        })
    }

    // -----------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------

    /// List a new item.
    ///
    /// # Errors
    /// Checked in this order:
    /// - `InvalidItemDetails` if `item_label` is empty
    /// - `InvalidMinimumBid` if `min_bid` is zero
    /// - `InvalidAuctionDeadline` if `deadline <= now`
    /// - `InvalidBuyNowPrice` if a nonzero `buy_now_price` does not exceed `min_bid`
    pub fn create_auction(
        &mut self,
        item_label: &str,
        min_bid: Amount,
        deadline: u64,
        buy_now_price: Amount,
        seller: AccountId,
        now: u64,
    ) -> Result<AuctionId> {
        if item_label.is_empty() {
            return Err(AuctionError::InvalidItemDetails);
        }
        if min_bid.is_zero() {
            return Err(AuctionError::InvalidMinimumBid);
        }
        if deadline <= now {
            return Err(AuctionError::InvalidAuctionDeadline { deadline, now });
        }
        if !buy_now_price.is_zero() && buy_now_price <= min_bid {
            return Err(AuctionError::InvalidBuyNowPrice {
                buy_now_price,
                min_bid,
            });
        }

        let id = self.next_id;
        self.next_id = id.next();
        self.auctions.insert(
            id,
            Auction::new(id, seller, item_label, min_bid, deadline, buy_now_price, now),
        );
        self.emit(
            AuctionEvent::AuctionCreated {
                seller,
                item_label: item_label.to_string(),
                auction_id: id,
                min_bid,
                deadline,
                buy_now_price,
            },
            now,
        );

        tracing::info!(
            auction = %id,
            seller = %seller,
            min_bid = %min_bid,
            buy_now_price = %buy_now_price,
            deadline,
            "Auction created"
        );
        Ok(id)
    }

    /// Bid `amount` on an open auction.
    ///
    /// Only the difference to the bidder's earlier deposit is pulled into
    /// escrow. A bid reaching the buy-now price closes bidding. A bid
    /// landing inside the extension window pushes the deadline back.
    ///
    /// # Errors
    /// - `InvalidAuctionId`
    /// - `AuctionDeadlineHasPassed` if `now >= deadline`
    /// - `AuctionNoLongerActive` if bidding is closed
    /// - `InvalidBidAmount` if below the minimum or not above the leader
    /// - `RefundedBidderCannotRebid` if the bidder already claimed a refund
    /// - ledger errors from pulling the top-up into escrow
    pub fn place_bid(
        &mut self,
        auction_id: AuctionId,
        amount: Amount,
        bidder: AccountId,
        now: u64,
    ) -> Result<()> {
        let auction = self.auction(auction_id)?;
        ensure_bidding_open(auction, now)?;
        if amount < auction.min_bid || amount <= auction.highest_bid {
            return Err(AuctionError::InvalidBidAmount {
                amount,
                min_bid: auction.min_bid,
                highest_bid: auction.highest_bid,
            });
        }
        let buy_now = auction.reaches_buy_now(amount);

        let plan = self.escrow.plan_bid(auction_id, bidder, amount)?;
        self.ledger
            .transfer_into(self.config.escrow_account, bidder, plan.transfer_in)?;
        self.escrow.apply_deposit(&plan);

        let window = self.config.extension_window_secs;
        let extension = self.config.extension_secs;
        let auction = self.auction_mut(auction_id)?;
        auction.highest_bid = amount;
        auction.highest_bidder = Some(bidder);
        if buy_now {
            auction.phase = AuctionPhase::BuyNowLocked;
        }
        let extended = extend_deadline(auction, now, window, extension);

        let event = if buy_now {
            AuctionEvent::BuyNowCompleted {
                auction_id,
                amount,
                bidder,
            }
        } else {
            AuctionEvent::BidPlaced {
                auction_id,
                amount,
                bidder,
            }
        };
        self.emit(event, now);
        if let Some(new_deadline) = extended {
            self.emit(
                AuctionEvent::AuctionDeadlineExtended {
                    auction_id,
                    new_deadline,
                },
                now,
            );
        }

        tracing::debug!(
            auction = %auction_id,
            bidder = %bidder,
            amount = %amount,
            top_up = %plan.transfer_in,
            buy_now,
            extended_to = ?extended,
            "Bid accepted"
        );
        Ok(())
    }

    /// Win an open auction outright at its buy-now price.
    ///
    /// The full price is pulled into escrow and any earlier deposit of the
    /// caller on this auction is paid back, both in one ledger batch. The
    /// deadline is not extended.
    ///
    /// # Errors
    /// - `InvalidAuctionId`
    /// - `AuctionDeadlineHasPassed` if `now >= deadline`
    /// - `AuctionNoLongerActive` if bidding is closed
    /// - `BuyNowNotAvailable` if the auction has no buy-now price
    /// - `RefundedBidderCannotRebid` if the caller already claimed a refund
    /// - ledger errors from pulling the price into escrow
    pub fn buy_now(&mut self, auction_id: AuctionId, bidder: AccountId, now: u64) -> Result<()> {
        let auction = self.auction(auction_id)?;
        ensure_bidding_open(auction, now)?;
        if !auction.has_buy_now() {
            return Err(AuctionError::BuyNowNotAvailable);
        }
        let price = auction.buy_now_price;

        let plan = self.escrow.plan_buy_now(auction_id, bidder, price)?;
        let mut legs = vec![Transfer::In {
            from: bidder,
            amount: plan.transfer_in,
        }];
        if !plan.release_out.is_zero() {
            legs.push(Transfer::Out {
                to: bidder,
                amount: plan.release_out,
            });
        }
        self.ledger
            .transfer_batch(self.config.escrow_account, &legs)?;
        self.escrow.apply_deposit(&plan);

        let auction = self.auction_mut(auction_id)?;
        auction.highest_bid = price;
        auction.highest_bidder = Some(bidder);
        auction.phase = AuctionPhase::BuyNowLocked;
        self.emit(
            AuctionEvent::BuyNowCompleted {
                auction_id,
                amount: price,
                bidder,
            },
            now,
        );

        tracing::debug!(
            auction = %auction_id,
            bidder = %bidder,
            price = %price,
            released = %plan.release_out,
            "Buy-now completed"
        );
        Ok(())
    }

    /// Seller-initiated settlement once the deadline has passed.
    ///
    /// Without a leader the auction simply closes. Otherwise the leading
    /// bid is paid out to the seller less the platform fee, the fee goes
    /// to the treasury, and custody passes to the winner.
    ///
    /// # Errors
    /// Checked in this order:
    /// - `InvalidAuctionId`
    /// - `AuctionAlreadyResolved`
    /// - `AuctionDeadlineNotReached` if `now < deadline`
    /// - `NotTheSeller`
    /// - `AuctionUnderDispute` while the arbitrator has not ruled
    pub fn resolve_auction(
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
        if auction.seller != caller {
            return Err(AuctionError::NotTheSeller);
        }
        if auction.phase == AuctionPhase::Disputed {
            return Err(AuctionError::AuctionUnderDispute);
        }
        let winner = auction.highest_bidder;

        let amount = match winner {
            Some(_) => self.disburse_to_seller(auction_id)?.gross,
            None => Amount::ZERO,
        };
        self.auction_mut(auction_id)?.phase = AuctionPhase::Resolved(Resolution::Normal);
        self.emit(
            AuctionEvent::AuctionResolved {
                auction_id,
                amount,
                winner,
            },
            now,
        );

        tracing::info!(
            auction = %auction_id,
            amount = %amount,
            winner = ?winner,
            "Auction resolved"
        );
        Ok(())
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Snapshot of one auction.
    ///
    /// # Errors
    /// Returns `InvalidAuctionId` for an unknown id.
    pub fn get_auction_details(&self, auction_id: AuctionId) -> Result<Auction> {
        self.auction(auction_id).cloned()
    }

    /// Number of auctions ever created.
    #[must_use]
    pub fn auction_count(&self) -> usize {
        self.auctions.len()
    }

    /// All auctions in id order.
    pub fn auctions(&self) -> impl Iterator<Item = &Auction> {
        self.auctions.values()
    }

    #[must_use]
    pub fn bid_record(&self, auction_id: AuctionId, bidder: AccountId) -> Option<BidRecord> {
        self.escrow.record(auction_id, bidder)
    }

    /// Escrow still held for `auction_id`.
    #[must_use]
    pub fn escrow_held(&self, auction_id: AuctionId) -> Amount {
        self.escrow.held(auction_id)
    }

    /// # Errors
    /// Returns `InvalidAuctionId` for an unknown id.
    pub fn escrow_snapshot(&self, auction_id: AuctionId) -> Result<EscrowSnapshot> {
        self.auction(auction_id)?;
        Ok(self.escrow.snapshot(auction_id))
    }

    #[must_use]
    pub fn config(&self) -> &HouseConfig {
        &self.config
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct ledger access for funding and approvals.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Events emitted since the previous call.
    pub fn take_unpublished(&mut self) -> Vec<EventRecord> {
        self.events.take_unpublished()
    }

    // -----------------------------------------------------------------
    // Invariants
    // -----------------------------------------------------------------

    /// Check every auction's held escrow against its bid records, then the
    /// total against the escrow account's ledger balance.
    ///
    /// # Errors
    /// Returns `EscrowInvariantViolation` on the first mismatch.
    pub fn verify_escrow(&self) -> Result<()> {
        let result = self.check_escrow();
        if let Err(err) = &result {
            tracing::warn!(error = %err, "Escrow invariant failed");
        }
        result
    }

    fn check_escrow(&self) -> Result<()> {
        for auction in self.auctions.values() {
            let owed = if auction.is_resolved() {
                Amount::ZERO
            } else {
                auction.highest_bid
            };
            self.escrow
                .verify_auction(auction.id, owed, auction.highest_bidder)?;
        }
        self.escrow
            .verify_conservation(self.ledger.balance_of(self.config.escrow_account))
    }

    /// Recompute the notification hash chain.
    ///
    /// # Errors
    /// Returns `EventChainBroken` at the first bad record.
    pub fn verify_events(&self) -> Result<()> {
        self.events.verify_chain()
    }

    // -----------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------

    pub(crate) fn auction(&self, auction_id: AuctionId) -> Result<&Auction> {
        self.auctions
            .get(&auction_id)
            .ok_or(AuctionError::InvalidAuctionId(auction_id))
    }

    pub(crate) fn auction_mut(&mut self, auction_id: AuctionId) -> Result<&mut Auction> {
        self.auctions
            .get_mut(&auction_id)
            .ok_or(AuctionError::InvalidAuctionId(auction_id))
    }

    pub(crate) fn emit(&mut self, event: AuctionEvent, now: u64) {
        let record = self.events.append(event, now);
        tracing::debug!(sequence = record.sequence, event = %record.event, "Event emitted");
    }
}

fn ensure_bidding_open(auction: &Auction, now: u64) -> Result<()> {
    if auction.has_passed(now) {
        return Err(AuctionError::AuctionDeadlineHasPassed {
            deadline: auction.deadline,
        });
    }
    if !auction.is_bidding_open() {
        return Err(AuctionError::AuctionNoLongerActive);
    }
    Ok(())
}

/// Anti-sniping rule: a bid with less than `window` seconds left pushes the
/// stored deadline back by `extension`. Returns the new deadline if moved.
fn extend_deadline(auction: &mut Auction, now: u64, window: u64, extension: u64) -> Option<u64> {
    if auction.remaining_secs(now) >= window {
        return None;
    }
    auction.deadline = auction.deadline.saturating_add(extension);
    Some(auction.deadline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{Fixture, NOW};
    use auctionhouse_types::{AuctionStatus, DisputeStatus};

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut f = Fixture::new();
        let first = f.create(10, 0, NOW + 1_800);
        let second = f.create(10, 0, NOW + 1_800);
        assert_eq!(first, AuctionId(1));
        assert_eq!(second, AuctionId(2));
        assert_eq!(f.house.auction_count(), 2);
    }

    #[test]
    fn created_auction_matches_input() {
        let mut f = Fixture::new();
        let id = f.create(10, 20, NOW + 1_800);
        let auction = f.house.get_auction_details(id).unwrap();
        assert_eq!(auction.seller, f.seller);
        assert_eq!(auction.item_label, "Item 1");
        assert_eq!(auction.min_bid, Amount(10));
        assert_eq!(auction.buy_now_price, Amount(20));
        assert_eq!(auction.deadline, NOW + 1_800);
        assert_eq!(auction.status(), AuctionStatus::Active);
        assert_eq!(auction.dispute_status(), DisputeStatus::None);
        assert!(matches!(
            f.house.events().records()[0].event,
            AuctionEvent::AuctionCreated { auction_id, .. } if auction_id == id
        ));
    }

    #[test]
    fn creation_validation_order() {
        let mut f = Fixture::new();
        let seller = f.seller;
        let h = &mut f.house;

        let err = h
            .create_auction("", Amount(0), NOW, Amount(0), seller, NOW)
            .unwrap_err();
        assert_eq!(err, AuctionError::InvalidItemDetails);

        let err = h
            .create_auction("Item", Amount(0), NOW, Amount(0), seller, NOW)
            .unwrap_err();
        assert_eq!(err, AuctionError::InvalidMinimumBid);

        let err = h
            .create_auction("Item", Amount(10), NOW, Amount(5), seller, NOW)
            .unwrap_err();
        assert_eq!(
            err,
            AuctionError::InvalidAuctionDeadline {
                deadline: NOW,
                now: NOW
            }
        );

        let err = h
            .create_auction("Item", Amount(10), NOW + 1, Amount(10), seller, NOW)
            .unwrap_err();
        assert!(matches!(err, AuctionError::InvalidBuyNowPrice { .. }));

        assert_eq!(h.auction_count(), 0);
        assert!(h.events().is_empty());
    }

    #[test]
    fn unknown_auction_is_rejected() {
        let mut f = Fixture::new();
        let alice = f.alice;
        let err = f
            .house
            .place_bid(AuctionId(100), Amount(10), alice, NOW)
            .unwrap_err();
        assert_eq!(err, AuctionError::InvalidAuctionId(AuctionId(100)));
        assert!(f.house.get_auction_details(AuctionId(100)).is_err());
        assert!(f.house.buy_now(AuctionId(100), alice, NOW).is_err());
    }

    #[test]
    fn bid_must_meet_minimum_and_beat_leader() {
        let mut f = Fixture::new();
        let id = f.create(10, 0, NOW + 1_800);

        let err = f.house.place_bid(id, Amount(9), f.alice, NOW).unwrap_err();
        assert!(matches!(err, AuctionError::InvalidBidAmount { .. }));

        f.house.place_bid(id, Amount(12), f.alice, NOW).unwrap();
        let err = f.house.place_bid(id, Amount(12), f.bob, NOW).unwrap_err();
        assert_eq!(
            err,
            AuctionError::InvalidBidAmount {
                amount: Amount(12),
                min_bid: Amount(10),
                highest_bid: Amount(12),
            }
        );
    }

    #[test]
    fn top_up_transfers_only_difference() {
        let mut f = Fixture::new();
        let id = f.create(10, 20, NOW + 1_800);

        f.house.place_bid(id, Amount(12), f.alice, NOW).unwrap();
        f.house.place_bid(id, Amount(14), f.alice, NOW).unwrap();
        assert_eq!(f.balance(f.alice), Amount(1_000 - 14));
        assert_eq!(f.house.escrow_held(id), Amount(14));
        assert_eq!(f.house.bid_record(id, f.alice).unwrap().deposited, Amount(14));
        f.house.verify_escrow().unwrap();
    }

    #[test]
    fn failed_transfer_changes_nothing() {
        let mut f = Fixture::new();
        let id = f.create(10, 0, NOW + 1_800);
        let pauper = AccountId::new();

        let err = f.house.place_bid(id, Amount(12), pauper, NOW).unwrap_err();
        assert!(matches!(err, AuctionError::InsufficientAllowance { .. }));

        let auction = f.house.get_auction_details(id).unwrap();
        assert_eq!(auction.highest_bid, Amount::ZERO);
        assert!(auction.highest_bidder.is_none());
        assert!(f.house.bid_record(id, pauper).is_none());
        assert_eq!(f.house.events().len(), 1);
    }

    #[test]
    fn late_bid_extends_deadline() {
        let mut f = Fixture::new();
        let deadline = NOW + 1_800;
        let id = f.create(10, 0, deadline);

        f.house
            .place_bid(id, Amount(12), f.alice, deadline - 301)
            .unwrap();
        assert_eq!(f.house.get_auction_details(id).unwrap().deadline, deadline);

        f.house
            .place_bid(id, Amount(13), f.bob, deadline - 299)
            .unwrap();
        assert_eq!(
            f.house.get_auction_details(id).unwrap().deadline,
            deadline + 300
        );

        let kinds: Vec<_> = f
            .house
            .events()
            .records()
            .iter()
            .map(|r| r.event.kind())
            .collect();
        assert_eq!(
            kinds,
            [
                "AuctionCreated",
                "BidPlaced",
                "BidPlaced",
                "AuctionDeadlineExtended"
            ]
        );
    }

    #[test]
    fn extension_window_is_exclusive() {
        let mut f = Fixture::new();
        let deadline = NOW + 1_800;
        let id = f.create(10, 0, deadline);

        // Exactly 300s left is outside the window.
        f.house
            .place_bid(id, Amount(12), f.alice, deadline - 300)
            .unwrap();
        assert_eq!(f.house.get_auction_details(id).unwrap().deadline, deadline);
        assert_eq!(
            f.house.events().records().last().unwrap().event.kind(),
            "BidPlaced"
        );
    }

    #[test]
    fn rejected_late_bids_keep_deadline() {
        let mut f = Fixture::new();
        let deadline = NOW + 1_800;
        let id = f.create(10, 0, deadline);
        let late = deadline - 100;
        let escrow = f.house.config().escrow_account;
        f.house.place_bid(id, Amount(20), f.alice, NOW).unwrap();
        let events = f.house.events().len();

        let err = f.house.place_bid(id, Amount(20), f.bob, late).unwrap_err();
        assert!(matches!(err, AuctionError::InvalidBidAmount { .. }));
        let err = f.house.place_bid(id, Amount(5), f.bob, late).unwrap_err();
        assert!(matches!(err, AuctionError::InvalidBidAmount { .. }));

        let broke = AccountId::new();
        let err = f.house.place_bid(id, Amount(25), broke, late).unwrap_err();
        assert!(matches!(err, AuctionError::InsufficientAllowance { .. }));
        f.house.ledger_mut().approve(broke, escrow, Amount::MAX);
        let err = f.house.place_bid(id, Amount(25), broke, late).unwrap_err();
        assert!(matches!(err, AuctionError::InsufficientBalance { .. }));

        assert_eq!(f.house.get_auction_details(id).unwrap().deadline, deadline);
        assert_eq!(f.house.events().len(), events);

        f.house.place_bid(id, Amount(25), f.bob, late).unwrap();
        assert_eq!(
            f.house.get_auction_details(id).unwrap().deadline,
            deadline + 300
        );
    }

    #[test]
    fn bid_at_deadline_is_rejected() {
        let mut f = Fixture::new();
        let id = f.create(10, 0, NOW + 100);
        let err = f
            .house
            .place_bid(id, Amount(12), f.alice, NOW + 100)
            .unwrap_err();
        assert_eq!(
            err,
            AuctionError::AuctionDeadlineHasPassed {
                deadline: NOW + 100
            }
        );
    }

    #[test]
    fn bid_reaching_buy_now_closes_bidding() {
        let mut f = Fixture::new();
        let id = f.create(10, 200, NOW + 1_800);

        f.house.place_bid(id, Amount(200), f.bob, NOW).unwrap();
        let auction = f.house.get_auction_details(id).unwrap();
        assert_eq!(auction.phase, AuctionPhase::BuyNowLocked);
        assert_eq!(auction.status(), AuctionStatus::Active);
        assert_eq!(
            f.house.events().records().last().unwrap().event.kind(),
            "BuyNowCompleted"
        );

        let err = f.house.place_bid(id, Amount(260), f.alice, NOW).unwrap_err();
        assert_eq!(err, AuctionError::AuctionNoLongerActive);
        let err = f.house.buy_now(id, f.alice, NOW).unwrap_err();
        assert_eq!(err, AuctionError::AuctionNoLongerActive);
    }

    #[test]
    fn buy_now_requires_price() {
        let mut f = Fixture::new();
        let id = f.create(10, 0, NOW + 1_800);
        let err = f.house.buy_now(id, f.bob, NOW).unwrap_err();
        assert_eq!(err, AuctionError::BuyNowNotAvailable);
    }

    #[test]
    fn buy_now_releases_earlier_deposit() {
        let mut f = Fixture::new();
        let id = f.create(10, 100, NOW + 1_800);

        f.house.place_bid(id, Amount(40), f.alice, NOW).unwrap();
        f.house.buy_now(id, f.alice, NOW + 1_600).unwrap();

        let auction = f.house.get_auction_details(id).unwrap();
        assert_eq!(auction.highest_bid, Amount(100));
        assert_eq!(auction.deadline, NOW + 1_800);
        assert_eq!(f.balance(f.alice), Amount(900));
        assert_eq!(f.house.bid_record(id, f.alice).unwrap().deposited, Amount(100));
        f.house.verify_escrow().unwrap();
    }

    #[test]
    fn resolve_checks_in_order() {
        let mut f = Fixture::new();
        let id = f.create(10, 0, NOW + 100);

        let err = f.house.resolve_auction(id, f.alice, NOW).unwrap_err();
        assert_eq!(
            err,
            AuctionError::AuctionDeadlineNotReached { deadline: NOW + 100 }
        );
        let err = f.house.resolve_auction(id, f.alice, NOW + 100).unwrap_err();
        assert_eq!(err, AuctionError::NotTheSeller);

        f.house.resolve_auction(id, f.seller, NOW + 100).unwrap();
        let err = f.house.resolve_auction(id, f.alice, NOW).unwrap_err();
        assert_eq!(err, AuctionError::AuctionAlreadyResolved);
    }

    #[test]
    fn resolve_pays_seller_and_treasury() {
        let mut f = Fixture::new();
        let id = f.create(10, 0, NOW + 1_800);
        f.house.place_bid(id, Amount(199), f.alice, NOW).unwrap();

        f.house.resolve_auction(id, f.seller, NOW + 1_800).unwrap();
        assert_eq!(f.balance(f.seller), Amount(196));
        assert_eq!(f.balance(f.treasury), Amount(3));
        assert_eq!(f.house.escrow_held(id), Amount::ZERO);

        let auction = f.house.get_auction_details(id).unwrap();
        assert!(auction.custody_transferred());
        assert_eq!(auction.phase, AuctionPhase::Resolved(Resolution::Normal));
        f.house.verify_escrow().unwrap();
        f.house.verify_events().unwrap();
    }

    #[test]
    fn escrow_snapshot_requires_known_auction() {
        let mut f = Fixture::new();
        let id = f.create(10, 0, NOW + 100);
        f.house.place_bid(id, Amount(12), f.alice, NOW).unwrap();
        let snapshot = f.house.escrow_snapshot(id).unwrap();
        assert_eq!(snapshot.held, Amount(12));
        assert!(f.house.escrow_snapshot(AuctionId(9)).is_err());
    }

    #[test]
    fn new_rejects_invalid_config() {
        let f = Fixture::new();
        let mut config = f.house.config().clone();
        config.fee_percent = 150;
        let ledger = auctionhouse_ledger::TokenLedger::new(
            AccountId::new(),
            auctionhouse_types::LedgerConfig::default(),
        );
        assert!(matches!(
            AuctionHouse::new(config, ledger),
            Err(AuctionError::Configuration(_))
        ));
    }
}
