//! Thread-safe front end over the registry.
//!
//! One exclusive lock covers each whole request, so requests are
//! linearizable: every operation observes the effects of all earlier ones.
//! Request time is read from the [`Clock`] under the lock. Events a request
//! emits are published to subscribers before the lock is released, in log
//! order.

use std::sync::Arc;

use auctionhouse_ledger::ValueLedger;
use auctionhouse_types::{
    AccountId, Amount, Auction, AuctionId, EventRecord, Result, constants,
};
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::{AuctionHouse, Clock};

/// Shared handle to one auction registry.
pub struct AuctionHouseService<L> {
    house: Mutex<AuctionHouse<L>>,
    clock: Arc<dyn Clock>,
    notifications: broadcast::Sender<EventRecord>,
}

impl<L: ValueLedger> AuctionHouseService<L> {
    #[must_use]
    pub fn new(house: AuctionHouse<L>, clock: Arc<dyn Clock>) -> Self {
        let (notifications, _) = broadcast::channel(constants::EVENT_CHANNEL_CAPACITY);
        Self {
            house: Mutex::new(house),
            clock,
            notifications,
        }
    }

    /// Receive every event committed after this call.
    ///
    /// A receiver that falls more than the channel capacity behind gets
    /// `RecvError::Lagged`; the full history stays in the registry's log.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.notifications.subscribe()
    }

    #[must_use]
    pub fn now(&self) -> u64 {
        self.clock.now_unix()
    }

    /// # Errors
    /// See [`AuctionHouse::create_auction`].
    pub fn create_auction(
        &self,
        seller: AccountId,
        item_label: &str,
        min_bid: Amount,
        deadline: u64,
        buy_now_price: Amount,
    ) -> Result<AuctionId> {
        self.execute("create_auction", |house, now| {
            house.create_auction(item_label, min_bid, deadline, buy_now_price, seller, now)
        })
    }

    /// # Errors
    /// See [`AuctionHouse::place_bid`].
    pub fn place_bid(&self, auction_id: AuctionId, amount: Amount, bidder: AccountId) -> Result<()> {
        self.execute("place_bid", |house, now| {
            house.place_bid(auction_id, amount, bidder, now)
        })
    }

    /// # Errors
    /// See [`AuctionHouse::buy_now`].
    pub fn buy_now(&self, auction_id: AuctionId, bidder: AccountId) -> Result<()> {
        self.execute("buy_now", |house, now| house.buy_now(auction_id, bidder, now))
    }

    /// # Errors
    /// See [`AuctionHouse::resolve_auction`].
    pub fn resolve_auction(&self, auction_id: AuctionId, caller: AccountId) -> Result<()> {
        self.execute("resolve_auction", |house, now| {
            house.resolve_auction(auction_id, caller, now)
        })
    }

    /// # Errors
    /// See [`AuctionHouse::raise_dispute`].
    pub fn raise_dispute(&self, auction_id: AuctionId, caller: AccountId) -> Result<()> {
        self.execute("raise_dispute", |house, now| {
            house.raise_dispute(auction_id, caller, now)
        })
    }

    /// # Errors
    /// See [`AuctionHouse::resolve_dispute`].
    pub fn resolve_dispute(
        &self,
        auction_id: AuctionId,
        favor_seller: bool,
        caller: AccountId,
    ) -> Result<()> {
        self.execute("resolve_dispute", |house, now| {
            house.resolve_dispute(auction_id, favor_seller, caller, now)
        })
    }

    /// # Errors
    /// See [`AuctionHouse::refund`].
    pub fn refund(&self, auction_id: AuctionId, caller: AccountId) -> Result<Amount> {
        self.execute("refund", |house, now| house.refund(auction_id, caller, now))
    }

    /// # Errors
    /// Returns `InvalidAuctionId` for an unknown id.
    pub fn get_auction_details(&self, auction_id: AuctionId) -> Result<Auction> {
        self.house.lock().get_auction_details(auction_id)
    }

    /// Run `f` against the ledger under the registry lock.
    pub fn with_ledger<T>(&self, f: impl FnOnce(&mut L) -> T) -> T {
        f(self.house.lock().ledger_mut())
    }

    /// Run a read-only closure against the registry under its lock.
    pub fn inspect<T>(&self, f: impl FnOnce(&AuctionHouse<L>) -> T) -> T {
        f(&*self.house.lock())
    }

    /// # Errors
    /// See [`AuctionHouse::verify_escrow`].
    pub fn verify_escrow(&self) -> Result<()> {
        self.house.lock().verify_escrow()
    }

    fn execute<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut AuctionHouse<L>, u64) -> Result<T>,
    ) -> Result<T> {
        let mut house = self.house.lock();
        let now = self.clock.now_unix();
        let result = f(&mut *house, now);
        for record in house.take_unpublished() {
            // Having no subscribers is not an error.
            let _ = self.notifications.send(record);
        }
        if let Err(err) = &result {
            tracing::debug!(op, now, code = %err.code(), error = %err, "Request rejected");
        }
        result
    }
}
