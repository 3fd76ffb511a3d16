//! Shared setup for the engine's unit tests.

use auctionhouse_ledger::{TokenLedger, ValueLedger};
use auctionhouse_types::{AccountId, Amount, AuctionId, HouseConfig, LedgerConfig};

use crate::AuctionHouse;

pub const NOW: u64 = 1_700_000_000;

/// A registry over a fresh token, with two funded bidders who granted the
/// house an unlimited allowance.
pub struct Fixture {
    pub house: AuctionHouse<TokenLedger>,
    pub seller: AccountId,
    pub alice: AccountId,
    pub bob: AccountId,
    pub arbitrator: AccountId,
    pub treasury: AccountId,
}

impl Fixture {
    pub fn new() -> Self {
        let owner = AccountId::new();
        let escrow = AccountId::new();
        let arbitrator = AccountId::new();
        let treasury = AccountId::new();
        let alice = AccountId::new();
        let bob = AccountId::new();

        let mut ledger = TokenLedger::new(owner, LedgerConfig::default());
        for bidder in [alice, bob] {
            ledger.mint(owner, bidder, Amount(1_000)).unwrap();
            ledger.approve(bidder, escrow, Amount::MAX);
        }
        let house =
            AuctionHouse::new(HouseConfig::new(escrow, arbitrator, treasury), ledger).unwrap();

        Self {
            house,
            seller: AccountId::new(),
            alice,
            bob,
            arbitrator,
            treasury,
        }
    }

    pub fn create(&mut self, min_bid: u128, buy_now_price: u128, deadline: u64) -> AuctionId {
        self.house
            .create_auction(
                "Item 1",
                Amount(min_bid),
                deadline,
                Amount(buy_now_price),
                self.seller,
                NOW,
            )
            .unwrap()
    }

    pub fn balance(&self, account: AccountId) -> Amount {
        self.house.ledger().balance_of(account)
    }
}
