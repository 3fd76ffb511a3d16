//! Auction model and its lifecycle phase.
//!
//! ## State Machine
//!
//! ```text
//!   ┌──────┐ bid >= buy-now / buyNow ┌──────────────┐
//!   │ OPEN ├────────────────────────▶│ BUY_NOW_LOCK │
//!   └─┬──┬─┘                         └───┬───────┬──┘
//!     │  │ raiseDispute                  │       │ resolveAuction
//!     │  └──────────────┐   raiseDispute │       │
//!     │                 ▼                ▼       │
//!     │              ┌──────────────────────┐    │
//!     │              │       DISPUTED       │    │
//!     │              └──────────┬───────────┘    │
//!     │ resolveAuction          │ resolveDispute │
//!     ▼                         ▼                ▼
//!   ┌──────────────────────────────────────────────┐
//!   │ RESOLVED (Normal | Dispute { favor_seller }) │
//!   └──────────────────────────────────────────────┘
//! ```
//!
//! The externally observed `status` / `dispute_status` pair is a projection
//! of [`AuctionPhase`], so invalid combinations cannot be represented.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, AuctionId};

/// How a resolved auction was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    /// Seller-initiated settlement after the deadline.
    Normal,
    /// Arbitrated settlement of a raised dispute.
    Dispute { favor_seller: bool },
}

/// Lifecycle phase of an auction.
///
/// Transitions are **monotonic**: once `Resolved`, the auction never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionPhase {
    /// Accepting bids until the deadline.
    Open,
    /// A buy-now bid won; bidding is closed, settlement still pending.
    BuyNowLocked,
    /// The highest bidder raised a dispute; awaiting the arbitrator.
    Disputed,
    /// Settled. Terminal.
    Resolved(Resolution),
}

impl fmt::Display for AuctionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::BuyNowLocked => write!(f, "BUY_NOW_LOCKED"),
            Self::Disputed => write!(f, "DISPUTED"),
            Self::Resolved(Resolution::Normal) => write!(f, "RESOLVED"),
            Self::Resolved(Resolution::Dispute { favor_seller }) => {
                write!(f, "RESOLVED_BY_DISPUTE(favor_seller={favor_seller})")
            }
        }
    }
}

/// Observable auction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum AuctionStatus {
    Active,
    Disputed,
    Resolved,
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Disputed => write!(f, "DISPUTED"),
            Self::Resolved => write!(f, "RESOLVED"),
        }
    }
}

/// Observable dispute status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum DisputeStatus {
    None,
    Raised,
    Resolved,
}

impl fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::Raised => write!(f, "RAISED"),
            Self::Resolved => write!(f, "RESOLVED"),
        }
    }
}

impl AuctionPhase {
    #[must_use]
    pub fn status(self) -> AuctionStatus {
        match self {
            Self::Open | Self::BuyNowLocked => AuctionStatus::Active,
            Self::Disputed => AuctionStatus::Disputed,
            Self::Resolved(_) => AuctionStatus::Resolved,
        }
    }

    #[must_use]
    pub fn dispute_status(self) -> DisputeStatus {
        match self {
            Self::Open | Self::BuyNowLocked | Self::Resolved(Resolution::Normal) => {
                DisputeStatus::None
            }
            Self::Disputed => DisputeStatus::Raised,
            Self::Resolved(Resolution::Dispute { .. }) => DisputeStatus::Resolved,
        }
    }
}

/// A single auction as stored by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub id: AuctionId,
    pub seller: AccountId,
    /// Emptied when custody of the item passes to the winner.
    pub item_label: String,
    pub min_bid: Amount,
    /// Zero disables buy-now.
    pub buy_now_price: Amount,
    /// Unix seconds. Only ever pushed later by the extension rule.
    pub deadline: u64,
    pub highest_bid: Amount,
    pub highest_bidder: Option<AccountId>,
    pub phase: AuctionPhase,
    pub created_at: u64,
}

impl Auction {
    /// A freshly listed auction with no bids.
    #[must_use]
    pub fn new(
        id: AuctionId,
        seller: AccountId,
        item_label: impl Into<String>,
        min_bid: Amount,
        deadline: u64,
        buy_now_price: Amount,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            seller,
            item_label: item_label.into(),
            min_bid,
            buy_now_price,
            deadline,
            highest_bid: Amount::ZERO,
            highest_bidder: None,
            phase: AuctionPhase::Open,
            created_at,
        }
    }

    #[must_use]
    pub fn status(&self) -> AuctionStatus {
        self.phase.status()
    }

    #[must_use]
    pub fn dispute_status(&self) -> DisputeStatus {
        self.phase.dispute_status()
    }

    /// Bids and buy-now are accepted only in the `Open` phase.
    #[must_use]
    pub fn is_bidding_open(&self) -> bool {
        self.phase == AuctionPhase::Open
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self.phase, AuctionPhase::Resolved(_))
    }

    #[must_use]
    pub fn has_buy_now(&self) -> bool {
        !self.buy_now_price.is_zero()
    }

    /// Whether `amount` meets the buy-now price.
    #[must_use]
    pub fn reaches_buy_now(&self, amount: Amount) -> bool {
        self.has_buy_now() && amount >= self.buy_now_price
    }

    #[must_use]
    pub fn has_passed(&self, now: u64) -> bool {
        now >= self.deadline
    }

    /// Seconds left before the deadline, zero once passed.
    #[must_use]
    pub fn remaining_secs(&self, now: u64) -> u64 {
        self.deadline.saturating_sub(now)
    }

    #[must_use]
    pub fn is_leader(&self, account: AccountId) -> bool {
        self.highest_bidder == Some(account)
    }

    /// Whether the item has been handed to a winner.
    #[must_use]
    pub fn custody_transferred(&self) -> bool {
        self.item_label.is_empty()
    }

    /// Mark custody as transferred to the winner.
    pub fn transfer_custody(&mut self) {
        self.item_label.clear();
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Auction {
    pub fn dummy(min_bid: u128, buy_now_price: u128, deadline: u64) -> Self {
        Self::new(
            AuctionId::FIRST,
            AccountId::new(),
            "Item 1",
            Amount(min_bid),
            deadline,
            Amount(buy_now_price),
            0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_projections() {
        let cases = [
            (AuctionPhase::Open, AuctionStatus::Active, DisputeStatus::None),
            (AuctionPhase::BuyNowLocked, AuctionStatus::Active, DisputeStatus::None),
            (AuctionPhase::Disputed, AuctionStatus::Disputed, DisputeStatus::Raised),
            (
                AuctionPhase::Resolved(Resolution::Normal),
                AuctionStatus::Resolved,
                DisputeStatus::None,
            ),
            (
                AuctionPhase::Resolved(Resolution::Dispute { favor_seller: false }),
                AuctionStatus::Resolved,
                DisputeStatus::Resolved,
            ),
        ];
        for (phase, status, dispute) in cases {
            assert_eq!(phase.status(), status, "{phase}");
            assert_eq!(phase.dispute_status(), dispute, "{phase}");
        }
    }

    #[test]
    fn new_auction_is_open_without_leader() {
        let auction = Auction::dummy(10, 20, 1_800);
        assert!(auction.is_bidding_open());
        assert_eq!(auction.highest_bid, Amount::ZERO);
        assert!(auction.highest_bidder.is_none());
        assert_eq!(auction.status(), AuctionStatus::Active);
        assert_eq!(auction.dispute_status(), DisputeStatus::None);
        assert!(!auction.custody_transferred());
    }

    #[test]
    fn buy_now_threshold() {
        let auction = Auction::dummy(10, 20, 1_800);
        assert!(!auction.reaches_buy_now(Amount(19)));
        assert!(auction.reaches_buy_now(Amount(20)));
        assert!(auction.reaches_buy_now(Amount(25)));

        let no_buy_now = Auction::dummy(10, 0, 1_800);
        assert!(!no_buy_now.reaches_buy_now(Amount(1_000)));
    }

    #[test]
    fn deadline_helpers() {
        let auction = Auction::dummy(10, 0, 1_000);
        assert!(!auction.has_passed(999));
        assert!(auction.has_passed(1_000));
        assert_eq!(auction.remaining_secs(800), 200);
        assert_eq!(auction.remaining_secs(2_000), 0);
    }

    #[test]
    fn custody_transfer_clears_label() {
        let mut auction = Auction::dummy(10, 0, 1_000);
        auction.transfer_custody();
        assert!(auction.custody_transferred());
        assert_eq!(auction.item_label, "");
    }

    #[test]
    fn status_display() {
        assert_eq!(AuctionStatus::Disputed.to_string(), "DISPUTED");
        assert_eq!(DisputeStatus::Raised.to_string(), "RAISED");
        assert_eq!(AuctionPhase::BuyNowLocked.to_string(), "BUY_NOW_LOCKED");
    }
}
