//! Lifecycle notifications and their hash-chained audit log.
//!
//! Every state change of the registry emits one or more [`AuctionEvent`]s.
//! The registry appends them to an [`EventLog`], which wraps each event in
//! an [`EventRecord`] carrying a SHA-256 digest chained over the previous
//! record, so the notification history is tamper-evident.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AccountId, Amount, AuctionError, AuctionId, Result, constants};

/// A lifecycle notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuctionEvent {
    AuctionCreated {
        seller: AccountId,
        item_label: String,
        auction_id: AuctionId,
        min_bid: Amount,
        deadline: u64,
        buy_now_price: Amount,
    },
    BidPlaced {
        auction_id: AuctionId,
        amount: Amount,
        bidder: AccountId,
    },
    BuyNowCompleted {
        auction_id: AuctionId,
        amount: Amount,
        bidder: AccountId,
    },
    AuctionDeadlineExtended {
        auction_id: AuctionId,
        new_deadline: u64,
    },
    /// `amount` is zero and `winner` is `None` for an auction without bids.
    AuctionResolved {
        auction_id: AuctionId,
        amount: Amount,
        winner: Option<AccountId>,
    },
    DisputeRaised {
        auction_id: AuctionId,
        bidder: AccountId,
    },
    DisputeResolved {
        auction_id: AuctionId,
        favor_seller: bool,
        seller: AccountId,
        bidder: AccountId,
    },
    RefundProcessed {
        auction_id: AuctionId,
        amount: Amount,
        bidder: AccountId,
    },
}

impl AuctionEvent {
    /// The auction this event belongs to.
    #[must_use]
    pub fn auction_id(&self) -> AuctionId {
        match self {
            Self::AuctionCreated { auction_id, .. }
            | Self::BidPlaced { auction_id, .. }
            | Self::BuyNowCompleted { auction_id, .. }
            | Self::AuctionDeadlineExtended { auction_id, .. }
            | Self::AuctionResolved { auction_id, .. }
            | Self::DisputeRaised { auction_id, .. }
            | Self::DisputeResolved { auction_id, .. }
            | Self::RefundProcessed { auction_id, .. } => *auction_id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuctionCreated { .. } => "AuctionCreated",
            Self::BidPlaced { .. } => "BidPlaced",
            Self::BuyNowCompleted { .. } => "BuyNowCompleted",
            Self::AuctionDeadlineExtended { .. } => "AuctionDeadlineExtended",
            Self::AuctionResolved { .. } => "AuctionResolved",
            Self::DisputeRaised { .. } => "DisputeRaised",
            Self::DisputeResolved { .. } => "DisputeResolved",
            Self::RefundProcessed { .. } => "RefundProcessed",
        }
    }

    /// Feed a canonical encoding of this event into `hasher`.
    ///
    /// `kind || auction_id || fields...` with fixed-width little-endian
    /// integers and length-prefixed strings.
    fn hash_into(&self, hasher: &mut Sha256) {
        hasher.update(self.kind().as_bytes());
        hasher.update(self.auction_id().get().to_le_bytes());
        match self {
            Self::AuctionCreated {
                seller,
                item_label,
                min_bid,
                deadline,
                buy_now_price,
                ..
            } => {
                hasher.update(seller.as_bytes());
                hasher.update((item_label.len() as u64).to_le_bytes());
                hasher.update(item_label.as_bytes());
                hasher.update(min_bid.get().to_le_bytes());
                hasher.update(deadline.to_le_bytes());
                hasher.update(buy_now_price.get().to_le_bytes());
            }
            Self::BidPlaced { amount, bidder, .. }
            | Self::BuyNowCompleted { amount, bidder, .. }
            | Self::RefundProcessed { amount, bidder, .. } => {
                hasher.update(amount.get().to_le_bytes());
                hasher.update(bidder.as_bytes());
            }
            Self::AuctionDeadlineExtended { new_deadline, .. } => {
                hasher.update(new_deadline.to_le_bytes());
            }
            Self::AuctionResolved { amount, winner, .. } => {
                hasher.update(amount.get().to_le_bytes());
                match winner {
                    Some(w) => {
                        hasher.update([1u8]);
                        hasher.update(w.as_bytes());
                    }
                    None => hasher.update([0u8]),
                }
            }
            Self::DisputeRaised { bidder, .. } => {
                hasher.update(bidder.as_bytes());
            }
            Self::DisputeResolved {
                favor_seller,
                seller,
                bidder,
                ..
            } => {
                hasher.update([u8::from(*favor_seller)]);
                hasher.update(seller.as_bytes());
                hasher.update(bidder.as_bytes());
            }
        }
    }
}

impl fmt::Display for AuctionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.auction_id())
    }
}

/// An event as recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, starting at 0.
    pub sequence: u64,
    /// Request time (unix seconds) of the operation that emitted the event.
    pub emitted_at: u64,
    pub event: AuctionEvent,
    /// `SHA-256(domain || prev_digest || sequence || emitted_at || event)`.
    pub digest: [u8; 32],
}

impl EventRecord {
    fn compute_digest(
        prev: &[u8; 32],
        sequence: u64,
        emitted_at: u64,
        event: &AuctionEvent,
    ) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(constants::EVENT_CHAIN_DOMAIN);
        hasher.update(prev);
        hasher.update(sequence.to_le_bytes());
        hasher.update(emitted_at.to_le_bytes());
        event.hash_into(&mut hasher);
        hasher.finalize().into()
    }

    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

/// Append-only, hash-chained log of emitted events.
///
/// Records not yet handed to subscribers are tracked by a cursor so the
/// service layer can publish exactly the events of each request.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
    published: usize,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and return its record.
    pub fn append(&mut self, event: AuctionEvent, emitted_at: u64) -> &EventRecord {
        let sequence = self.records.len() as u64;
        let digest =
            EventRecord::compute_digest(&self.head_digest(), sequence, emitted_at, &event);
        self.records.push(EventRecord {
            sequence,
            emitted_at,
            event,
            digest,
        });
        &self.records[self.records.len() - 1]
    }

    /// Digest of the latest record, all zeroes for an empty log.
    #[must_use]
    pub fn head_digest(&self) -> [u8; 32] {
        self.records.last().map_or([0u8; 32], |r| r.digest)
    }

    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Events belonging to one auction, in emission order.
    pub fn for_auction(&self, auction_id: AuctionId) -> impl Iterator<Item = &EventRecord> {
        self.records
            .iter()
            .filter(move |r| r.event.auction_id() == auction_id)
    }

    /// Records appended since the previous call.
    pub fn take_unpublished(&mut self) -> Vec<EventRecord> {
        let fresh = self.records[self.published..].to_vec();
        self.published = self.records.len();
        fresh
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recompute every digest from the start of the log.
    ///
    /// # Errors
    /// Returns [`AuctionError::EventChainBroken`] at the first record whose
    /// sequence or digest does not match.
    pub fn verify_chain(&self) -> Result<()> {
        let mut prev = [0u8; 32];
        for (idx, record) in self.records.iter().enumerate() {
            let expected =
                EventRecord::compute_digest(&prev, idx as u64, record.emitted_at, &record.event);
            if record.sequence != idx as u64 || record.digest != expected {
                return Err(AuctionError::EventChainBroken {
                    sequence: idx as u64,
                });
            }
            prev = record.digest;
        }
        Ok(())
    }
}
