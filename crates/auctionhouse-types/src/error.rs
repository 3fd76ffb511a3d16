//! Error types for the AuctionHouse settlement engine.
//!
//! All errors use the `AH_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Creation validation errors
//! - 2xx: Lookup errors
//! - 3xx: Timing errors
//! - 4xx: Authorization errors
//! - 5xx: State conflict errors
//! - 6xx: Bid / refund errors
//! - 7xx: Value ledger errors
//! - 8xx: Invariant violations
//! - 9xx: General / internal errors
//!
//! Every rejection is scoped to the one request that produced it; the
//! registry state is unchanged and the request may be retried once the
//! condition is corrected.

use thiserror::Error;

use crate::{AccountId, Amount, AuctionId};

/// Central error enum for all AuctionHouse operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    // =================================================================
    // Creation Validation Errors (1xx)
    // =================================================================
    /// The item label is empty.
    #[error("AH_ERR_100: Invalid item details: label must not be empty")]
    InvalidItemDetails,

    /// The minimum bid is zero.
    #[error("AH_ERR_101: Invalid minimum bid: must be positive")]
    InvalidMinimumBid,

    /// The deadline is not in the future.
    #[error("AH_ERR_102: Invalid auction deadline {deadline}: must be after {now}")]
    InvalidAuctionDeadline { deadline: u64, now: u64 },

    /// A nonzero buy-now price does not exceed the minimum bid.
    #[error("AH_ERR_103: Invalid buy-now price {buy_now_price}: must exceed minimum bid {min_bid}")]
    InvalidBuyNowPrice { buy_now_price: Amount, min_bid: Amount },

    // =================================================================
    // Lookup Errors (2xx)
    // =================================================================
    /// No auction exists with this id.
    #[error("AH_ERR_200: Invalid auction id: {0}")]
    InvalidAuctionId(AuctionId),

    // =================================================================
    // Timing Errors (3xx)
    // =================================================================
    /// Bidding was attempted at or after the deadline.
    #[error("AH_ERR_300: Auction deadline has passed ({deadline})")]
    AuctionDeadlineHasPassed { deadline: u64 },

    /// Settlement or a dispute was attempted before the deadline.
    #[error("AH_ERR_301: Auction deadline not reached ({deadline})")]
    AuctionDeadlineNotReached { deadline: u64 },

    // =================================================================
    // Authorization Errors (4xx)
    // =================================================================
    /// Only the seller may resolve the auction.
    #[error("AH_ERR_400: Caller is not the seller")]
    NotTheSeller,

    /// Only the current highest bidder may raise a dispute.
    #[error("AH_ERR_401: Caller is not the highest bidder")]
    NotTheHighestBidder,

    /// Only the configured arbitrator may resolve a dispute.
    #[error("AH_ERR_402: Caller is not the arbitrator")]
    NotTheArbitrator,

    /// Only the token owner may mint.
    #[error("AH_ERR_403: Caller is not the token owner")]
    NotTheTokenOwner,

    // =================================================================
    // State Conflict Errors (5xx)
    // =================================================================
    /// Bidding is closed (buy-now completed, disputed, or resolved).
    #[error("AH_ERR_500: Auction is no longer active")]
    AuctionNoLongerActive,

    /// The auction has already been settled.
    #[error("AH_ERR_501: Auction already resolved")]
    AuctionAlreadyResolved,

    /// A dispute was already raised for this auction.
    #[error("AH_ERR_502: Dispute already raised")]
    DisputeAlreadyRaised,

    /// No open dispute exists for this auction.
    #[error("AH_ERR_503: No dispute raised")]
    NoDisputeRaised,

    /// Ordinary settlement is blocked until the arbitrator rules.
    #[error("AH_ERR_504: Auction is under dispute")]
    AuctionUnderDispute,

    // =================================================================
    // Bid / Refund Errors (6xx)
    // =================================================================
    /// The bid is below the minimum or does not beat the current leader.
    #[error("AH_ERR_600: Invalid bid amount {amount}: must be at least {min_bid} and above {highest_bid}")]
    InvalidBidAmount {
        amount: Amount,
        min_bid: Amount,
        highest_bid: Amount,
    },

    /// The auction was created without a buy-now price.
    #[error("AH_ERR_601: Buy now not available")]
    BuyNowNotAvailable,

    /// The caller has nothing to claim on this auction.
    #[error("AH_ERR_602: No bid or funds claimed already")]
    NoBidOrFundsClaimedAlready,

    /// The current leader's deposit backs the winning bid.
    #[error("AH_ERR_603: Auction winner cannot claim funds")]
    AuctionWinnerCannotClaimFunds,

    /// A bidder who withdrew their deposit cannot re-enter the same auction.
    #[error("AH_ERR_604: Refunded bidder cannot bid again on {0}")]
    RefundedBidderCannotRebid(AuctionId),

    // =================================================================
    // Value Ledger Errors (7xx)
    // =================================================================
    /// The payer's balance does not cover the transfer.
    #[error("AH_ERR_700: Insufficient balance for {account}: have {balance}, need {needed}")]
    InsufficientBalance {
        account: AccountId,
        balance: Amount,
        needed: Amount,
    },

    /// The spender's allowance does not cover the transfer.
    #[error("AH_ERR_701: Insufficient allowance for spender {spender}: allowed {allowance}, need {needed}")]
    InsufficientAllowance {
        spender: AccountId,
        allowance: Amount,
        needed: Amount,
    },

    /// An amount calculation overflowed.
    #[error("AH_ERR_702: Amount overflow")]
    AmountOverflow,

    /// An amount calculation went below zero.
    #[error("AH_ERR_703: Amount underflow")]
    AmountUnderflow,

    /// A token value could not be converted to base units.
    #[error("AH_ERR_704: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    // =================================================================
    // Invariant Violations (8xx)
    // =================================================================
    /// Token supply no longer equals the sum of balances.
    #[error("AH_ERR_800: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    /// Escrow account balance no longer equals the held escrow.
    #[error("AH_ERR_801: Escrow invariant violation: {reason}")]
    EscrowInvariantViolation { reason: String },

    /// The notification hash chain does not verify.
    #[error("AH_ERR_802: Event chain broken at sequence {sequence}")]
    EventChainBroken { sequence: u64 },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("AH_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("AH_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("AH_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl AuctionError {
    /// The `AH_ERR_` code of this error, e.g. `"AH_ERR_200"`.
    #[must_use]
    pub fn code(&self) -> String {
        let msg = self.to_string();
        msg.split(':').next().unwrap_or_default().to_string()
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, AuctionError>;

impl From<serde_json::Error> for AuctionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
