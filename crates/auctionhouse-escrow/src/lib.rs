//! # auctionhouse-escrow
//!
//! **Escrow Ledger**: the bookkeeping side of auction settlement.
//!
//! The registry moves value through the value ledger; this crate records
//! *whose* value it is:
//! 1. **BidRecord** per (auction, bidder): amount escrowed, refund claimed
//! 2. **Held escrow** per auction: what the house still owes out
//! 3. **Conservation**: held escrow across all auctions must equal the
//!    escrow account's ledger balance
//!
//! ## Plan / Apply
//!
//! Every mutation is split in two. `plan_*` validates and computes the
//! transfers without touching state; the caller performs the ledger
//! transfers; `apply_*` then commits the plan and cannot fail. A rejected
//! plan or a failed transfer therefore leaves the book unchanged.

pub mod escrow;

pub use escrow::{DepositPlan, EscrowBook, EscrowSnapshot, RefundPlan, ReleasePlan};
