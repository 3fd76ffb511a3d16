//! # auctionhouse-ledger
//!
//! **Value Ledger**: the fungible balance service the auction core moves
//! funds through.
//!
//! ## Architecture
//!
//! 1. **ValueLedger**: the trait the engine consumes: balance lookup,
//!    allowance-checked transfers into escrow, transfers out of escrow,
//!    and all-or-nothing batches of [`Transfer`] legs
//! 2. **TokenLedger**: in-memory payment token (mint / approve / transfer)
//!    implementing `ValueLedger`
//! 3. **SupplyConservation**: checks that balances always sum to minted supply
//!
//! ## Transfer Flow
//!
//! ```text
//! bidder.approve(escrow) → transfer_into(escrow, bidder) → [escrow holds funds]
//!     → transfer_out(escrow, seller | treasury | bidder)
//! ```
//!
//! Every transfer is all-or-nothing: a failed transfer leaves every
//! balance and allowance unchanged. A batch extends that to several legs,
//! so a settlement paying both seller and treasury cannot stop halfway.

pub mod ledger;
pub mod supply_conservation;
pub mod token;

pub use ledger::{Transfer, ValueLedger};
pub use supply_conservation::SupplyConservation;
pub use token::TokenLedger;
