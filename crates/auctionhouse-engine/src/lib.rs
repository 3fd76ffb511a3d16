//! # auctionhouse-engine
//!
//! **Lifecycle Controller**: the auction registry and everything that
//! moves an auction from listing to settlement.
//!
//! ## Architecture
//!
//! [`AuctionHouse`] is a plain `&mut self` state machine over a
//! [`ValueLedger`](auctionhouse_ledger::ValueLedger):
//! 1. Validates the request against the auction's phase, deadline and caller
//! 2. Plans the escrow movement without mutating anything
//! 3. Performs one ledger call: a single transfer, or an all-or-nothing
//!    batch when funds move to or from several accounts
//! 4. Commits auction and escrow state, appends events to the hash-chained log
//!
//! A request that fails at any step leaves the registry unchanged.
//!
//! [`AuctionHouseService`] wraps the registry behind one global lock, reads
//! request time from a [`Clock`], and publishes every committed event on a
//! broadcast channel.

pub mod clock;
pub mod dispute;
pub mod refund;
pub mod registry;
pub mod service;
pub mod settlement;
pub mod telemetry;

#[cfg(test)]
mod fixture;

pub use clock::{Clock, ManualClock, SystemClock};
pub use registry::AuctionHouse;
pub use service::AuctionHouseService;
pub use settlement::Payout;
