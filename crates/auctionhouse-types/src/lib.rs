//! # auctionhouse-types
//!
//! Shared types, errors, and configuration for the **AuctionHouse**
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AuctionId`], [`AccountId`]
//! - **Amounts**: [`Amount`] (token base units, checked arithmetic)
//! - **Auction model**: [`Auction`], [`AuctionPhase`], [`Resolution`], [`AuctionStatus`], [`DisputeStatus`]
//! - **Escrow model**: [`BidRecord`]
//! - **Notifications**: [`AuctionEvent`], [`EventRecord`], [`EventLog`]
//! - **Configuration**: [`HouseConfig`], [`LedgerConfig`]
//! - **Errors**: [`AuctionError`] with `AH_ERR_` prefix codes
//! - **Constants**: extension window, fee rate, token decimals

pub mod amount;
pub mod auction;
pub mod bid;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;

// Re-export all primary types at crate root for ergonomic imports:
//   use auctionhouse_types::{Auction, AuctionId, Amount, ...};

pub use amount::*;
pub use auction::*;
pub use bid::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;

// Constants are accessed via `auctionhouse_types::constants::FOO`
// (not re-exported to avoid name collisions).
