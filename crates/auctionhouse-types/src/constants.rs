//! System-wide constants for the AuctionHouse settlement engine.

/// A bid landing with less than this many seconds left extends the deadline.
pub const DEFAULT_EXTENSION_WINDOW_SECS: u64 = 300;

/// Seconds added to the stored deadline by each qualifying late bid.
pub const DEFAULT_EXTENSION_SECS: u64 = 300;

/// Platform fee taken from the winning bid, in whole percent (floored).
pub const DEFAULT_FEE_PERCENT: u32 = 2;

/// Decimal places of the payment token.
pub const DEFAULT_TOKEN_DECIMALS: u32 = 18;

/// Default payment token name.
pub const DEFAULT_TOKEN_NAME: &str = "AuctionHouseToken";

/// Default payment token symbol.
pub const DEFAULT_TOKEN_SYMBOL: &str = "AHT";

/// Capacity of the notification broadcast channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Domain separator for the notification hash chain.
pub const EVENT_CHAIN_DOMAIN: &[u8] = b"auctionhouse:event:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "AuctionHouse";
