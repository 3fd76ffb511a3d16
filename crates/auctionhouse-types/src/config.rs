//! Configuration types for an AuctionHouse registry and its payment token.

use serde::{Deserialize, Serialize};

use crate::{AccountId, AuctionError, Result, constants};

/// Fixed parameters of one registry, set at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseConfig {
    /// The house's own ledger account; all escrow is held here.
    pub escrow_account: AccountId,
    /// The only identity allowed to resolve disputes.
    pub arbitrator: AccountId,
    /// Receives the platform fee on every disbursing settlement.
    pub treasury: AccountId,
    /// A bid with fewer seconds than this left triggers an extension.
    #[serde(default = "default_extension_window_secs")]
    pub extension_window_secs: u64,
    /// Seconds added to the deadline per qualifying late bid.
    #[serde(default = "default_extension_secs")]
    pub extension_secs: u64,
    /// Platform fee in whole percent, floored.
    #[serde(default = "default_fee_percent")]
    pub fee_percent: u32,
}

fn default_extension_window_secs() -> u64 {
    constants::DEFAULT_EXTENSION_WINDOW_SECS
}

fn default_extension_secs() -> u64 {
    constants::DEFAULT_EXTENSION_SECS
}

fn default_fee_percent() -> u32 {
    constants::DEFAULT_FEE_PERCENT
}

impl HouseConfig {
    /// Config with the default extension and fee parameters.
    #[must_use]
    pub fn new(escrow_account: AccountId, arbitrator: AccountId, treasury: AccountId) -> Self {
        Self {
            escrow_account,
            arbitrator,
            treasury,
            extension_window_secs: constants::DEFAULT_EXTENSION_WINDOW_SECS,
            extension_secs: constants::DEFAULT_EXTENSION_SECS,
            fee_percent: constants::DEFAULT_FEE_PERCENT,
        }
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    /// `Serialization` for malformed JSON, `Configuration` for invalid values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `Configuration` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.fee_percent > 100 {
            return Err(AuctionError::Configuration(format!(
                "fee_percent {} exceeds 100",
                self.fee_percent
            )));
        }
        if self.extension_window_secs == 0 || self.extension_secs == 0 {
            return Err(AuctionError::Configuration(
                "extension window and extension length must be positive".into(),
            ));
        }
        if self.escrow_account == self.arbitrator || self.escrow_account == self.treasury {
            return Err(AuctionError::Configuration(
                "escrow account must be distinct from arbitrator and treasury".into(),
            ));
        }
        Ok(())
    }
}

/// Parameters of the in-memory payment token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            name: constants::DEFAULT_TOKEN_NAME.to_string(),
            symbol: constants::DEFAULT_TOKEN_SYMBOL.to_string(),
            decimals: constants::DEFAULT_TOKEN_DECIMALS,
        }
    }
}
