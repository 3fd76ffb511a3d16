//! Per-bidder escrow record.

use serde::{Deserialize, Serialize};

use crate::Amount;

/// What one bidder has escrowed on one auction.
///
/// Created on the bidder's first accepted bid, raised by top-ups, and
/// closed by a single refund claim. Never deleted and never reopened once
/// `claimed` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    /// Amount currently escrowed for this bidder (their latest accepted bid).
    pub deposited: Amount,
    /// Whether the deposit has been refunded.
    pub claimed: bool,
}

impl BidRecord {
    /// Whether a refund claim could pay anything out.
    #[must_use]
    pub fn is_claimable(&self) -> bool {
        !self.claimed && !self.deposited.is_zero()
    }

    /// Amount still sitting in escrow for this record.
    #[must_use]
    pub fn outstanding(&self) -> Amount {
        if self.claimed {
            Amount::ZERO
        } else {
            self.deposited
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_not_claimable() {
        let record = BidRecord::default();
        assert!(!record.is_claimable());
        assert_eq!(record.outstanding(), Amount::ZERO);
    }

    #[test]
    fn claimed_record_has_nothing_outstanding() {
        let mut record = BidRecord {
            deposited: Amount(12),
            claimed: false,
        };
        assert!(record.is_claimable());
        assert_eq!(record.outstanding(), Amount(12));

        record.claimed = true;
        assert!(!record.is_claimable());
        assert_eq!(record.outstanding(), Amount::ZERO);
    }
}
