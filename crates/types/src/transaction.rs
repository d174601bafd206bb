//! Simulated chain transactions.

use crate::{Address, TxHash};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Outcome status of a simulated transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    /// Not yet included.
    Pending,
    /// Included and executed successfully.
    Confirmed,
    /// Included but failed.
    Failed,
}

impl TxStatus {
    /// Get a human-readable name for this status.
    pub fn name(&self) -> &'static str {
        match self {
            TxStatus::Pending => "pending",
            TxStatus::Confirmed => "confirmed",
            TxStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Simulated failure reason attached to a transaction.
///
/// These are plain data shown in the alert list; nothing retries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum TxError {
    /// Sequencer saw an out-of-order sequence number.
    #[error("Sequence mismatch")]
    SequenceMismatch,

    /// Execution ran out of gas.
    #[error("Gas limit exceeded")]
    GasLimitExceeded,

    /// Execution reverted.
    #[error("Transaction reverted")]
    Reverted,
}

impl TxError {
    /// Every failure reason, in a fixed order for uniform sampling.
    pub const ALL: [TxError; 3] = [
        TxError::SequenceMismatch,
        TxError::GasLimitExceeded,
        TxError::Reverted,
    ];
}

/// A simulated transaction as observed by the dashboard.
///
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction hash.
    pub hash: TxHash,
    /// Sequencer-assigned ordering number.
    pub sequence_number: u64,
    /// Execution status.
    pub status: TxStatus,
    /// Gas consumed.
    pub gas_used: u64,
    /// Whether the transaction went through the express lane.
    pub timeboost: bool,
    /// Ordering delay applied by the sequencer (zero for express traffic).
    pub delay: Duration,
    /// Sender.
    pub from: Address,
    /// Recipient.
    pub to: Address,
    /// Simulation time the transaction was observed at.
    pub timestamp: Duration,
    /// Failure reason, if any.
    pub error: Option<TxError>,
    /// Round controller at creation time (a copy, not a live reference).
    pub round_controller: Option<Address>,
}

impl Transaction {
    /// Whether this transaction should raise an error alert.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_reasons_display() {
        assert_eq!(TxError::SequenceMismatch.to_string(), "Sequence mismatch");
        assert_eq!(TxError::GasLimitExceeded.to_string(), "Gas limit exceeded");
        assert_eq!(TxError::Reverted.to_string(), "Transaction reverted");
    }

    #[test]
    fn test_status_names() {
        assert_eq!(TxStatus::Confirmed.to_string(), "confirmed");
        assert_eq!(TxStatus::Pending.name(), "pending");
        assert_eq!(TxStatus::Failed.name(), "failed");
    }
}
