//! Per-interval transaction volume.

use serde::Serialize;
use std::time::Duration;
use timeboost_types::{BoundedWindow, Transaction};

/// Transaction counts for one interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VolumeBucket {
    /// Simulation time the interval started at.
    pub started_at: Duration,
    /// All transactions.
    pub total: u64,
    /// Express lane transactions.
    pub express: u64,
    /// Transactions that carried an error.
    pub errors: u64,
}

impl VolumeBucket {
    /// Non-express transactions.
    pub fn standard(&self) -> u64 {
        self.total - self.express
    }
}

/// Rolls observed transactions into fixed-length buckets.
#[derive(Debug)]
pub struct VolumeTracker {
    current: VolumeBucket,
    closed: BoundedWindow<VolumeBucket>,
}

impl VolumeTracker {
    /// Create a tracker retaining `buckets` closed intervals.
    pub fn new(buckets: usize) -> Self {
        Self {
            current: VolumeBucket::default(),
            closed: BoundedWindow::new(buckets),
        }
    }

    /// Count a transaction into the open bucket.
    pub fn observe(&mut self, tx: &Transaction) {
        self.current.total += 1;
        if tx.timeboost {
            self.current.express += 1;
        }
        if tx.has_error() {
            self.current.errors += 1;
        }
    }

    /// Close the open bucket and start a new one at `now`.
    pub fn rotate(&mut self, now: Duration) -> VolumeBucket {
        let closed = std::mem::replace(
            &mut self.current,
            VolumeBucket {
                started_at: now,
                ..VolumeBucket::default()
            },
        );
        self.closed.push(closed);
        closed
    }

    /// The bucket currently being filled.
    pub fn current(&self) -> &VolumeBucket {
        &self.current
    }

    /// Closed buckets, newest first.
    pub fn closed(&self) -> Vec<VolumeBucket> {
        self.closed.to_vec()
    }
}
