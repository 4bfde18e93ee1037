use crate::{Phase, Rank};
use serde::{Deserialize, Serialize};

/// Sentinel used for a parent slot that has no referent yet (spec.md §3).
pub const NO_PARENT: i64 = -1;

/// Immutable transaction record (spec.md §3).
///
/// Created once by its originating participant and then fanned out by value
/// to every peer in the originator's zone; each recipient owns its own copy
/// (there is no shared mutable transaction state anywhere in the system).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique within the originator (a rank-local counter), not globally.
    pub tx_id: u64,
    pub sender: Rank,
    pub receiver: Rank,
    pub amount: f64,
    /// Indices into the *originator's* DAG at creation time, or [`NO_PARENT`].
    pub parents: [i64; 2],
    pub zone_id: u32,
    pub phase: Phase,
    /// Seconds elapsed since the experiment's start time.
    pub timestamp: f64,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tx_id: u64,
        sender: Rank,
        receiver: Rank,
        amount: f64,
        parents: [i64; 2],
        zone_id: u32,
        phase: Phase,
        timestamp: f64,
    ) -> Self {
        Self {
            tx_id,
            sender,
            receiver,
            amount,
            parents,
            zone_id,
            phase,
            timestamp,
        }
    }

    /// Simulator-grade validation: a positive amount is the only
    /// requirement. `sender`/`receiver` are `Rank` (`usize`) so there is no
    /// negative-index case to reject, unlike the original C `Transaction`
    /// where both fields were plain `int`.
    pub fn is_valid(&self) -> bool {
        self.amount > 0.0
    }
}
