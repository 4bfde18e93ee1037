//! Shared value types for the ASTP consensus simulator.
//!
//! Every other crate in the workspace depends on this one for the
//! [`Transaction`] value object, the [`Phase`]/[`Algorithm`] tags, and the
//! [`config::SimulatorConfig`] that carries the simulator's tunable
//! constants. Nothing here does I/O or messaging — those are the fabric's
//! job (`astp-fabric`) and the driver's job (`astp-node`).

pub mod config;
mod phase;
mod transaction;

pub use config::SimulatorConfig;
pub use phase::Phase;
pub use transaction::{Transaction, NO_PARENT};

/// Stable participant identity within the global group (0..n).
pub type Rank = usize;

/// Consensus algorithm selected for a given transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Algorithm {
    FastVoting,
    WeightedDag,
    Bft,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Algorithm::FastVoting => "fast_voting",
            Algorithm::WeightedDag => "weighted_dag",
            Algorithm::Bft => "bft",
        };
        f.write_str(name)
    }
}
