use astp_fabric::FabricError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("requested k={k} zones but only {n} participants exist")]
    TooFewParticipants { k: usize, n: usize },

    #[error("zone group split failed: {0}")]
    Split(#[from] FabricError),
}
