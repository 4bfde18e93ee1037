use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("transaction (tx_id={tx_id}, sender={sender}) is not present in the local DAG")]
    NotInDag { tx_id: u64, sender: astp_core::Rank },
}
