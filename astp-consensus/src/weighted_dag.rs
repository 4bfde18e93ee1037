use crate::error::ConsensusError;
use astp_core::Rank;
use astp_dag::DagStore;

/// Weight-threshold acceptance (spec.md §4.5): look the transaction up by
/// its originator identity and accept iff its accumulated weight has
/// crossed `min_weight`. Has no messaging of its own — finality rides
/// entirely on [`DagStore::update_weights`]'s periodic recomputation.
pub fn weighted_dag_consensus(dag: &DagStore, tx_id: u64, sender: Rank, min_weight: i64) -> Result<bool, ConsensusError> {
    let index = dag.find_by_origin(tx_id, sender).ok_or(ConsensusError::NotInDag { tx_id, sender })?;
    let weight = dag.get_weight(index).expect("find_by_origin returned a valid index");
    Ok(weight >= min_weight)
}
