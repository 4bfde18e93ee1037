use crate::error::DagError;
use astp_core::{Rank, Transaction, NO_PARENT};
use tracing::{debug, warn};

/// Append-only local DAG: each participant keeps its own copy of every
/// transaction it has seen, indexed by position of arrival (spec.md §4.1
/// "Local DAG store"). Weights are a separate parallel table recomputed by
/// [`DagStore::update_weights`] rather than carried on the transaction
/// itself, since the recurrence needs the whole log to evaluate.
pub struct DagStore {
    capacity: usize,
    decay: f64,
    entries: Vec<Transaction>,
    weights: Vec<i64>,
}

impl DagStore {
    pub fn new(capacity: usize, decay: f64) -> Self {
        Self { capacity, decay, entries: Vec::new(), weights: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append `tx`, returning its index. Errs once the store reaches
    /// `capacity` (spec.md §7 "Capacity exhaustion") rather than growing
    /// without bound.
    pub fn add_transaction(&mut self, tx: Transaction) -> Result<usize, DagError> {
        if self.entries.len() >= self.capacity {
            warn!(capacity = self.capacity, "DAG store full; dropping transaction");
            return Err(DagError::Full(self.capacity));
        }
        let index = self.entries.len();
        debug!(index, tx_id = tx.tx_id, sender = tx.sender, "appended transaction to DAG");
        self.entries.push(tx);
        self.weights.push(1);
        Ok(index)
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.entries.get(index)
    }

    /// Parent indices a new transaction should carry, per spec.md §3: empty
    /// store has no parents, a single-entry store has one, and everyone
    /// else points at the two most recently appended entries, older one
    /// first (matches `get_latest_transactions`'s slot order).
    pub fn get_latest_parents(&self) -> [i64; 2] {
        match self.entries.len() {
            0 => [NO_PARENT, NO_PARENT],
            1 => [0, NO_PARENT],
            n => [(n - 2) as i64, (n - 1) as i64],
        }
    }

    /// Recompute every weight from the tail of the log backward (spec.md
    /// §4.1): `W[i] = 1 + floor(decay * sum(W[j] for j > i where i is one of
    /// j's parents))`. Evaluating indices from highest to lowest guarantees
    /// every `W[j]` a given `i` depends on has already been recomputed.
    pub fn update_weights(&mut self) {
        let n = self.entries.len();
        let mut weights = vec![1i64; n];
        for i in (0..n).rev() {
            let mut child_weight_sum = 0i64;
            for j in (i + 1)..n {
                if self.entries[j].parents.contains(&(i as i64)) {
                    child_weight_sum += weights[j];
                }
            }
            weights[i] = 1 + (self.decay * child_weight_sum as f64).floor() as i64;
        }
        self.weights = weights;
        debug!(entries = n, "recomputed DAG weights");
    }

    pub fn get_weight(&self, index: usize) -> Option<i64> {
        self.weights.get(index).copied()
    }

    /// Find a transaction's local index by its originator's `(tx_id, sender)`
    /// pair, the way Weighted-DAG validation looks an incoming vote up in
    /// the local log (spec.md §4.5).
    pub fn find_by_origin(&self, tx_id: u64, sender: Rank) -> Option<usize> {
        self.entries.iter().position(|tx| tx.tx_id == tx_id && tx.sender == sender)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astp_core::Phase;

    fn tx(tx_id: u64, parents: [i64; 2]) -> Transaction {
        Transaction::new(tx_id, 0, 1, 10.0, parents, 0, Phase::Normal, 0.0)
    }

    #[test]
    fn parent_selection_follows_store_size() {
        let mut dag = DagStore::new(10, 0.1);
        assert_eq!(dag.get_latest_parents(), [NO_PARENT, NO_PARENT]);

        dag.add_transaction(tx(1, [NO_PARENT, NO_PARENT])).unwrap();
        assert_eq!(dag.get_latest_parents(), [0, NO_PARENT]);

        dag.add_transaction(tx(2, [0, NO_PARENT])).unwrap();
        assert_eq!(dag.get_latest_parents(), [0, 1]);

        dag.add_transaction(tx(3, [0, 1])).unwrap();
        assert_eq!(dag.get_latest_parents(), [1, 2]);
    }

    #[test]
    fn add_transaction_fails_once_full() {
        let mut dag = DagStore::new(1, 0.1);
        dag.add_transaction(tx(1, [NO_PARENT, NO_PARENT])).unwrap();
        assert!(matches!(dag.add_transaction(tx(2, [0, NO_PARENT])), Err(DagError::Full(1))));
    }

    /// A chain 0 <- 1 <- 2 <- 3 with decay 0.1: weights compute tail-first
    /// so each parent sees its child's already-settled weight.
    #[test]
    fn weight_decay_recurrence_matches_chain_topology() {
        let mut dag = DagStore::new(10, 0.1);
        dag.add_transaction(tx(1, [NO_PARENT, NO_PARENT])).unwrap(); // index 0
        dag.add_transaction(tx(2, [0, NO_PARENT])).unwrap(); // index 1, parent 0
        dag.add_transaction(tx(3, [1, NO_PARENT])).unwrap(); // index 2, parent 1
        dag.update_weights();

        // W[2] = 1 (no children)
        assert_eq!(dag.get_weight(2), Some(1));
        // W[1] = 1 + floor(0.1 * W[2]) = 1 + floor(0.1) = 1
        assert_eq!(dag.get_weight(1), Some(1));
        // W[0] = 1 + floor(0.1 * W[1]) = 1
        assert_eq!(dag.get_weight(0), Some(1));
    }

    #[test]
    fn weight_decay_recurrence_accumulates_multiple_children() {
        let mut dag = DagStore::new(10, 0.5);
        dag.add_transaction(tx(1, [NO_PARENT, NO_PARENT])).unwrap(); // index 0
        dag.add_transaction(tx(2, [0, NO_PARENT])).unwrap(); // index 1, parent 0
        dag.add_transaction(tx(3, [0, NO_PARENT])).unwrap(); // index 2, parent 0
        dag.update_weights();

        // Both children have weight 1; W[0] = 1 + floor(0.5 * (1 + 1)) = 2
        assert_eq!(dag.get_weight(0), Some(2));
    }

    #[test]
    fn find_by_origin_locates_the_originating_copy() {
        let mut dag = DagStore::new(10, 0.1);
        dag.add_transaction(tx(7, [NO_PARENT, NO_PARENT])).unwrap();
        assert_eq!(dag.find_by_origin(7, 0), Some(0));
        assert_eq!(dag.find_by_origin(7, 1), None);
    }
}
