use thiserror::Error;

#[derive(Debug, Error)]
pub enum DagError {
    #[error("DAG store is at capacity ({0} entries)")]
    Full(usize),
}
