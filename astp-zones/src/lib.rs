//! Similarity-based zone formation (spec.md §4.1): k-means++ seeding and
//! Lloyd's iteration over an all-gathered similarity matrix, plus witness
//! identification for the optional cross-zone extension.

mod error;
mod formation;
pub mod kmeans;
mod similarity;
mod witness;

pub use error::ZoneError;
pub use formation::form_zones;
pub use similarity::compute_similarity_row;
pub use witness::is_witness;
