//! Consensus dispatcher and the three selectable consensus protocols
//! (spec.md §4.3–§4.6).
//!
//! [`selector::select`] maps a participant's zone/phase snapshot (plus an
//! optional external [`advisor::Advisor`]) to one of the three
//! [`astp_core::Algorithm`] variants; each variant has its own collaborator
//! dependencies (spec.md §9: "do not erect a deep interface hierarchy"), so
//! the three protocols are plain functions rather than trait impls of a
//! shared `Consensus` interface.

pub mod advisor;
mod bft;
mod error;
mod fast_voting;
mod selector;
mod weighted_dag;
mod witness;

pub use advisor::{Advisor, AdvisorMetrics};
pub use bft::bft_consensus;
pub use error::ConsensusError;
pub use fast_voting::fast_voting_consensus;
pub use selector::{select, ParticipantSnapshot};
pub use weighted_dag::weighted_dag_consensus;
pub use witness::witness_validate;
