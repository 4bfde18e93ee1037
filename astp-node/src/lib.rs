//! ASTP simulator node library: geography/latency bootstrap, the
//! per-participant bounded simulation loop, and the CLI surface over
//! [`astp_core::config::SimulatorConfig`]. Split out from the `astp-node`
//! binary so integration tests can drive [`driver::run_participant`]
//! directly against an in-process [`astp_fabric::Fabric`].

pub mod bootstrap;
pub mod config;
pub mod driver;
pub mod participant;
pub mod report;

pub use config::Cli;
pub use driver::{run_participant, RunOutcome};
pub use participant::Participant;
