//! Tunable constants for the simulator (spec.md §§4.1–4.7, §9).
//!
//! A single [`SimulatorConfig`] carries every default the spec names so the
//! rest of the workspace never hard-codes a magic number; `astp-node`'s CLI
//! (§6B of SPEC_FULL.md) overrides individual fields from flags, the way the
//! teacher's `NodeConfig` is built from a TOML file plus CLI overrides, but
//! scaled down since there is no persistent config file here.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maximum number of zones requested from zone formation (`k = min(MAX_ZONES, N)`).
pub const MAX_ZONES: usize = 4;

/// `CONSECUTIVE_CHECKS` is reserved for the optional hysteresis debouncer
/// described in spec.md §4.2; see `astp-phases` for the documented decision
/// not to wire it in by default.
pub const CONSECUTIVE_CHECKS: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    // --- Zone formation (spec.md §4.1) ---
    pub max_zones: usize,
    pub zone_rebalance_interval: Duration,
    pub latency_weight: f64,
    pub affinity_weight: f64,
    pub latency_max_ms: f64,
    pub witness_latency_threshold_ms: f64,

    // --- Phase detector (spec.md §4.2) ---
    pub window_size_secs: f64,
    pub tau_high: f64,
    pub tau_low: f64,
    pub hysteresis: f64,

    // --- Fast-Voting (spec.md §4.4) ---
    pub fv_sample_size: usize,
    pub fv_quorum: usize,
    pub fv_consecutive_rounds: u32,

    // --- Weighted-DAG (spec.md §4.5) ---
    pub wd_min_weight: i64,
    pub wd_decay: f64,

    // --- BFT (spec.md §4.6) ---
    pub bft_quorum: f64,
    pub bft_timeout: Duration,

    // --- Driver (spec.md §4.7) ---
    pub tx_generation_prob: f64,
    pub default_experiment_duration: Duration,
    pub shutdown_lead: Duration,
    pub process_lead: Duration,
    pub shutdown_grace: Duration,

    // --- Capacity (spec.md §7 "Capacity exhaustion") ---
    pub dag_capacity: usize,
    pub window_capacity_factor: usize,
    pub latency_sample_capacity: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_zones: MAX_ZONES,
            zone_rebalance_interval: Duration::from_secs(300),
            latency_weight: 0.6,
            affinity_weight: 0.4,
            latency_max_ms: 300.0,
            witness_latency_threshold_ms: 50.0,

            window_size_secs: 60.0,
            tau_high: 50.0,
            tau_low: 10.0,
            hysteresis: 0.1,

            fv_sample_size: 10,
            fv_quorum: 7,
            fv_consecutive_rounds: 5,

            wd_min_weight: 5,
            wd_decay: 0.1,

            bft_quorum: 0.67,
            bft_timeout: Duration::from_secs(5),

            tx_generation_prob: 0.1,
            default_experiment_duration: Duration::from_secs(10),
            shutdown_lead: Duration::from_millis(300),
            process_lead: Duration::from_millis(100),
            shutdown_grace: Duration::from_millis(200),

            dag_capacity: 100_000,
            window_capacity_factor: 100,
            latency_sample_capacity: 10_000,
        }
    }
}

impl SimulatorConfig {
    /// Fast-Voting's round budget (spec.md §4.4: "up to
    /// `FV_CONSECUTIVE_ROUNDS + 10` rounds").
    pub fn fv_round_budget(&self) -> u32 {
        self.fv_consecutive_rounds + 10
    }

    /// `window_capacity_factor * window_size_secs`, rounded up — spec.md
    /// §3: "Capacity is chosen high enough that no entry is lost mid-window
    /// under realistic generation rates (e.g., 100x window seconds)".
    pub fn window_capacity(&self) -> usize {
        (self.window_size_secs * self.window_capacity_factor as f64).ceil() as usize
    }
}
