//! CLI surface over [`SimulatorConfig`] (SPEC_FULL.md §6B). spec.md §6 names
//! a single positional duration argument; everything else here is an
//! additive override knob the teacher's `NodeConfig` gives its constants,
//! scaled down since this simulator has no TOML file to load.

use astp_core::config::SimulatorConfig;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "astp-node")]
#[command(about = "Adaptive Sharded Transaction Protocol consensus simulator")]
#[command(version)]
pub struct Cli {
    /// Experiment duration in seconds. Must parse and be > 0, otherwise the
    /// default is used with a warning (spec.md §6).
    pub duration: Option<f64>,

    /// Number of simulated participants (ranks 0..n).
    #[arg(long, default_value_t = 4)]
    pub participants: usize,

    /// Maximum number of zones requested from zone formation.
    #[arg(long)]
    pub max_zones: Option<usize>,

    /// Seconds between zone-rebalance rounds.
    #[arg(long)]
    pub zone_rebalance_interval_secs: Option<u64>,

    /// Fast-Voting sample size per round.
    #[arg(long)]
    pub fv_sample_size: Option<usize>,

    /// Fast-Voting quorum (votes out of `fv_sample_size`).
    #[arg(long)]
    pub fv_quorum: Option<usize>,

    /// Weighted-DAG minimum accepted weight.
    #[arg(long)]
    pub wd_min_weight: Option<i64>,

    /// BFT acceptance quorum, as a fraction of zone size.
    #[arg(long)]
    pub bft_quorum: Option<f64>,

    /// Per-iteration probability of generating a new transaction.
    #[arg(long)]
    pub tx_generation_prob: Option<f64>,

    /// Emit each rank's metrics summary as a JSON line instead of prose.
    #[arg(long)]
    pub json_report: bool,
}

impl Cli {
    /// Builds the effective [`SimulatorConfig`], applying only the flags the
    /// caller actually set (spec.md §6B: "does not change defaults or
    /// semantics; it only gives the ambient stack a config surface").
    pub fn build_config(&self) -> SimulatorConfig {
        let mut cfg = SimulatorConfig::default();
        if let Some(v) = self.max_zones {
            cfg.max_zones = v;
        }
        if let Some(v) = self.zone_rebalance_interval_secs {
            cfg.zone_rebalance_interval = Duration::from_secs(v);
        }
        if let Some(v) = self.fv_sample_size {
            cfg.fv_sample_size = v;
        }
        if let Some(v) = self.fv_quorum {
            cfg.fv_quorum = v;
        }
        if let Some(v) = self.wd_min_weight {
            cfg.wd_min_weight = v;
        }
        if let Some(v) = self.bft_quorum {
            cfg.bft_quorum = v;
        }
        if let Some(v) = self.tx_generation_prob {
            cfg.tx_generation_prob = v;
        }
        cfg
    }

    /// Resolves the requested experiment duration (spec.md §6: "must parse
    /// and be > 0; otherwise default `DEFAULT_EXPERIMENT_DURATION = 10s`
    /// with a warning").
    pub fn resolve_duration(&self, cfg: &SimulatorConfig) -> f64 {
        match self.duration {
            Some(d) if d > 0.0 => d,
            Some(d) => {
                tracing::warn!(requested = d, "non-positive duration; using default");
                cfg.default_experiment_duration.as_secs_f64()
            }
            None => cfg.default_experiment_duration.as_secs_f64(),
        }
    }
}
