//! ASTP simulator binary: bootstraps `n` in-process participants over a
//! [`Fabric`], runs each through [`driver::run_participant`] for the
//! resolved experiment duration, then joins (spec.md §6).

use anyhow::Result;
use astp_fabric::Fabric;
use astp_node::{driver, report, Cli};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,astp_node=debug".into()))
        .with_target(true)
        .init();

    let cfg = cli.build_config();
    let duration_secs = cli.resolve_duration(&cfg);
    let n = cli.participants;
    let json_report = cli.json_report;

    if n == 0 {
        anyhow::bail!("participants must be at least 1");
    }

    info!(n, duration_secs, "starting simulation");
    report::print_banner(n, duration_secs);

    let fabric = Fabric::new(n);
    let mut handles = Vec::with_capacity(n);
    for rank in 0..n {
        let fabric = Arc::clone(&fabric);
        let cfg = cfg.clone();
        let requested_duration = if rank == 0 { Some(duration_secs) } else { None };
        handles.push(tokio::spawn(async move { driver::run_participant(fabric, rank, n, cfg, requested_duration, None, json_report).await }));
    }

    for handle in handles {
        handle.await.map_err(|e| anyhow::anyhow!("participant task panicked: {e}"))?;
    }

    Ok(())
}
