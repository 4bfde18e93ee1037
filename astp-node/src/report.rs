//! Stdout reporting (spec.md §6 "Stdout" — exact wording is policy, these
//! lines are the observable contract). Kept separate from `driver.rs` so the
//! loop's control flow doesn't get tangled up with formatting.

use astp_core::Rank;
use astp_metrics::{AggregateMetrics, MetricsSummary};

pub fn print_banner(n: usize, duration_secs: f64) {
    println!("=== ASTP Blockchain Simulator ===");
    println!("Nodes: {}", n);
    println!("Duration: {:.0} seconds", duration_secs);
    println!("==================================\n");
}

pub fn print_zone_assignment(rank: Rank, zone_id: u32, zone_size: usize) {
    println!("Node {}: assigned to zone {} (size {})", rank, zone_id, zone_size);
}

pub fn print_phase_transition(elapsed_secs: f64, from: astp_core::Phase, to: astp_core::Phase) {
    println!("[{:.2}s] Phase transition: {} -> {}", elapsed_secs, from, to);
}

pub fn print_rebalance_notice(elapsed_secs: f64) {
    println!("[{:.2}s] Zone rebalancing complete", elapsed_secs);
}

pub fn print_metrics_line(rank: Rank, summary: &MetricsSummary, json: bool) {
    if json {
        println!("{}", serde_json::json!({ "rank": rank, "metrics": summary }));
    } else {
        println!("Node {}: {}", rank, summary);
    }
}

pub fn print_simulation_complete() {
    println!("\n=== Simulation Complete ===");
}

pub fn print_aggregate(aggregate: &AggregateMetrics) {
    println!("\n=== AGGREGATE RESULTS ===");
    println!("{}", aggregate);
    println!("========================");
}
