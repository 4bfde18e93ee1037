//! The bounded-duration simulation loop (spec.md §4.7): phase detection,
//! probabilistic transaction generation, zone broadcast/receive, periodic
//! DAG weight recomputation, periodic rebalancing, and graceful shutdown.

use crate::bootstrap::{assign_geography, exchange_latencies};
use crate::participant::Participant;
use crate::report;
use astp_consensus::{bft_consensus, fast_voting_consensus, select, weighted_dag_consensus, Advisor, ParticipantSnapshot};
use astp_core::config::SimulatorConfig;
use astp_core::{Algorithm, Rank, Transaction};
use astp_dag::DagStore;
use astp_fabric::Fabric;
use astp_metrics::{AggregateMetrics, Metrics, MetricsSummary};
use astp_phases::PhaseDetector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span};

/// Base offset XOR'd with `rank` for this participant's private RNG stream
/// (transaction generation, receiver choice, Fast-Voting sampling). Distinct
/// from the zone-formation seed, which must be identical across ranks.
const PARTICIPANT_RNG_BASE: u64 = 0x4153_5450_0000_0000;

pub struct RunOutcome {
    pub rank: Rank,
    pub summary: MetricsSummary,
    /// `Some` only at rank 0 (spec.md §6 "Aggregation reduces ... at rank 0").
    pub aggregate: Option<AggregateMetrics>,
}

/// Runs one participant's full lifecycle end to end: bootstrap, initial
/// zone formation, the bounded loop, and staged shutdown (spec.md §4.7).
/// `requested_duration` is the resolved experiment duration in seconds;
/// only rank 0 supplies `Some` (having parsed it from the CLI per spec.md
/// §6), every other rank passes `None` and receives the same value back
/// from [`GlobalGroup::broadcast_duration`] (spec.md §6: "Rank 0 parses,
/// broadcasts the parsed value to all ranks").
pub async fn run_participant(
    fabric: Arc<Fabric>,
    rank: Rank,
    n: usize,
    cfg: SimulatorConfig,
    requested_duration: Option<f64>,
    advisor: Option<Arc<dyn Advisor>>,
    json_report: bool,
) -> RunOutcome {
    let span = info_span!("participant", rank = %rank);
    let _enter = span.enter();

    let mut rng = StdRng::seed_from_u64(PARTICIPANT_RNG_BASE ^ rank as u64);
    let global = fabric.global_group(rank);
    let duration_secs = global.broadcast_duration(requested_duration).await;

    let coord = assign_geography(rank, n, &mut rng);
    let latencies_ms = exchange_latencies(&global, coord, &mut rng).await;
    let mut participant = Participant::new(rank, n, coord, latencies_ms);

    let k = cfg.max_zones.min(n);
    let mut rebalance_round = 0u64;
    let (colours, zone_group) = astp_zones::form_zones(&fabric, rank, &global, participant.similarity_row(&cfg), k, rebalance_round)
        .await
        .expect("initial zone formation must succeed with a well-formed config");
    participant.zone_id = colours[rank];
    participant.zone_group = Some(zone_group);
    report::print_zone_assignment(rank, participant.zone_id, participant.zone_size());

    global.barrier().await;

    let mut dag = DagStore::new(cfg.dag_capacity, cfg.wd_decay);
    let mut detector = PhaseDetector::new(cfg.window_size_secs, cfg.window_capacity(), cfg.tau_low, cfg.tau_high, cfg.hysteresis);
    let mut metrics = Metrics::new(cfg.latency_sample_capacity);

    let start = Instant::now();
    let now_secs = || start.elapsed().as_secs_f64();
    metrics.start(now_secs());

    let end_time = duration_secs;
    let shutdown_time = end_time - cfg.shutdown_lead.as_secs_f64();
    let process_time = end_time - cfg.process_lead.as_secs_f64();

    let mut tx_counter: u64 = 0;
    let mut last_rebalance = now_secs();
    let mut last_weight_update = now_secs();

    while now_secs() < end_time {
        let now = now_secs();
        let can_generate = now < shutdown_time;
        let can_process = now < process_time;

        let old_phase = participant.phase;
        participant.phase = detector.update(now);
        if participant.phase != old_phase && rank == 0 {
            report::print_phase_transition(now, old_phase, participant.phase);
        }

        if can_generate && rng.gen::<f64>() < cfg.tx_generation_prob {
            let parents = dag.get_latest_parents();
            let receiver = rng.gen_range(0..n);
            let amount = rng.gen::<f64>() * 100.0;
            let tx = Transaction::new(tx_counter, rank, receiver, amount, parents, participant.zone_id, participant.phase, now);
            tx_counter += 1;

            if let Some(zone) = &participant.zone_group {
                let _ = zone.broadcast_to_others(tx.clone());
            }

            dag.add_transaction(tx.clone()).ok();
            detector.record(now);
            participant.total_tx_count += 1;
            metrics.record_transaction();

            if can_process {
                let accepted = run_consensus(&participant, &dag, &tx, &cfg, advisor.as_deref(), &mut rng).await;
                if accepted {
                    let latency_ms = (now_secs() - tx.timestamp) * 1000.0;
                    metrics.record_finalization(latency_ms);
                }
            }
        }

        if let Some(zone) = &participant.zone_group {
            while let Some(envelope) = zone.try_receive().await {
                if can_process {
                    dag.add_transaction(envelope.payload.clone()).ok();
                    detector.record(now);
                    if envelope.from < participant.affinity_counts.len() {
                        participant.affinity_counts[envelope.from] += 1;
                    }
                    participant.total_tx_count += 1;
                    metrics.record_transaction();
                }
            }
        }

        if now - last_weight_update >= 1.0 {
            dag.update_weights();
            last_weight_update = now;
        }

        if now - last_rebalance > cfg.zone_rebalance_interval.as_secs_f64() {
            rebalance_round += 1;
            let row = participant.similarity_row(&cfg);
            match astp_zones::form_zones(&fabric, rank, &global, row, k, rebalance_round).await {
                Ok((colours, zone_group)) => {
                    participant.zone_id = colours[rank];
                    participant.zone_group = Some(zone_group);
                    last_rebalance = now;
                    if rank == 0 {
                        report::print_rebalance_notice(now);
                    }
                }
                Err(err) => {
                    info!(%err, "zone rebalance skipped");
                }
            }
        }

        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    }

    metrics.finish(now_secs());
    shutdown(&participant, &cfg).await;

    global.barrier().await;
    if rank == 0 {
        report::print_simulation_complete();
    }

    let summary = metrics.summary();
    report::print_metrics_line(rank, &summary, json_report);

    let aggregate = global.reduce_metrics(summary.tps, summary.finalized).await.map(|(total_tps, total_finalized)| AggregateMetrics { total_tps, total_finalized });
    if let Some(aggregate) = aggregate {
        report::print_aggregate(&aggregate);
    }

    RunOutcome { rank, summary, aggregate }
}

/// Dispatches to the selected consensus protocol and returns `true` on
/// accept (spec.md §4.3–§4.6).
async fn run_consensus(
    participant: &Participant,
    dag: &DagStore,
    tx: &Transaction,
    cfg: &SimulatorConfig,
    advisor: Option<&dyn Advisor>,
    rng: &mut StdRng,
) -> bool {
    let snapshot = ParticipantSnapshot {
        zone_id: participant.zone_id,
        zone_size: participant.zone_size(),
        network_size: participant.n,
        avg_latency_ms: participant.avg_latency_ms(),
        tx_count_hint: participant.total_tx_count,
    };
    let algorithm = select(&snapshot, participant.phase, advisor);

    match algorithm {
        Algorithm::FastVoting => {
            let zone_size = participant.zone_size();
            fast_voting_consensus(
                zone_size,
                || tx.is_valid(),
                rng,
                cfg.fv_sample_size,
                cfg.fv_quorum,
                cfg.fv_consecutive_rounds,
                cfg.fv_round_budget(),
            )
        }
        Algorithm::WeightedDag => weighted_dag_consensus(dag, tx.tx_id, tx.sender, cfg.wd_min_weight).unwrap_or(false),
        Algorithm::Bft => {
            let my_vote = tx.is_valid();
            if let Some(zone) = &participant.zone_group {
                bft_consensus(zone, my_vote, cfg.bft_quorum).await
            } else {
                my_vote
            }
        }
    }
}

/// Graceful shutdown (spec.md §4.7): grace period, bounded drain, then a
/// final tight drain before the caller's barriers. The staggered deadlines
/// already prevented any BFT collective from starting without enough time
/// left to complete, so nothing here can still be mid-collective.
async fn shutdown(participant: &Participant, cfg: &SimulatorConfig) {
    tokio::time::sleep(cfg.shutdown_grace).await;

    let Some(zone) = &participant.zone_group else { return };

    let mut consecutive_empty = 0u32;
    for _ in 0..100 {
        if zone.try_receive().await.is_some() {
            consecutive_empty = 0;
        } else {
            consecutive_empty += 1;
            if consecutive_empty > 10 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_micros(100)).await;
        }
    }

    while zone.try_receive().await.is_some() {}

    zone.barrier().await;
}
