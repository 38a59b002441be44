//! Simulation orchestrator.
//!
//! Drives one run through the fixed stage sequence: build, baseline
//! evaluation, sinkhole injection, post-attack evaluation, intrusion
//! detection, secure routing, post-mitigation evaluation, then energy and
//! latency. The topology is owned here and lent to each stage in turn.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::attack::{choose_attacker, inject_sinkhole};
use crate::config::SimulationConfig;
use crate::defense::{apply_secure_routing, detect};
use crate::error::SimResult;
use crate::metrics::{energy_with, latency};
use crate::report::TopologySnapshot;
use crate::routing::{evaluate, EvaluationResult};
use crate::topology::{build_with, Edge, NodeId};

/// Run identification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Seed the run was started from; absent when an external RNG was supplied
    pub seed: Option<u64>,
    pub sensors: usize,
    pub base_station: NodeId,
    pub generated_at: DateTime<Utc>,
}

/// Everything one simulation run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub metadata: RunMetadata,
    pub attacker: NodeId,
    pub baseline: EvaluationResult,
    pub post_attack: EvaluationResult,
    /// Sensors flagged by the out-degree IDS
    pub flagged: Vec<NodeId>,
    /// Edges pruned by secure routing, empty when it is disabled
    pub removed_edges: Vec<Edge>,
    /// Absent when secure routing is disabled
    pub post_mitigation: Option<EvaluationResult>,
    pub energy: f64,
    pub latency: f64,
    /// Topology right after the attack, with the attacker highlighted
    pub snapshot: TopologySnapshot,
}

/// Run one simulation, drawing a seed from entropy if the config has none
pub fn run_simulation(config: &SimulationConfig) -> SimResult<SimulationReport> {
    let seed = config.general.seed.unwrap_or_else(|| {
        let seed: u64 = rand::random();
        info!("No seed configured, using {}", seed);
        seed
    });
    run_seeded(config, seed)
}

/// Run one simulation from an explicit seed
pub fn run_seeded(config: &SimulationConfig, seed: u64) -> SimResult<SimulationReport> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut report = run_with_rng(config, &mut rng)?;
    report.metadata.seed = Some(seed);
    Ok(report)
}

/// Run one simulation drawing all randomness from `rng`.
///
/// Draw order: topology, attacker (only if not configured), energy.
pub fn run_with_rng<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
) -> SimResult<SimulationReport> {
    let params = config.topology_params();
    let mut topology = build_with(&params, rng)?;
    let base_station = topology.base_station();
    info!(
        "Built topology: {} sensors, {} links",
        topology.sensor_count(),
        topology.edge_count()
    );

    let baseline = evaluate(&topology, base_station, None)?;
    log_evaluation("Baseline", &baseline);

    let attacker = match config.attack.attacker {
        Some(attacker) => attacker,
        None => choose_attacker(&topology, rng)?,
    };
    info!("Malicious node: {}", attacker);
    inject_sinkhole(&mut topology, attacker)?;
    let snapshot = TopologySnapshot::capture(&topology, Some(attacker));

    let post_attack = evaluate(&topology, base_station, Some(attacker))?;
    log_evaluation("Post-attack", &post_attack);

    let flagged = detect(&topology, config.defense.ids_threshold);
    info!("IDS flagged nodes: {:?}", flagged);
    if !flagged.contains(&attacker) {
        warn!("IDS did not flag malicious node {}", attacker);
    }

    let (removed_edges, post_mitigation) = if config.defense.secure_routing {
        // The attacker is mitigated even when the IDS misses it
        let suspects: BTreeSet<NodeId> = flagged.iter().copied().chain([attacker]).collect();
        let mut removed_edges = Vec::new();
        for suspect in suspects {
            removed_edges.extend(apply_secure_routing(&mut topology, suspect)?);
        }
        info!(
            "Secure routing applied, {} link(s) into suspects removed",
            removed_edges.len()
        );

        let post_mitigation = evaluate(&topology, base_station, Some(attacker))?;
        log_evaluation("Post-security", &post_mitigation);
        (removed_edges, Some(post_mitigation))
    } else {
        info!("Secure routing disabled, skipping mitigation");
        (Vec::new(), None)
    };

    let energy = energy_with(&topology, config.metrics.energy_per_node, rng)?;
    info!("Total energy consumption: {:.2} units", energy);

    let latency = latency(&topology, base_station)?;
    info!("Average latency: {:.2} ms", latency);

    Ok(SimulationReport {
        metadata: RunMetadata {
            seed: None,
            sensors: topology.sensor_count(),
            base_station,
            generated_at: Utc::now(),
        },
        attacker,
        baseline,
        post_attack,
        flagged: flagged.into_iter().collect(),
        removed_edges,
        post_mitigation,
        energy,
        latency,
        snapshot,
    })
}

/// Run independent simulations in parallel, one per seed.
///
/// Each run owns its topology and generator; results keep the seed order.
pub fn run_batch(config: &SimulationConfig, seeds: &[u64]) -> Vec<SimResult<SimulationReport>> {
    info!("Running {} simulation(s) in parallel", seeds.len());
    seeds
        .par_iter()
        .map(|&seed| run_seeded(config, seed))
        .collect()
}

/// Mean figures over a batch of successful runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub runs: usize,
    pub mean_baseline_ratio: f64,
    pub mean_post_attack_ratio: f64,
    /// Mean over the runs that applied secure routing
    pub mean_post_mitigation_ratio: Option<f64>,
    pub mean_energy: f64,
    pub mean_latency: f64,
}

/// Summarize a batch; `None` for an empty batch
pub fn summarize_batch(reports: &[SimulationReport]) -> Option<BatchSummary> {
    if reports.is_empty() {
        return None;
    }
    let mitigated: Vec<f64> = reports
        .iter()
        .filter_map(|r| r.post_mitigation.map(|m| m.ratio))
        .collect();
    let mean_post_mitigation_ratio = if mitigated.is_empty() {
        None
    } else {
        Some(mitigated.iter().sum::<f64>() / mitigated.len() as f64)
    };

    Some(BatchSummary {
        runs: reports.len(),
        mean_baseline_ratio: mean_of(reports, |r| r.baseline.ratio),
        mean_post_attack_ratio: mean_of(reports, |r| r.post_attack.ratio),
        mean_post_mitigation_ratio,
        mean_energy: mean_of(reports, |r| r.energy),
        mean_latency: mean_of(reports, |r| r.latency),
    })
}

fn mean_of(reports: &[SimulationReport], field: impl Fn(&SimulationReport) -> f64) -> f64 {
    reports.iter().map(field).sum::<f64>() / reports.len() as f64
}

fn log_evaluation(stage: &str, result: &EvaluationResult) {
    info!(
        "{} evaluation: total paths {}, valid paths {}, packet delivery ratio {:.2}%",
        stage, result.total_reachable, result.valid_reachable, result.ratio
    );
}
