//! Report generation for simulation runs.
//!
//! Consumes evaluation results and topology snapshots and renders them as
//! JSON, a human-readable text report, or GraphViz DOT.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::orchestrator::{BatchSummary, SimulationReport};
use crate::routing::EvaluationResult;
use crate::topology::{Edge, NodeId, NodeRole, Topology};

/// A node as seen by the reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: NodeId,
    pub role: NodeRole,
}

/// Frozen copy of a topology with an optional highlighted malicious node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    pub nodes: Vec<SnapshotNode>,
    pub edges: Vec<Edge>,
    pub malicious: Option<NodeId>,
}

impl TopologySnapshot {
    pub fn capture(topology: &Topology, malicious: Option<NodeId>) -> Self {
        Self {
            nodes: topology
                .nodes()
                .map(|(id, role)| SnapshotNode { id, role })
                .collect(),
            edges: topology.edges().collect(),
            malicious,
        }
    }
}

/// Generate JSON report
pub fn generate_json_report(report: &SimulationReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Generate human-readable text report
pub fn generate_text_report(report: &SimulationReport, output_path: &Path) -> Result<()> {
    let text = render_text_report(report);
    fs::write(output_path, text)
        .with_context(|| format!("Failed to write text report to {}", output_path.display()))?;

    log::info!("Text report written to {}", output_path.display());
    Ok(())
}

/// Render the text report without writing it
pub fn render_text_report(report: &SimulationReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("=".repeat(80));
    lines.push("                  WSN SINKHOLE ATTACK SIMULATION".to_string());
    lines.push("=".repeat(80));
    lines.push(String::new());

    lines.push(format!("Generated: {}", report.metadata.generated_at.to_rfc3339()));
    match report.metadata.seed {
        Some(seed) => lines.push(format!("Seed: {}", seed)),
        None => lines.push("Seed: external generator".to_string()),
    }
    lines.push(format!("Sensor nodes: {}", report.metadata.sensors));
    lines.push(format!("Base station: {}", report.metadata.base_station));
    lines.push(String::new());

    push_evaluation(&mut lines, "Baseline Evaluation:", &report.baseline);

    lines.push(format!("Malicious node: {}", report.attacker));
    lines.push(String::new());
    push_evaluation(&mut lines, "Post-Attack Evaluation:", &report.post_attack);

    lines.push(format!("IDS flagged nodes: {:?}", report.flagged));
    lines.push(String::new());

    match &report.post_mitigation {
        Some(result) => {
            lines.push(format!(
                "Secure routing applied. {} malicious path link(s) removed.",
                report.removed_edges.len()
            ));
            for edge in &report.removed_edges {
                lines.push(format!("  {} -> {} (cost {})", edge.from, edge.to, edge.weight));
            }
            lines.push(String::new());
            push_evaluation(&mut lines, "Post-Security Evaluation:", result);
        }
        None => {
            lines.push("Secure routing disabled.".to_string());
            lines.push(String::new());
        }
    }

    lines.push(format!("Total energy consumption: {:.2} units", report.energy));
    lines.push(format!("Average latency: {:.2} ms", report.latency));
    lines.push(String::new());

    lines.join("\n")
}

fn push_evaluation(lines: &mut Vec<String>, title: &str, result: &EvaluationResult) {
    lines.push(title.to_string());
    lines.push(format!("Total paths: {}", result.total_reachable));
    lines.push(format!("Valid paths: {}", result.valid_reachable));
    lines.push(format!("Packet delivery ratio: {:.2}%", result.ratio));
    lines.push(String::new());
}

/// Render a batch summary
pub fn render_batch_summary(summary: &BatchSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Runs: {}", summary.runs);
    let _ = writeln!(out, "Mean baseline ratio: {:.2}%", summary.mean_baseline_ratio);
    let _ = writeln!(out, "Mean post-attack ratio: {:.2}%", summary.mean_post_attack_ratio);
    match summary.mean_post_mitigation_ratio {
        Some(ratio) => {
            let _ = writeln!(out, "Mean post-security ratio: {:.2}%", ratio);
        }
        None => {
            let _ = writeln!(out, "Mean post-security ratio: n/a");
        }
    }
    let _ = writeln!(out, "Mean energy consumption: {:.2} units", summary.mean_energy);
    let _ = writeln!(out, "Mean latency: {:.2} ms", summary.mean_latency);
    out
}

/// Generate GraphViz DOT format for visualization.
///
/// The base station is red, the malicious node orange, other sensors blue.
pub fn generate_dot(snapshot: &TopologySnapshot) -> String {
    let mut dot = String::new();
    dot.push_str("digraph WirelessSensorNetwork {\n");
    dot.push_str("  label=\"Wireless Sensor Network\";\n");
    dot.push_str("  node [shape=circle, style=filled, fontcolor=white, fontsize=8];\n");
    dot.push_str("  edge [color=gray];\n\n");

    for node in &snapshot.nodes {
        let color = match node.role {
            NodeRole::BaseStation => "red",
            NodeRole::Sensor if snapshot.malicious == Some(node.id) => "orange",
            NodeRole::Sensor => "blue",
        };
        let _ = writeln!(dot, "  \"{}\" [fillcolor={}];", node.id, color);
    }
    dot.push('\n');

    for edge in &snapshot.edges {
        let _ = writeln!(
            dot,
            "  \"{}\" -> \"{}\" [label=\"{}\"];",
            edge.from, edge.to, edge.weight
        );
    }

    dot.push_str("}\n");
    dot
}

/// Write the snapshot as a DOT file
pub fn write_dot(snapshot: &TopologySnapshot, output_path: &Path) -> Result<()> {
    fs::write(output_path, generate_dot(snapshot))
        .with_context(|| format!("Failed to write DOT graph to {}", output_path.display()))?;

    log::info!("Topology graph written to {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::orchestrator::run_seeded;
    use crate::topology::{build_seeded, BASE_STATION_ID};
    use tempfile::TempDir;

    fn reference_report() -> SimulationReport {
        let mut config = SimulationConfig::default();
        config.attack.attacker = Some(5);
        run_seeded(&config, 42).unwrap()
    }

    #[test]
    fn test_snapshot_capture() {
        let topology = build_seeded(10, 42).unwrap();
        let snapshot = TopologySnapshot::capture(&topology, Some(5));
        assert_eq!(snapshot.nodes.len(), 11);
        assert_eq!(snapshot.nodes[0], SnapshotNode { id: BASE_STATION_ID, role: NodeRole::BaseStation });
        assert_eq!(snapshot.edges.len(), 30);
        assert_eq!(snapshot.malicious, Some(5));
    }

    #[test]
    fn test_dot_colors() {
        let topology = build_seeded(4, 1).unwrap();
        let dot = generate_dot(&TopologySnapshot::capture(&topology, Some(2)));
        assert!(dot.starts_with("digraph WirelessSensorNetwork {"));
        assert!(dot.contains("\"0\" [fillcolor=red];"));
        assert!(dot.contains("\"2\" [fillcolor=orange];"));
        assert!(dot.contains("\"1\" [fillcolor=blue];"));
        assert_eq!(dot.matches(" -> ").count(), topology.edge_count());
    }

    #[test]
    fn test_text_report_contents() {
        let report = reference_report();
        let text = render_text_report(&report);
        assert!(text.contains("Baseline Evaluation:"));
        assert!(text.contains("Packet delivery ratio: 100.00%"));
        assert!(text.contains("Malicious node: 5"));
        assert!(text.contains("IDS flagged nodes: []"));
        assert!(text.contains("Post-Security Evaluation:"));
        assert!(text.contains("Seed: 42"));
    }

    #[test]
    fn test_reports_written() {
        let report = reference_report();
        let dir = TempDir::new().unwrap();

        let json_path = dir.path().join("report.json");
        generate_json_report(&report, &json_path).unwrap();
        let parsed: SimulationReport =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(parsed.attacker, report.attacker);
        assert_eq!(parsed.snapshot, report.snapshot);

        let text_path = dir.path().join("report.txt");
        generate_text_report(&report, &text_path).unwrap();
        assert!(fs::read_to_string(&text_path).unwrap().contains("Average latency"));

        let dot_path = dir.path().join("topology.dot");
        write_dot(&report.snapshot, &dot_path).unwrap();
        assert!(fs::read_to_string(&dot_path).unwrap().contains("fillcolor=orange"));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let report = reference_report();
        assert!(generate_json_report(&report, Path::new("/nonexistent/dir/report.json")).is_err());
    }
}
