//! Packet delivery evaluation.
//!
//! A sensor counts as reachable when any path to the base station exists,
//! and as valid when its computed shortest path avoids the compromised node.

use serde::{Deserialize, Serialize};

use super::path::RouteTable;
use crate::error::SimResult;
use crate::topology::{NodeId, Topology};

/// Delivery figures for one topology state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Sensors with any path to the base station
    pub total_reachable: usize,
    /// Reachable sensors whose route avoids the compromised node
    pub valid_reachable: usize,
    /// Packet delivery ratio in percent, 0 when nothing is reachable
    pub ratio: f64,
}

impl EvaluationResult {
    pub fn new(total_reachable: usize, valid_reachable: usize) -> Self {
        let ratio = if total_reachable == 0 {
            0.0
        } else {
            100.0 * valid_reachable as f64 / total_reachable as f64
        };
        Self {
            total_reachable,
            valid_reachable,
            ratio,
        }
    }

    /// Reachable sensors whose route crosses the compromised node
    pub fn compromised(&self) -> usize {
        self.total_reachable - self.valid_reachable
    }
}

/// Evaluate delivery from every sensor to `base_station`.
///
/// With `avoid_node == None` every reachable sensor is valid. The topology
/// is not modified.
pub fn evaluate(
    topology: &Topology,
    base_station: NodeId,
    avoid_node: Option<NodeId>,
) -> SimResult<EvaluationResult> {
    if let Some(node) = avoid_node {
        topology.ensure_node(node)?;
    }
    let routes = RouteTable::compute(topology, base_station)?;
    Ok(evaluate_routes(&routes, avoid_node))
}

/// Evaluate an already computed route table
pub fn evaluate_routes(routes: &RouteTable, avoid_node: Option<NodeId>) -> EvaluationResult {
    let total_reachable = routes.reachable_count();
    let valid_reachable = match avoid_node {
        Some(node) => routes.iter().filter(|(_, route)| !route.contains(node)).count(),
        None => total_reachable,
    };
    EvaluationResult::new(total_reachable, valid_reachable)
}
