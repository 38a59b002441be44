//! Secure routing mitigation.
//!
//! Sensors whose current route passes through the suspect lose their direct
//! link to the suspect. Only direct links are pruned: a sensor that reaches
//! the suspect through another intermediary keeps doing so, and the suspect
//! keeps its own outgoing links.

use log::debug;

use crate::error::SimResult;
use crate::routing::shortest_path;
use crate::topology::{Edge, NodeId, Topology};

/// Prune direct links into `suspect` from sensors routing through it.
///
/// Sensors are visited in ascending id order and each route is recomputed
/// right before its check, so a link pruned for a lower id can move a later
/// sensor off the suspect and spare its own link. Returns the removed edges
/// in ascending order of their source.
pub fn apply_secure_routing(topology: &mut Topology, suspect: NodeId) -> SimResult<Vec<Edge>> {
    topology.ensure_node(suspect)?;

    let base_station = topology.base_station();
    let sensors: Vec<NodeId> = topology.sensors().collect();

    let mut removed = Vec::new();
    for sensor in sensors {
        let Some(route) = shortest_path(topology, sensor, base_station)? else {
            continue;
        };
        if !route.contains(suspect) {
            continue;
        }
        if let Some(edge) = topology.remove_edge(sensor, suspect)? {
            debug!("Secure routing removed {} -> {} (cost {})", edge.from, edge.to, edge.weight);
            removed.push(edge);
        }
    }

    Ok(removed)
}
