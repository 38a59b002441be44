//! Shortest-path routes towards the base station.
//!
//! Routes are computed with Dijkstra over positive link costs. Ties between
//! equal-cost paths are broken by the lexicographically smallest node
//! sequence, which makes the chosen route a pure function of the topology.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use serde::{Deserialize, Serialize};

use crate::error::SimResult;
use crate::topology::{NodeId, Topology};

/// A computed route: the ordered node sequence from source to target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    nodes: Vec<NodeId>,
    cost: u64,
}

impl Route {
    /// Nodes from source to target, both included
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Sum of link weights along the route
    pub fn cost(&self) -> u64 {
        self.cost
    }

    pub fn source(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn target(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn hops(&self) -> usize {
        self.nodes.len() - 1
    }

    /// True if the route visits `node`, endpoints included
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }
}

/// Cheapest route from `source` to `target`, or `None` if unreachable.
///
/// Fails only if either endpoint is not in the topology.
pub fn shortest_path(topology: &Topology, source: NodeId, target: NodeId) -> SimResult<Option<Route>> {
    topology.ensure_node(source)?;
    topology.ensure_node(target)?;

    // Best tentative (cost, path) per node; heap ordered the same way
    let mut tentative: BTreeMap<NodeId, (u64, Vec<NodeId>)> = BTreeMap::new();
    let mut settled: BTreeSet<NodeId> = BTreeSet::new();
    let mut heap: BinaryHeap<Reverse<(u64, Vec<NodeId>)>> = BinaryHeap::new();

    tentative.insert(source, (0, vec![source]));
    heap.push(Reverse((0, vec![source])));

    while let Some(Reverse((cost, path))) = heap.pop() {
        let node = path[path.len() - 1];
        if !settled.insert(node) {
            continue;
        }
        if node == target {
            return Ok(Some(Route { nodes: path, cost }));
        }

        for link in topology.links(node)? {
            if settled.contains(&link.to) {
                continue;
            }
            let next_cost = cost + u64::from(link.weight);
            let mut next_path = path.clone();
            next_path.push(link.to);

            let improves = match tentative.get(&link.to) {
                Some((best_cost, best_path)) => (next_cost, &next_path) < (*best_cost, best_path),
                None => true,
            };
            if improves {
                tentative.insert(link.to, (next_cost, next_path.clone()));
                heap.push(Reverse((next_cost, next_path)));
            }
        }
    }

    Ok(None)
}

/// Routes from every sensor to one target, computed once per topology state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    target: NodeId,
    sensors: usize,
    routes: BTreeMap<NodeId, Route>,
}

impl RouteTable {
    /// Compute the route of every sensor towards `target`.
    ///
    /// Sensors without any path are simply absent from the table.
    pub fn compute(topology: &Topology, target: NodeId) -> SimResult<Self> {
        topology.ensure_node(target)?;

        let mut routes = BTreeMap::new();
        let mut sensors = 0;
        for sensor in topology.sensors() {
            sensors += 1;
            if let Some(route) = shortest_path(topology, sensor, target)? {
                routes.insert(sensor, route);
            }
        }

        Ok(Self {
            target,
            sensors,
            routes,
        })
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Number of sensors considered, reachable or not
    pub fn sensor_count(&self) -> usize {
        self.sensors
    }

    pub fn route(&self, sensor: NodeId) -> Option<&Route> {
        self.routes.get(&sensor)
    }

    pub fn is_reachable(&self, sensor: NodeId) -> bool {
        self.routes.contains_key(&sensor)
    }

    pub fn reachable_count(&self) -> usize {
        self.routes.len()
    }

    /// Reachable sensors with their routes, ascending by sensor id
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Route)> + '_ {
        self.routes.iter().map(|(&id, route)| (id, route))
    }

    /// Reachable sensors whose route visits `node`
    pub fn routed_through(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(move |(_, route)| route.contains(node))
            .map(|(id, _)| id)
    }
}
