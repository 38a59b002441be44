//! Topology type definitions.
//!
//! A topology is an owned adjacency list: every node maps to an ordered
//! sequence of outgoing links. Links are directed, so the cost of `a -> b`
//! is independent of `b -> a`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Node identifier. The base station is always [`BASE_STATION_ID`].
pub type NodeId = u32;

/// Link cost. Always positive.
pub type Weight = u32;

/// Identifier of the base station in every built topology
pub const BASE_STATION_ID: NodeId = 0;

/// Role of a node in the sensor network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    /// The single sink collecting sensor traffic
    BaseStation,
    /// A regular sensor forwarding readings towards the base station
    Sensor,
}

/// Outgoing link as stored in the adjacency list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub to: NodeId,
    pub weight: Weight,
}

/// A directed edge with its source, used when edges leave the adjacency list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: Weight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeEntry {
    role: NodeRole,
    links: Vec<Link>,
}

/// Directed weighted graph of sensors and one base station
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    base_station: NodeId,
    nodes: BTreeMap<NodeId, NodeEntry>,
}

impl Topology {
    /// Create a topology holding only the base station
    pub fn new(base_station: NodeId) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            base_station,
            NodeEntry {
                role: NodeRole::BaseStation,
                links: Vec::new(),
            },
        );
        Self { base_station, nodes }
    }

    pub fn base_station(&self) -> NodeId {
        self.base_station
    }

    /// Add a sensor node. Re-adding an existing sensor keeps its links.
    pub fn add_sensor(&mut self, id: NodeId) -> SimResult<()> {
        if id == self.base_station {
            return Err(SimError::NotASensor(id));
        }
        self.nodes.entry(id).or_insert_with(|| NodeEntry {
            role: NodeRole::Sensor,
            links: Vec::new(),
        });
        Ok(())
    }

    /// Add a directed edge, or overwrite the weight if it already exists.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: Weight) -> SimResult<()> {
        self.ensure_node(to)?;
        let entry = self.entry_mut(from)?;
        match entry.links.iter_mut().find(|link| link.to == to) {
            Some(link) => link.weight = weight,
            None => entry.links.push(Link { to, weight }),
        }
        Ok(())
    }

    /// Remove a directed edge. Returns the removed edge, if there was one.
    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> SimResult<Option<Edge>> {
        self.ensure_node(to)?;
        let entry = self.entry_mut(from)?;
        let Some(idx) = entry.links.iter().position(|link| link.to == to) else {
            return Ok(None);
        };
        let link = entry.links.remove(idx);
        Ok(Some(Edge {
            from,
            to,
            weight: link.weight,
        }))
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.nodes
            .get(&from)
            .map(|entry| entry.links.iter().any(|link| link.to == to))
            .unwrap_or(false)
    }

    pub fn weight(&self, from: NodeId, to: NodeId) -> Option<Weight> {
        self.nodes
            .get(&from)?
            .links
            .iter()
            .find(|link| link.to == to)
            .map(|link| link.weight)
    }

    /// Outgoing links of `node` in insertion order
    pub fn links(&self, node: NodeId) -> SimResult<&[Link]> {
        self.nodes
            .get(&node)
            .map(|entry| entry.links.as_slice())
            .ok_or(SimError::UnknownNode(node))
    }

    /// Mutable access to the outgoing links of `node`; edges cannot be added this way.
    pub fn links_mut(&mut self, node: NodeId) -> SimResult<&mut [Link]> {
        self.entry_mut(node).map(|entry| entry.links.as_mut_slice())
    }

    pub fn out_degree(&self, node: NodeId) -> SimResult<usize> {
        self.links(node).map(<[Link]>::len)
    }

    pub fn role(&self, node: NodeId) -> Option<NodeRole> {
        self.nodes.get(&node).map(|entry| entry.role)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Fail with [`SimError::UnknownNode`] when `node` is absent
    pub fn ensure_node(&self, node: NodeId) -> SimResult<()> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(SimError::UnknownNode(node))
        }
    }

    /// Fail unless `node` is present and is a sensor
    pub fn ensure_sensor(&self, node: NodeId) -> SimResult<()> {
        match self.role(node) {
            Some(NodeRole::Sensor) => Ok(()),
            Some(NodeRole::BaseStation) => Err(SimError::NotASensor(node)),
            None => Err(SimError::UnknownNode(node)),
        }
    }

    /// All node ids with their roles, ascending by id
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, NodeRole)> + '_ {
        self.nodes.iter().map(|(&id, entry)| (id, entry.role))
    }

    /// Sensor ids, ascending
    pub fn sensors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, entry)| entry.role == NodeRole::Sensor)
            .map(|(&id, _)| id)
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors().count()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every edge, grouped by source in ascending id order
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes.iter().flat_map(|(&from, entry)| {
            entry.links.iter().map(move |link| Edge {
                from,
                to: link.to,
                weight: link.weight,
            })
        })
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|entry| entry.links.len()).sum()
    }

    fn entry_mut(&mut self, node: NodeId) -> SimResult<&mut NodeEntry> {
        self.nodes.get_mut(&node).ok_or(SimError::UnknownNode(node))
    }
}
