//! Sensor network topology.
//!
//! This module contains the directed, weighted graph of sensor nodes and
//! the single base station, plus the seeded builder that populates it.

pub mod types;
pub mod builder;

// Re-export key types and functions for easier access
pub use types::{Edge, Link, NodeId, NodeRole, Topology, Weight, BASE_STATION_ID};
pub use builder::{build, build_seeded, build_with, TopologyParams, WeightRange};
