//! # WSNSim - Sinkhole attack simulator for wireless sensor networks
//!
//! This library models routing in a wireless sensor network under a
//! sinkhole attack and measures how much a naive detection and mitigation
//! pass recovers.
//!
//! ## Overview
//!
//! A run builds a directed, weighted topology of sensors and one base
//! station, evaluates packet delivery, turns one sensor into a sinkhole by
//! falsifying its advertised link costs, evaluates again, runs an
//! out-degree intrusion detector, prunes direct links into the suspect and
//! evaluates a third time. Energy and latency figures close the run.
//!
//! ## Architecture
//!
//! - `topology`: graph types and the seeded builder
//! - `routing`: deterministic shortest paths and delivery evaluation
//! - `attack`: sinkhole injection and attacker selection
//! - `defense`: out-degree IDS and secure routing mitigation
//! - `metrics`: energy and latency
//! - `config` / `config_loader`: YAML configuration, validation, CLI overrides
//! - `orchestrator`: the run driver and parallel batches
//! - `report`: JSON, text and GraphViz output
//!
//! ## Example Usage
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use wsnsim::{apply_secure_routing, build, evaluate, inject_sinkhole};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut topology = build(10, &mut rng)?;
//! let base = topology.base_station();
//!
//! let baseline = evaluate(&topology, base, None)?;
//! assert_eq!(baseline.total_reachable, 10);
//!
//! inject_sinkhole(&mut topology, 5)?;
//! let attacked = evaluate(&topology, base, Some(5))?;
//! assert!(attacked.ratio < 100.0);
//!
//! apply_secure_routing(&mut topology, 5)?;
//! # Ok::<(), wsnsim::SimError>(())
//! ```
//!
//! ## Error Handling
//!
//! Simulation stages return [`SimError`]. Configuration loading and report
//! writing use `color_eyre` for context-rich errors.

pub mod error;
pub mod topology;
pub mod routing;
pub mod attack;
pub mod defense;
pub mod metrics;
pub mod config;
pub mod config_loader;
pub mod orchestrator;
pub mod report;

pub use error::{SimError, SimResult};
pub use topology::{build, build_seeded, build_with, Edge, NodeId, NodeRole, Topology, TopologyParams};
pub use routing::{evaluate, shortest_path, EvaluationResult, Route, RouteTable};
pub use attack::{choose_attacker, inject_sinkhole};
pub use defense::{apply_secure_routing, detect};
pub use metrics::{energy, latency};
