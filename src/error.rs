//! Error types shared by the simulation core.

use crate::topology::{NodeId, Weight};

/// Errors raised by topology construction, routing, attack and defense stages.
///
/// Unreachable sensors are a normal routing outcome and never show up here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("Insufficient nodes: {sensors} sensor(s) cannot provide {required} distinct peers per sensor")]
    InsufficientNodes { sensors: usize, required: usize },

    #[error("Too many sensors: {0} does not fit the node id space")]
    TooManySensors(usize),

    #[error("Invalid {name} range [{min}, {max}]: needs a positive minimum not above the maximum")]
    InvalidWeightRange { name: &'static str, min: Weight, max: Weight },

    #[error("Invalid energy range [{min}, {max}]: must be finite, non-negative and ordered")]
    InvalidEnergyRange { min: f64, max: f64 },

    #[error("Unknown node: {0} is not part of the topology")]
    UnknownNode(NodeId),

    #[error("Node {0} is the base station, not a sensor")]
    NotASensor(NodeId),

    #[error("Topology has no sensor nodes")]
    NoSensors,
}

pub type SimResult<T> = Result<T, SimError>;
