//! Out-degree based intrusion detection.
//!
//! This is a naive IDS: it flags sensors with unusually many outgoing links
//! and looks at nothing else. Attacks that only rewrite link costs, such as
//! the sinkhole, leave out-degrees unchanged and go unnoticed.

use std::collections::BTreeSet;

use crate::topology::{NodeId, Topology};

/// Default out-degree above which a sensor is flagged
pub const DEFAULT_OUT_DEGREE_THRESHOLD: usize = 10;

/// Sensors whose out-degree is strictly greater than `threshold`
pub fn detect(topology: &Topology, threshold: usize) -> BTreeSet<NodeId> {
    topology
        .sensors()
        .filter(|&sensor| {
            topology
                .links(sensor)
                .map(|links| links.len() > threshold)
                .unwrap_or(false)
        })
        .collect()
}
