//! Sinkhole attack injection.
//!
//! A sinkhole node advertises artificially cheap routes. It is modelled by
//! rewriting the cost of every outgoing link of the attacker to the minimum
//! positive cost; edges are never added or removed.

use log::debug;
use rand::seq::IteratorRandom;
use rand::Rng;

use crate::error::{SimError, SimResult};
use crate::topology::{NodeId, Topology, Weight};

/// Cost advertised on every link of a sinkhole node
pub const SINKHOLE_ADVERTISED_COST: Weight = 1;

/// Pick the attacker uniformly among the sensors of `topology`
pub fn choose_attacker<R: Rng + ?Sized>(topology: &Topology, rng: &mut R) -> SimResult<NodeId> {
    topology.sensors().choose(rng).ok_or(SimError::NoSensors)
}

/// Turn `attacker` into a sinkhole. Applying it twice is a no-op.
pub fn inject_sinkhole(topology: &mut Topology, attacker: NodeId) -> SimResult<()> {
    topology.ensure_sensor(attacker)?;
    for link in topology.links_mut(attacker)? {
        if link.weight != SINKHOLE_ADVERTISED_COST {
            debug!(
                "Sinkhole {} advertises {} -> {} at cost {} (was {})",
                attacker, attacker, link.to, SINKHOLE_ADVERTISED_COST, link.weight
            );
            link.weight = SINKHOLE_ADVERTISED_COST;
        }
    }
    Ok(())
}
