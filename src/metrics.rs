//! Auxiliary energy and latency metrics.
//!
//! Energy is a coarse stand-in drawn per sensor and does not depend on
//! routing. Latency is the mean weighted route cost to the base station.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::routing::RouteTable;
use crate::topology::{NodeId, Topology};

/// Inclusive range of per-sensor energy consumption
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyRange {
    pub min: f64,
    pub max: f64,
}

impl EnergyRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }
}

impl Default for EnergyRange {
    fn default() -> Self {
        Self::new(0.5, 2.0)
    }
}

/// Total energy consumption over all sensors, one draw per sensor in ascending id order
pub fn energy<R: Rng + ?Sized>(topology: &Topology, rng: &mut R) -> f64 {
    draw_energy(topology, EnergyRange::default(), rng)
}

/// Like [`energy`], with a custom per-sensor range.
///
/// Fails with [`SimError::InvalidEnergyRange`] before drawing anything when
/// the range is unusable.
pub fn energy_with<R: Rng + ?Sized>(
    topology: &Topology,
    range: EnergyRange,
    rng: &mut R,
) -> SimResult<f64> {
    if !range.is_valid() {
        return Err(SimError::InvalidEnergyRange {
            min: range.min,
            max: range.max,
        });
    }
    Ok(draw_energy(topology, range, rng))
}

fn draw_energy<R: Rng + ?Sized>(topology: &Topology, range: EnergyRange, rng: &mut R) -> f64 {
    topology
        .sensors()
        .map(|_| rng.gen_range(range.min..=range.max))
        .sum()
}

/// Average route cost of reachable sensors to `base_station`, 0 if none reach it
pub fn latency(topology: &Topology, base_station: NodeId) -> SimResult<f64> {
    let routes = RouteTable::compute(topology, base_station)?;
    Ok(latency_from_routes(&routes))
}

pub fn latency_from_routes(routes: &RouteTable) -> f64 {
    let reachable = routes.reachable_count();
    if reachable == 0 {
        return 0.0;
    }
    let total: u64 = routes.iter().map(|(_, route)| route.cost()).sum();
    total as f64 / reachable as f64
}
