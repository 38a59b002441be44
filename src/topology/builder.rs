//! Seeded topology construction.
//!
//! Every sensor gets a fixed number of random peer links plus one direct
//! uplink to the base station, so each sensor can reach the base station
//! right after construction.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::types::{NodeId, Topology, Weight, BASE_STATION_ID};
use crate::error::{SimError, SimResult};

/// Inclusive range of link weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightRange {
    pub min: Weight,
    pub max: Weight,
}

impl WeightRange {
    pub const fn new(min: Weight, max: Weight) -> Self {
        Self { min, max }
    }

    /// A usable range has a positive minimum and `min <= max`
    pub fn is_valid(&self) -> bool {
        self.min > 0 && self.min <= self.max
    }

    fn ensure_valid(&self, name: &'static str) -> SimResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(SimError::InvalidWeightRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Weight {
        rng.gen_range(self.min..=self.max)
    }
}

/// Parameters of the topology builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyParams {
    /// Number of sensors, numbered `1..=sensors`
    pub sensors: usize,
    /// Distinct peer links per sensor
    pub peers_per_sensor: usize,
    /// Cost range of sensor-to-sensor links
    pub peer_weight: WeightRange,
    /// Cost range of sensor-to-base-station links
    pub base_weight: WeightRange,
}

impl TopologyParams {
    pub fn with_sensors(sensors: usize) -> Self {
        Self {
            sensors,
            ..Self::default()
        }
    }
}

impl Default for TopologyParams {
    fn default() -> Self {
        Self {
            sensors: 10,
            peers_per_sensor: 2,
            peer_weight: WeightRange::new(1, 10),
            base_weight: WeightRange::new(5, 15),
        }
    }
}

/// Build the reference topology: `n_sensors` sensors, two peers each.
pub fn build<R: Rng + ?Sized>(n_sensors: usize, rng: &mut R) -> SimResult<Topology> {
    build_with(&TopologyParams::with_sensors(n_sensors), rng)
}

/// Build the reference topology from a seed
pub fn build_seeded(n_sensors: usize, seed: u64) -> SimResult<Topology> {
    let mut rng = StdRng::seed_from_u64(seed);
    build(n_sensors, &mut rng)
}

/// Build a topology from explicit parameters.
///
/// Peer links are drawn for every sensor first, then the base station
/// uplinks, so the draw order from `rng` is stable for a given parameter set.
pub fn build_with<R: Rng + ?Sized>(params: &TopologyParams, rng: &mut R) -> SimResult<Topology> {
    params.peer_weight.ensure_valid("peer weight")?;
    params.base_weight.ensure_valid("base weight")?;

    // Each sensor samples from every other sensor
    let candidates_per_sensor = params.sensors.saturating_sub(1);
    if candidates_per_sensor < params.peers_per_sensor {
        return Err(SimError::InsufficientNodes {
            sensors: params.sensors,
            required: params.peers_per_sensor,
        });
    }

    let last_id =
        NodeId::try_from(params.sensors).map_err(|_| SimError::TooManySensors(params.sensors))?;
    let sensor_ids: Vec<NodeId> = (1..=last_id).collect();

    let mut topology = Topology::new(BASE_STATION_ID);
    for &id in &sensor_ids {
        topology.add_sensor(id)?;
    }

    for &node in &sensor_ids {
        let candidates: Vec<NodeId> = sensor_ids.iter().copied().filter(|&n| n != node).collect();
        let peers: Vec<NodeId> = candidates
            .choose_multiple(rng, params.peers_per_sensor)
            .copied()
            .collect();
        for peer in peers {
            let weight = params.peer_weight.sample(rng);
            debug!("Peer link {} -> {} (cost {})", node, peer, weight);
            topology.add_edge(node, peer, weight)?;
        }
    }

    for &node in &sensor_ids {
        let weight = params.base_weight.sample(rng);
        debug!("Uplink {} -> {} (cost {})", node, BASE_STATION_ID, weight);
        topology.add_edge(node, BASE_STATION_ID, weight)?;
    }

    Ok(topology)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_reference_topology() {
        let topology = build_seeded(10, 42).unwrap();

        assert_eq!(topology.sensor_count(), 10);
        assert_eq!(topology.node_count(), 11);
        assert_eq!(topology.edge_count(), 30);

        for sensor in topology.sensors() {
            let links = topology.links(sensor).unwrap();
            assert_eq!(links.len(), 3);
            for link in links {
                assert_ne!(link.to, sensor, "sensor {} links to itself", sensor);
                if link.to == BASE_STATION_ID {
                    assert!((5..=15).contains(&link.weight));
                } else {
                    assert!((1..=10).contains(&link.weight));
                }
            }
            assert!(topology.has_edge(sensor, BASE_STATION_ID));
        }
    }

    #[test]
    fn test_peers_are_distinct() {
        let topology = build_seeded(5, 7).unwrap();
        for sensor in topology.sensors() {
            let peers: Vec<NodeId> = topology
                .links(sensor)
                .unwrap()
                .iter()
                .map(|l| l.to)
                .filter(|&to| to != BASE_STATION_ID)
                .collect();
            assert_eq!(peers.len(), 2);
            assert_ne!(peers[0], peers[1]);
        }
    }

    #[test]
    fn test_same_seed_same_topology() {
        let first = build_seeded(10, 42).unwrap();
        let second = build_seeded(10, 42).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.edges().collect::<Vec<_>>(), second.edges().collect::<Vec<_>>());
    }

    #[test]
    fn test_too_few_sensors() {
        for n in 0..3 {
            assert_eq!(
                build_seeded(n, 1),
                Err(SimError::InsufficientNodes { sensors: n, required: 2 })
            );
        }
        assert!(build_seeded(3, 1).is_ok());
    }

    #[test]
    fn test_custom_params() {
        let params = TopologyParams {
            sensors: 6,
            peers_per_sensor: 5,
            peer_weight: WeightRange::new(2, 2),
            base_weight: WeightRange::new(20, 20),
        };
        let mut rng = StdRng::seed_from_u64(3);
        let topology = build_with(&params, &mut rng).unwrap();
        assert_eq!(topology.out_degree(1).unwrap(), 6);
        assert_eq!(topology.weight(1, BASE_STATION_ID), Some(20));
        assert_eq!(topology.weight(1, 2), Some(2));
    }

    #[test]
    fn test_weight_range_validity() {
        assert!(WeightRange::new(1, 10).is_valid());
        assert!(WeightRange::new(4, 4).is_valid());
        assert!(!WeightRange::new(0, 10).is_valid());
        assert!(!WeightRange::new(8, 3).is_valid());
    }

    #[test]
    fn test_inverted_weight_range_rejected() {
        let params = TopologyParams {
            peer_weight: WeightRange::new(9, 3),
            ..TopologyParams::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            build_with(&params, &mut rng),
            Err(SimError::InvalidWeightRange { name: "peer weight", min: 9, max: 3 })
        );
    }

    #[test]
    fn test_zero_weight_range_rejected() {
        let params = TopologyParams {
            base_weight: WeightRange::new(0, 0),
            ..TopologyParams::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            build_with(&params, &mut rng),
            Err(SimError::InvalidWeightRange { name: "base weight", min: 0, max: 0 })
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_sensor_count_beyond_id_space() {
        let sensors = NodeId::MAX as usize + 1;
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            build_with(&TopologyParams::with_sensors(sensors), &mut rng),
            Err(SimError::TooManySensors(sensors))
        );
    }
}
