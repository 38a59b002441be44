use serde::{Deserialize, Serialize};

use crate::defense::DEFAULT_OUT_DEGREE_THRESHOLD;
use crate::metrics::EnergyRange;
use crate::topology::{NodeId, TopologyParams, WeightRange, BASE_STATION_ID};

/// Simulation configuration mirroring the YAML file.
///
/// Every section is optional; defaults reproduce the reference scenario of
/// ten sensors with two peers each.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub general: GeneralConfig,
    pub network: NetworkConfig,
    pub attack: AttackConfig,
    pub defense: DefenseConfig,
    pub metrics: MetricsConfig,
}

impl SimulationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(level) = &self.general.log_level {
            if level.parse::<log::LevelFilter>().is_err() {
                return Err(ValidationError::InvalidGeneral(format!(
                    "unknown log_level '{}'",
                    level
                )));
            }
        }

        let network = &self.network;
        if network.sensors == 0 {
            return Err(ValidationError::InvalidNetwork(
                "sensors must be at least 1".to_string(),
            ));
        }
        if NodeId::try_from(network.sensors).is_err() {
            return Err(ValidationError::InvalidNetwork(format!(
                "sensors must not exceed {}",
                NodeId::MAX
            )));
        }
        if network.peers_per_sensor == 0 {
            return Err(ValidationError::InvalidNetwork(
                "peers_per_sensor must be at least 1".to_string(),
            ));
        }
        Self::validate_weight_range("peer_weight", &network.peer_weight)?;
        Self::validate_weight_range("base_weight", &network.base_weight)?;

        if let Some(attacker) = self.attack.attacker {
            if attacker == BASE_STATION_ID || attacker as usize > network.sensors {
                return Err(ValidationError::InvalidAttack(format!(
                    "attacker {} must be a sensor id in 1..={}",
                    attacker, network.sensors
                )));
            }
        }

        if !self.metrics.energy_per_node.is_valid() {
            return Err(ValidationError::InvalidMetrics(format!(
                "energy_per_node range [{}, {}] must be finite, non-negative and ordered",
                self.metrics.energy_per_node.min, self.metrics.energy_per_node.max
            )));
        }

        Ok(())
    }

    fn validate_weight_range(name: &str, range: &WeightRange) -> Result<(), ValidationError> {
        if !range.is_valid() {
            return Err(ValidationError::InvalidNetwork(format!(
                "{} range [{}, {}] needs a positive minimum not above the maximum",
                name, range.min, range.max
            )));
        }
        Ok(())
    }

    /// Builder parameters for the configured network
    pub fn topology_params(&self) -> TopologyParams {
        TopologyParams {
            sensors: self.network.sensors,
            peers_per_sensor: self.network.peers_per_sensor,
            peer_weight: self.network.peer_weight,
            base_weight: self.network.base_weight,
        }
    }
}

/// General run settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Seed of the run. Drawn from entropy when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Sensor network shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub sensors: usize,
    pub peers_per_sensor: usize,
    pub peer_weight: WeightRange,
    pub base_weight: WeightRange,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let params = TopologyParams::default();
        Self {
            sensors: params.sensors,
            peers_per_sensor: params.peers_per_sensor,
            peer_weight: params.peer_weight,
            base_weight: params.base_weight,
        }
    }
}

/// Sinkhole attack settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackConfig {
    /// Compromised sensor. A random sensor is chosen when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attacker: Option<NodeId>,
}

/// Intrusion detection and mitigation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenseConfig {
    /// Out-degree above which the IDS flags a sensor
    pub ids_threshold: usize,
    /// Run the secure routing pass after detection
    pub secure_routing: bool,
}

impl Default for DefenseConfig {
    fn default() -> Self {
        Self {
            ids_threshold: DEFAULT_OUT_DEGREE_THRESHOLD,
            secure_routing: true,
        }
    }
}

/// Auxiliary metric settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub energy_per_node: EnergyRange,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid network configuration: {0}")]
    InvalidNetwork(String),
    #[error("Invalid attack configuration: {0}")]
    InvalidAttack(String),
    #[error("Invalid metrics configuration: {0}")]
    InvalidMetrics(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let yaml = r#"
general:
  seed: 42
  log_level: debug
network:
  sensors: 12
  peers_per_sensor: 3
  peer_weight: { min: 2, max: 8 }
  base_weight: { min: 6, max: 12 }
attack:
  attacker: 5
defense:
  ids_threshold: 4
  secure_routing: false
metrics:
  energy_per_node: { min: 0.1, max: 1.0 }
"#;

        let config: SimulationConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.general.seed, Some(42));
        assert_eq!(config.network.sensors, 12);
        assert_eq!(config.network.peer_weight, WeightRange::new(2, 8));
        assert_eq!(config.attack.attacker, Some(5));
        assert_eq!(config.defense.ids_threshold, 4);
        assert!(!config.defense.secure_routing);
        assert_eq!(config.metrics.energy_per_node, EnergyRange::new(0.1, 1.0));
    }

    #[test]
    fn test_empty_config_uses_reference_scenario() {
        let config: SimulationConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.topology_params(), TopologyParams::default());
        assert_eq!(config.defense.ids_threshold, 10);
        assert!(config.defense.secure_routing);
        assert_eq!(config.attack.attacker, None);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let yaml = r#"
network:
  sensors: 20
"#;
        let config: SimulationConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.network.sensors, 20);
        assert_eq!(config.network.peers_per_sensor, 2);
        assert_eq!(config.network.base_weight, WeightRange::new(5, 15));
    }

    #[test]
    fn test_validation_errors() {
        let mut config = SimulationConfig::default();
        config.network.sensors = 0;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidNetwork(_))));

        #[cfg(target_pointer_width = "64")]
        {
            let mut config = SimulationConfig::default();
            config.network.sensors = NodeId::MAX as usize + 1;
            assert!(matches!(config.validate(), Err(ValidationError::InvalidNetwork(_))));
        }

        let mut config = SimulationConfig::default();
        config.network.peer_weight = WeightRange::new(0, 4);
        assert!(matches!(config.validate(), Err(ValidationError::InvalidNetwork(_))));

        let mut config = SimulationConfig::default();
        config.network.base_weight = WeightRange::new(9, 3);
        assert!(matches!(config.validate(), Err(ValidationError::InvalidNetwork(_))));

        let mut config = SimulationConfig::default();
        config.attack.attacker = Some(0);
        assert!(matches!(config.validate(), Err(ValidationError::InvalidAttack(_))));

        let mut config = SimulationConfig::default();
        config.attack.attacker = Some(11);
        assert!(matches!(config.validate(), Err(ValidationError::InvalidAttack(_))));

        let mut config = SimulationConfig::default();
        config.metrics.energy_per_node = EnergyRange::new(3.0, 1.0);
        assert!(matches!(config.validate(), Err(ValidationError::InvalidMetrics(_))));

        let mut config = SimulationConfig::default();
        config.general.log_level = Some("chatty".to_string());
        assert!(matches!(config.validate(), Err(ValidationError::InvalidGeneral(_))));
    }

    #[test]
    fn test_malformed_field_rejected() {
        let yaml = r#"
network:
  sensors: "many"
"#;
        assert!(serde_yaml::from_str::<SimulationConfig>(yaml).is_err());
    }
}
