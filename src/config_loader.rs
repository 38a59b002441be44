use crate::config::SimulationConfig;
use crate::topology::NodeId;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load, parse and validate a simulation configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<SimulationConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: SimulationConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// Command-line values that take precedence over the configuration file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub sensors: Option<usize>,
    pub seed: Option<u64>,
    pub attacker: Option<NodeId>,
    pub ids_threshold: Option<usize>,
    pub disable_secure_routing: bool,
}

/// Apply CLI overrides to a configuration and re-validate it
pub fn apply_cli_overrides(config: &mut SimulationConfig, overrides: &CliOverrides) -> Result<()> {
    if let Some(sensors) = overrides.sensors {
        info!("Overriding sensor count: {}", sensors);
        config.network.sensors = sensors;
    }

    if let Some(seed) = overrides.seed {
        info!("Overriding seed: {}", seed);
        config.general.seed = Some(seed);
    }

    if let Some(attacker) = overrides.attacker {
        info!("Overriding attacker: {}", attacker);
        config.attack.attacker = Some(attacker);
    }

    if let Some(threshold) = overrides.ids_threshold {
        info!("Overriding IDS out-degree threshold: {}", threshold);
        config.defense.ids_threshold = threshold;
    }

    if overrides.disable_secure_routing {
        info!("Secure routing disabled from the command line");
        config.defense.secure_routing = false;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config() {
        let yaml = r#"
general:
  seed: 7
network:
  sensors: 15
attack:
  attacker: 3
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.general.seed, Some(7));
        assert_eq!(config.network.sensors, 15);
        assert_eq!(config.attack.attacker, Some(3));
    }

    #[test]
    fn test_load_invalid_config() {
        let yaml = r#"
network:
  sensors: 4
attack:
  attacker: 9
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_config(Path::new("/nonexistent/wsnsim.yaml")).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = SimulationConfig::default();
        let overrides = CliOverrides {
            sensors: Some(25),
            seed: Some(99),
            attacker: Some(20),
            ids_threshold: Some(2),
            disable_secure_routing: true,
        };

        apply_cli_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.network.sensors, 25);
        assert_eq!(config.general.seed, Some(99));
        assert_eq!(config.attack.attacker, Some(20));
        assert_eq!(config.defense.ids_threshold, 2);
        assert!(!config.defense.secure_routing);
    }

    #[test]
    fn test_overrides_are_revalidated() {
        let mut config = SimulationConfig::default();
        let overrides = CliOverrides {
            attacker: Some(40),
            ..CliOverrides::default()
        };
        assert!(apply_cli_overrides(&mut config, &overrides).is_err());
    }
}
