use crate::config::GeneratorConfig;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse a generator configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<GeneratorConfig> {
    info!("Loading generator configuration from: {:?}", config_path);

    // Open the configuration file
    let file = File::open(config_path)?;

    // Parse the YAML content
    let config: GeneratorConfig = serde_yaml::from_reader(file)?;

    // Validate the configuration
    config.validate()?;

    info!(
        "Loaded generator '{}' ({} cores, {} interfaces)",
        config.name,
        config.cores,
        config.pcis.len()
    );

    Ok(config)
}

/// CLI arguments that can override settings from the configuration file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub cores: Option<u32>,
    pub software_mode: Option<bool>,
}

/// Apply CLI overrides to a loaded generator configuration
pub fn apply_overrides(config: &mut GeneratorConfig, overrides: &CliOverrides) -> Result<()> {
    if let Some(cores) = overrides.cores {
        info!("Overriding cores: {} -> {}", config.cores, cores);
        config.cores = cores;
    }

    if let Some(software_mode) = overrides.software_mode {
        info!("Overriding software_mode: {}", software_mode);
        config.software_mode = software_mode;
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
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
name: "trex01"
cores: 4
pcis:
  - "0000:00:04.0"
zmq_pub_port: 4500
zmq_rpc_port: 4501
limit_memory: 1024
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.name, "trex01");
        assert_eq!(config.pcis, vec!["0000:00:04.0"]);
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
name: "trex01"
cores: 0
pcis: []
zmq_pub_port: 4500
zmq_rpc_port: 4501
limit_memory: 1024
"#
        )
        .unwrap();

        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
name: "trex01"
cores: 4
pcis: []
zmq_pub_port: 4500
zmq_rpc_port: 4501
limit_memory: 1024
"#
        )
        .unwrap();

        let mut config = load_config(file.path()).unwrap();
        let overrides = CliOverrides {
            cores: Some(8),
            software_mode: Some(true),
        };
        apply_overrides(&mut config, &overrides).unwrap();

        assert_eq!(config.cores, 8);
        assert!(config.software_mode);
    }

    #[test]
    fn test_apply_overrides_revalidates() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
name: "trex01"
cores: 4
pcis: []
zmq_pub_port: 4500
zmq_rpc_port: 4501
limit_memory: 1024
"#
        )
        .unwrap();

        let mut config = load_config(file.path()).unwrap();
        let overrides = CliOverrides {
            cores: Some(0),
            software_mode: None,
        };
        assert!(apply_overrides(&mut config, &overrides).is_err());
    }
}
