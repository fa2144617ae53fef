//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::FabricConfig;
use std::path::Path;

/// The stream-port side names accepted in `fabric.stream_ports`.
const VALID_SIDES: &[&str] = &[
    "left",
    "right",
    "top",
    "bottom",
    "horizontal",
    "vertical",
    "all",
];

/// Loads and validates a fabric configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<FabricConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a fabric configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<FabricConfig, ConfigError> {
    let config: FabricConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are consistent.
fn validate_config(config: &FabricConfig) -> Result<(), ConfigError> {
    if config.fabric.rows == 0 {
        return Err(ConfigError::ValidationError(
            "fabric.rows must be at least 1".to_string(),
        ));
    }
    if config.fabric.cols == 0 {
        return Err(ConfigError::ValidationError(
            "fabric.cols must be at least 1".to_string(),
        ));
    }
    if config.pe.output_registers == 0 {
        return Err(ConfigError::ValidationError(
            "pe.output_registers must be at least 1".to_string(),
        ));
    }
    if config.memory.data_width == 0 {
        return Err(ConfigError::ValidationError(
            "memory.data_width must be at least 1".to_string(),
        ));
    }
    for side in &config.fabric.stream_ports {
        if !VALID_SIDES.contains(&side.as_str()) {
            return Err(ConfigError::UnknownSide(side.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InterconnectPattern;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[fabric]
rows = 2
cols = 3
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.fabric.rows, 2);
        assert_eq!(config.fabric.cols, 3);
        assert_eq!(config.fabric.latency, 1);
        assert_eq!(config.fabric.pattern, InterconnectPattern::Standard);
        assert!(!config.fabric.bidirectional);
        assert!(config.fabric.stream_ports.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[fabric]
rows = 4
cols = 4
latency = 2
pattern = "diagonals"
bidirectional = true
stream_ports = ["all"]
merge_ios = true

[pe]
operations = ["ADD", "SUB", "MUL", "ASHR"]
register_file_size = 4
output_registers = 2
constant_units = 1
pipeline_stages = 2
rf_read_ports_fu = 1
rf_read_ports_output = 2

[memory]
load_bandwidth = 64
store_bandwidth = 32
data_width = 8
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.fabric.pattern, InterconnectPattern::Diagonals);
        assert!(config.fabric.bidirectional);
        assert!(config.fabric.merge_ios);
        assert_eq!(config.pe.operations.len(), 4);
        assert_eq!(config.pe.register_file_size, 4);
        assert_eq!(config.memory.store_bandwidth, 32);
        assert_eq!(config.memory.data_width, 8);
    }

    #[test]
    fn zero_rows_rejected() {
        let toml = r#"
[fabric]
rows = 0
cols = 3
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_output_registers_rejected() {
        let toml = r#"
[fabric]
rows = 2
cols = 2

[pe]
output_registers = 0
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn unknown_side_rejected() {
        let toml = r#"
[fabric]
rows = 2
cols = 2
stream_ports = ["middle"]
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSide(s) if s == "middle"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = load_config_from_str("fabric = [").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
