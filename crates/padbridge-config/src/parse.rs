use serde::Deserialize;

use crate::{v1::ConfigV1, Config, ConfigError};

/// Parse a yaml config.
pub fn parse_config(input: &str) -> Result<Config, ConfigError> {
    let version = parse_version(input)?;
    match version {
        1 => {
            let config: ConfigV1 = serde_yaml::from_str(input)?;
            config.to_config()
        }
        _ => Err(ConfigError::UnsupportedVersion(version)),
    }
}

#[derive(Debug, Clone, Deserialize)]
struct VersionedConfig {
    version: u8,
}

fn parse_version(input: &str) -> Result<u8, ConfigError> {
    let raw: VersionedConfig = serde_yaml::from_str(input)?;
    Ok(raw.version)
}
