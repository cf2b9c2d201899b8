//! broker.yml configuration parser.
//!
//! Supplies the three things the core needs at startup — provisioning
//! capacity, the state-file path, the listen port — plus the service
//! catalog document served verbatim on `/v2/catalog`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of instances that may be provisioned. Zero means none,
    /// negative disables the capacity check.
    pub capacity: i64,
    /// Location of the persisted state file.
    pub state_file: PathBuf,
    /// Port the broker API listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    pub catalog: Catalog,
}

fn default_listen_port() -> u16 {
    8080
}

/// Service catalog advertised to the platform. Opaque to the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bindable: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub plans: Vec<Plan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub free: bool,
}

impl Config {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to open config file {}: {e}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
capacity: 10
state_file: /var/lib/membroker/state.yml
catalog:
  services:
    - id: service-id
      name: memcached
      bindable: true
      plans:
        - id: plan-id
          name: small
          free: true
"#;

    #[test]
    fn parse_minimal() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.capacity, 10);
        assert_eq!(config.state_file, PathBuf::from("/var/lib/membroker/state.yml"));
        assert_eq!(config.listen_port, 8080);
        assert_eq!(config.catalog.services.len(), 1);
        assert_eq!(config.catalog.services[0].id, "service-id");
        assert_eq!(config.catalog.services[0].plans[0].name, "small");
    }

    #[test]
    fn listen_port_override() {
        let content = MINIMAL.replace("capacity: 10", "capacity: 10\nlisten_port: 9090");
        let config = Config::parse(&content).unwrap();
        assert_eq!(config.listen_port, 9090);
    }

    #[test]
    fn parse_rejects_invalid_yaml() {
        assert!(Config::parse("not-yaml").is_err());
    }

    #[test]
    fn from_file_missing_is_an_error() {
        let err = Config::from_file(Path::new("/nonexistent/broker.yml")).unwrap_err();
        assert!(err.to_string().contains("failed to open config file"));
    }
}
