//! hostplane.toml configuration parser.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::GroupVersion;

/// Port the managed API server listens on when the fleet record sets none.
pub const DEFAULT_API_SERVER_PORT: i32 = 6443;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HostplaneConfig {
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub control_plane: ControlPlaneConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DiscoveryConfig {
    #[serde(default)]
    pub fallback: FallbackPolicy,
    /// Optional API groups whose presence gates optional integrations.
    #[serde(default)]
    pub optional_groups: Vec<String>,
}

/// How the capability probe treats partial discovery failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Assume registered unless the failure explicitly excludes the group.
    #[default]
    Optimistic,
    /// Only trust groups that were listed or reported as failing.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPlaneConfig {
    #[serde(default = "default_api_port")]
    pub default_api_port: i32,
}

impl Default for ControlPlaneConfig {
    fn default() -> Self {
        Self {
            default_api_port: DEFAULT_API_SERVER_PORT,
        }
    }
}

fn default_api_port() -> i32 {
    DEFAULT_API_SERVER_PORT
}

impl HostplaneConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: HostplaneConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.optional_group_versions()?;
        let port = self.control_plane.default_api_port;
        if !(1..=65535).contains(&port) {
            return Err(ConfigError::InvalidApiPort(port));
        }
        Ok(())
    }

    /// Parsed `discovery.optional_groups`.
    pub fn optional_group_versions(&self) -> Result<Vec<GroupVersion>, ConfigError> {
        self.discovery
            .optional_groups
            .iter()
            .map(|s| s.parse())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = HostplaneConfig::from_toml_str("").unwrap();
        assert_eq!(config.discovery.fallback, FallbackPolicy::Optimistic);
        assert!(config.discovery.optional_groups.is_empty());
        assert_eq!(config.control_plane.default_api_port, 6443);
    }

    #[test]
    fn test_parse_full() {
        let toml_str = r#"
[discovery]
fallback = "strict"
optional_groups = ["route.openshift.io/v1", "image.openshift.io/v1"]

[control_plane]
default_api_port = 7443
"#;
        let config = HostplaneConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.discovery.fallback, FallbackPolicy::Strict);
        assert_eq!(config.control_plane.default_api_port, 7443);
        let groups = config.optional_group_versions().unwrap();
        assert_eq!(groups[0], GroupVersion::new("route.openshift.io", "v1"));
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_rejects_bad_group() {
        let err = HostplaneConfig::from_toml_str(
            r#"
[discovery]
optional_groups = ["route.openshift.io/"]
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("route.openshift.io/"));
    }

    #[test]
    fn test_rejects_bad_port() {
        let err = HostplaneConfig::from_toml_str("[control_plane]\ndefault_api_port = 0\n")
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::InvalidApiPort(0))
        );
    }

    #[test]
    fn test_toml_roundtrip_and_file() {
        let mut config = HostplaneConfig::default();
        config.discovery.optional_groups.push("route.openshift.io/v1".to_string());
        let text = config.to_toml_string().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hostplane.toml");
        std::fs::write(&path, text).unwrap();
        let loaded = HostplaneConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
