//! CLI configuration management.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Default workspace root for runs.
    #[serde(default = "default_workspace")]
    pub workspace: String,
    /// Checkout of the runtime source tree.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
    /// Command fetching the compiler toolchain into an instance workspace.
    #[serde(default = "default_toolchain_command")]
    pub toolchain_command: String,
    /// Environment variable consulted for hardware availability.
    #[serde(default = "default_hardware_var")]
    pub hardware_var: String,
}

fn default_workspace() -> String {
    ".crucible/work".to_string()
}

fn default_source_dir() -> String {
    ".".to_string()
}

fn default_toolchain_command() -> String {
    "./scripts/fetch-toolchain.sh".to_string()
}

fn default_hardware_var() -> String {
    "CRUCIBLE_HW_AVAILABLE".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            workspace: default_workspace(),
            source_dir: default_source_dir(),
            toolchain_command: default_toolchain_command(),
            hardware_var: default_hardware_var(),
        }
    }
}

impl CliConfig {
    /// Load configuration from file.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let dirs = directories::ProjectDirs::from("dev", "crucible-ci", "crucible")
            .ok_or("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.yaml"))
    }

    /// Set a configuration value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "workspace" => self.workspace = value.to_string(),
            "source_dir" => self.source_dir = value.to_string(),
            "toolchain_command" => self.toolchain_command = value.to_string(),
            "hardware_var" => self.hardware_var = value.to_string(),
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_known_keys() {
        let mut config = CliConfig::default();
        config.set("workspace", "/tmp/work").unwrap();
        config.set("toolchain_command", "true").unwrap();
        assert_eq!(config.workspace, "/tmp/work");
        assert_eq!(config.toolchain_command, "true");
    }

    #[test]
    fn test_set_unknown_key_is_rejected() {
        let mut config = CliConfig::default();
        assert!(config.set("api_url", "http://localhost").is_err());
    }
}
