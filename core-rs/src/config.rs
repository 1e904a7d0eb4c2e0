/**
 * config.rs
 * Parser for .portscout.yaml files
 *
 * Format:
 * ```yaml
 * preferredPort: 8080
 * autoSwitch: true
 * switchWindow: 50
 * ```
 *
 * `autoSwitch` and `switchWindow` are optional.
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::{PortscoutError, Result};
use crate::port::{Resolver, SWITCH_WINDOW};

/// Config file name looked up in a directory
pub const CONFIG_FILE_NAME: &str = ".portscout.yaml";

fn default_auto_switch() -> bool {
    true
}

fn default_switch_window() -> u16 {
    SWITCH_WINDOW
}

/// .portscout.yaml file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolveConfig {
    pub preferred_port: u16,
    #[serde(default = "default_auto_switch")]
    pub auto_switch: bool,
    #[serde(default = "default_switch_window")]
    pub switch_window: u16,
}

impl ResolveConfig {
    pub fn new(preferred_port: u16) -> Self {
        ResolveConfig {
            preferred_port,
            auto_switch: default_auto_switch(),
            switch_window: default_switch_window(),
        }
    }

    /// Load and validate a config file
    ///
    /// # Errors
    /// - `FileNotFound` if the path does not exist
    /// - `Yaml` if the content is not valid YAML for this structure
    /// - `Config` if validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PortscoutError::FileNotFound(path.to_string_lossy().to_string()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load `.portscout.yaml` from a directory
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Self::load(dir.as_ref().join(CONFIG_FILE_NAME))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ResolveConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.switch_window == 0 {
            return Err(PortscoutError::Config("switchWindow must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Resolver using this config's switch window
    pub fn resolver(&self) -> Resolver {
        Resolver::with_switch_window(self.switch_window)
    }
}
