//! Configuration for the Turntable core.
//!
//! Maps directly to `turntable.toml`. Every section and field is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::leveling::LevelCurve;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurntableConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Experience curve settings.
    #[serde(default)]
    pub progression: ProgressionConfig,
    /// Profile storage settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl TurntableConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `TurntableError::Config` if the TOML is invalid or the curve
    /// constant is out of range.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::TurntableError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Experience curve settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Curve constant `C`; must lie in `(0, 1]`.
    #[serde(default, rename = "curve_constant")]
    pub curve: LevelCurve,
    /// Highest level listed by the level table command.
    #[serde(default = "default_level_table_max")]
    pub level_table_max: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            curve: LevelCurve::default(),
            level_table_max: default_level_table_max(),
        }
    }
}

/// Profile storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Override for the application data directory. Uses the platform data
    /// directory when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Product folder created under the data directory.
    #[serde(default = "default_product")]
    pub product: String,
    /// Profile used when no name is given.
    #[serde(default = "default_profile_name")]
    pub default_profile: String,
    /// Save the active profile when its session ends.
    #[serde(default = "default_true")]
    pub save_on_shutdown: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            product: default_product(),
            default_profile: default_profile_name(),
            save_on_shutdown: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_level_table_max() -> u32 {
    99
}
fn default_product() -> String {
    "Turntable".to_string()
}
fn default_profile_name() -> String {
    "Default".to_string()
}
