//! YAML configuration files
//!
//! ```yaml
//! version: 1
//! preset: fast
//! pdg:
//!   include_name: true
//!   solver:
//!     max_iterations: 500
//! ```

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::stage_configs::{PdgConfig, SolverConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Versioned configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFileV1 {
    pub version: Option<u32>,

    #[serde(default)]
    pub preset: Option<String>,

    #[serde(default)]
    pub pdg: Option<PdgConfigPatch>,
}

/// Partial override of `PdgConfig`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PdgConfigPatch {
    pub include_control: Option<bool>,
    pub include_data: Option<bool>,
    pub include_name: Option<bool>,
    pub include_call: Option<bool>,
    pub emit_exit_edge: Option<bool>,
    pub max_elements: Option<usize>,
    pub solver: Option<SolverConfigPatch>,
}

/// Partial override of `SolverConfig`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverConfigPatch {
    pub max_iterations: Option<usize>,
    pub widening_threshold: Option<usize>,
}

impl PdgConfigPatch {
    pub fn apply(&self, mut config: PdgConfig) -> PdgConfig {
        if let Some(v) = self.include_control {
            config.include_control = v;
        }
        if let Some(v) = self.include_data {
            config.include_data = v;
        }
        if let Some(v) = self.include_name {
            config.include_name = v;
        }
        if let Some(v) = self.include_call {
            config.include_call = v;
        }
        if let Some(v) = self.emit_exit_edge {
            config.emit_exit_edge = v;
        }
        if let Some(v) = self.max_elements {
            config.max_elements = v;
        }
        if let Some(solver) = &self.solver {
            config.solver = solver.apply(config.solver);
        }
        config
    }
}

impl SolverConfigPatch {
    pub fn apply(&self, mut config: SolverConfig) -> SolverConfig {
        if let Some(v) = self.max_iterations {
            config.max_iterations = v;
        }
        if self.widening_threshold.is_some() {
            config.widening_threshold = self.widening_threshold;
        }
        config
    }
}

impl PdgConfig {
    /// Parse and validate a YAML configuration document
    pub fn from_yaml_str(content: &str) -> ConfigResult<PdgConfig> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match &file.preset {
            Some(name) => {
                Preset::from_str(name).map_err(|_| ConfigError::UnknownPreset(name.clone()))?
            }
            None => Preset::default(),
        };

        let mut config = PdgConfig::from_preset(preset);
        if let Some(patch) = &file.pdg {
            config = patch.apply(config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML configuration file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<PdgConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}
