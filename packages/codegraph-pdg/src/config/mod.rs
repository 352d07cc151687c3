//! PDG extraction configuration
//!
//! Two-tier configuration:
//! - Level 1: Preset - Simple one-liner
//! - Level 2: YAML overrides on top of a preset
//!
//! # Examples
//!
//! ```rust,ignore
//! use codegraph_pdg::config::{PdgConfig, Preset};
//!
//! // Level 1: Simple preset
//! let config = PdgConfig::from_preset(Preset::Fast);
//!
//! // Level 1b: Builder adjustment
//! let config = PdgConfig::from_preset(Preset::Balanced).include_name(false);
//!
//! // Level 2: YAML
//! let config = PdgConfig::from_yaml_file("pdg.yaml")?;
//! ```

pub mod error;
pub mod io;
pub mod preset;
pub mod stage_configs;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigFileV1, PdgConfigPatch, SolverConfigPatch};
pub use preset::Preset;
pub use stage_configs::{PdgConfig, SolverConfig};
pub use validation::Validatable;
