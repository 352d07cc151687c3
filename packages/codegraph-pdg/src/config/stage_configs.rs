//! Stage-specific configuration types
//!
//! `PdgConfig` selects which edge builders run; `SolverConfig` bounds the
//! reference fixpoint solver used by both dataflow passes.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::Validatable;
use serde::{Deserialize, Serialize};

// ============================================================================
// Solver Configuration
// ============================================================================

/// Fixpoint solver budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum block visits before giving up (1..=1000000)
    pub max_iterations: usize,

    /// Ask the store for a widened bound once a block has been revisited this
    /// many times. `None` never widens. Neither store of this crate supports
    /// widening, so setting this turns a slow convergence into a fatal error.
    pub widening_threshold: Option<usize>,
}

impl SolverConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_iterations == 0 || self.max_iterations > 1_000_000 {
            return Err(ConfigError::range_with_hint(
                "max_iterations",
                self.max_iterations,
                1,
                1_000_000,
                "Solver needs at least one pass",
            ));
        }

        if let Some(threshold) = self.widening_threshold {
            if threshold == 0 || threshold > self.max_iterations {
                return Err(ConfigError::range_with_hint(
                    "widening_threshold",
                    threshold,
                    1,
                    self.max_iterations,
                    "Widening threshold must not exceed max_iterations",
                ));
            }
        }
        Ok(())
    }

    /// Builder: Set max_iterations
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.max_iterations = v;
        self
    }

    /// Builder: Set widening_threshold
    pub fn widening_threshold(mut self, v: Option<usize>) -> Self {
        self.widening_threshold = v;
        self
    }

    /// Create from preset
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast | Preset::Balanced | Preset::Custom => Self {
                max_iterations: 10_000,
                widening_threshold: None,
            },
            Preset::Thorough => Self {
                max_iterations: 100_000,
                widening_threshold: None,
            },
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl Validatable for SolverConfig {
    fn validate(&self) -> ConfigResult<()> {
        SolverConfig::validate(self)
    }

    fn config_name(&self) -> &'static str {
        "SolverConfig"
    }
}

// ============================================================================
// PDG Configuration
// ============================================================================

/// PDG construction configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdgConfig {
    /// Emit CONTROL edges (default: true)
    pub include_control: bool,

    /// Run the use-def pass and emit DATA edges (default: true)
    pub include_data: bool,

    /// Run the name-flow pass and emit NAME edges (default: true)
    pub include_name: bool,

    /// Resolve local calls and emit CALL edges (default: true)
    pub include_call: bool,

    /// Emit the Exit → Entry EXIT edge (default: true)
    pub emit_exit_edge: bool,

    /// Maximum elements per procedure (1..=1000000)
    pub max_elements: usize,

    /// Fixpoint solver budget shared by both dataflow passes
    pub solver: SolverConfig,
}

impl PdgConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_elements == 0 || self.max_elements > 1_000_000 {
            return Err(ConfigError::range_with_hint(
                "max_elements",
                self.max_elements,
                1,
                1_000_000,
                "PDG element limit must be reasonable",
            ));
        }
        self.solver.validate()
    }

    /// Builder: Set include_control
    pub fn include_control(mut self, v: bool) -> Self {
        self.include_control = v;
        self
    }

    /// Builder: Set include_data
    pub fn include_data(mut self, v: bool) -> Self {
        self.include_data = v;
        self
    }

    /// Builder: Set include_name
    pub fn include_name(mut self, v: bool) -> Self {
        self.include_name = v;
        self
    }

    /// Builder: Set include_call
    pub fn include_call(mut self, v: bool) -> Self {
        self.include_call = v;
        self
    }

    /// Builder: Set emit_exit_edge
    pub fn emit_exit_edge(mut self, v: bool) -> Self {
        self.emit_exit_edge = v;
        self
    }

    /// Builder: Set max_elements
    pub fn max_elements(mut self, v: usize) -> Self {
        self.max_elements = v;
        self
    }

    /// Builder: Set solver configuration
    pub fn solver(mut self, v: SolverConfig) -> Self {
        self.solver = v;
        self
    }

    /// Create from preset
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                include_control: true,
                include_data: true,
                include_name: false,
                include_call: true,
                emit_exit_edge: true,
                max_elements: 10_000,
                solver: SolverConfig::from_preset(preset),
            },
            Preset::Balanced | Preset::Custom => Self {
                include_control: true,
                include_data: true,
                include_name: true,
                include_call: true,
                emit_exit_edge: true,
                max_elements: 100_000,
                solver: SolverConfig::from_preset(preset),
            },
            Preset::Thorough => Self {
                include_control: true,
                include_data: true,
                include_name: true,
                include_call: true,
                emit_exit_edge: true,
                max_elements: 1_000_000,
                solver: SolverConfig::from_preset(preset),
            },
        }
    }
}

impl Default for PdgConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl Validatable for PdgConfig {
    fn validate(&self) -> ConfigResult<()> {
        PdgConfig::validate(self)
    }

    fn config_name(&self) -> &'static str {
        "PdgConfig"
    }
}
