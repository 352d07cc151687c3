//! PDG Ports - Interface Layer (Hexagonal Architecture)
//!
//! Output side of the pipeline: a finished `FilePdg` rendered to text.

use crate::errors::Result;
use crate::features::pdg::infrastructure::FilePdg;
use serde::{Deserialize, Serialize};

/// Textual output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Graphviz document, one cluster per procedure
    #[default]
    Dot,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Dot => "dot",
            OutputFormat::Json => "json",
        }
    }
}

/// PDG Serializer Port
///
/// Output must be identical for identical input.
pub trait PdgSerializer: Send + Sync {
    fn format(&self) -> OutputFormat;

    fn serialize(&self, pdg: &FilePdg) -> Result<String>;
}
