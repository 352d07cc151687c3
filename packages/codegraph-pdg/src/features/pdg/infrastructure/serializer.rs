//! `PdgSerializer` adapters

use super::pdg::FilePdg;
use crate::errors::Result;
use crate::features::pdg::ports::{OutputFormat, PdgSerializer};

#[derive(Debug, Clone, Copy, Default)]
pub struct DotSerializer;

impl PdgSerializer for DotSerializer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Dot
    }

    fn serialize(&self, pdg: &FilePdg) -> Result<String> {
        Ok(pdg.to_dot())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl PdgSerializer for JsonSerializer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn serialize(&self, pdg: &FilePdg) -> Result<String> {
        pdg.to_json()
    }
}

pub fn serializer_for(format: OutputFormat) -> Box<dyn PdgSerializer> {
    match format {
        OutputFormat::Dot => Box::new(DotSerializer),
        OutputFormat::Json => Box::new(JsonSerializer),
    }
}
