//! PDG Application Layer
//!
//! Main entry point: `PdgExtractor::extract()` on a `CompilationUnit`.

mod build_pdg;

pub use build_pdg::{CompilationUnit, PdgExtractor, ProcedureSource};
