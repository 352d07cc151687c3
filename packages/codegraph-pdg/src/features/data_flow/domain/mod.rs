//! Dataflow lattices owned by this crate

mod name_flow;
mod store;
mod use_def;

pub use name_flow::{FormalRef, NameKind, NameRecord, NameStore};
pub use store::{AbstractStore, AnalysisResult, DataflowValue};
pub use use_def::{DataEdge, UseDefStore};
