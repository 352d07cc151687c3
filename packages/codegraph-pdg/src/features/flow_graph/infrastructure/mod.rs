//! CFG construction and serde support

mod builder;

pub use builder::{ControlFlowGraphBuilder, ControlFlowGraphDto};
