//! Control-flow graph input model
//!
//! Blocks typed REGULAR / CONDITIONAL / SPECIAL / EXCEPTION, each with its
//! ordered node list and successors, as produced by the external CFG builder.

pub mod domain;
pub mod infrastructure;

pub use domain::{
    BasicBlock, BlockId, BlockKind, CfgNode, CfgNodeId, CfgNodeKind, ControlFlowGraph,
    SpecialBlockKind,
};
pub use infrastructure::{ControlFlowGraphBuilder, ControlFlowGraphDto};
