//! Hooks between an analysis and the fixpoint solver

use crate::features::data_flow::domain::{AbstractStore, AnalysisResult};
use crate::features::data_flow::infrastructure::errors::DataflowResult;
use crate::features::flow_graph::{CfgNode, ControlFlowGraph};

/// Per-analysis transfer rule
pub trait ForwardTransfer {
    type Store: AbstractStore;

    /// Store flowing into the entry block
    fn initial_store(&self, cfg: &ControlFlowGraph) -> Self::Store;

    /// Apply one node's effect in place
    fn transfer(&self, cfg: &ControlFlowGraph, node: &CfgNode, store: &mut Self::Store);
}

/// Iterates a transfer rule over a CFG until stores stabilize
pub trait FixpointSolver: Send + Sync {
    fn solve<T: ForwardTransfer>(
        &self,
        cfg: &ControlFlowGraph,
        transfer: &T,
    ) -> DataflowResult<AnalysisResult<T::Store>>;
}
