mod cfg;

pub use cfg::{
    BasicBlock, BlockId, BlockKind, CfgNode, CfgNodeId, CfgNodeKind, ControlFlowGraph,
    SpecialBlockKind,
};
