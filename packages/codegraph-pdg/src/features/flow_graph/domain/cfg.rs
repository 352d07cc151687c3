//! Control-flow graph handed over by the front end
//!
//! Blocks own ordered low-level nodes; conditional blocks own none. Formal
//! parameters are nodes that belong to no block.

use crate::features::syntax::SyntaxId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CfgNodeId(pub u32);

impl CfgNodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CfgNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u32);

impl BlockId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Nodes
// ═══════════════════════════════════════════════════════════════════════════

/// Low-level node kinds the dataflow passes distinguish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CfgNodeKind {
    VariableDeclaration {
        name: String,
    },
    LocalVariable {
        name: String,
    },
    Assignment {
        target: CfgNodeId,
        expression: CfgNodeId,
    },
    Literal {
        value: String,
    },
    Unary {
        operand: CfgNodeId,
    },
    Binary {
        lhs: CfgNodeId,
        rhs: CfgNodeId,
    },
    Ternary {
        condition: CfgNodeId,
        then_operand: CfgNodeId,
        else_operand: CfgNodeId,
    },
    Cast {
        operand: CfgNodeId,
    },
    InstanceOf {
        operand: CfgNodeId,
    },
    MethodInvocation {
        name: String,
        #[serde(default)]
        receiver: Option<CfgNodeId>,
        arguments: Vec<CfgNodeId>,
    },
    ObjectCreation {
        class: String,
        arguments: Vec<CfgNodeId>,
    },
    FieldAccess {
        receiver: CfgNodeId,
        field: String,
    },
    ArrayAccess {
        array: CfgNodeId,
        index: CfgNodeId,
    },
    Return {
        #[serde(default)]
        result: Option<CfgNodeId>,
    },
    Throw {
        exception: CfgNodeId,
    },
    /// Anything the passes treat as opaque
    Other {
        label: String,
        #[serde(default)]
        operands: Vec<CfgNodeId>,
    },
}

impl CfgNodeKind {
    /// Direct operands, in evaluation order
    pub fn operands(&self) -> Vec<CfgNodeId> {
        use CfgNodeKind::*;
        match self {
            VariableDeclaration { .. } | LocalVariable { .. } | Literal { .. } => Vec::new(),
            Assignment { target, expression } => vec![*target, *expression],
            Unary { operand } | Cast { operand } | InstanceOf { operand } => vec![*operand],
            Binary { lhs, rhs } => vec![*lhs, *rhs],
            Ternary {
                condition,
                then_operand,
                else_operand,
            } => vec![*condition, *then_operand, *else_operand],
            MethodInvocation {
                receiver,
                arguments,
                ..
            } => receiver.iter().chain(arguments.iter()).copied().collect(),
            ObjectCreation { arguments, .. } => arguments.clone(),
            FieldAccess { receiver, .. } => vec![*receiver],
            ArrayAccess { array, index } => vec![*array, *index],
            Return { result } => result.iter().copied().collect(),
            Throw { exception } => vec![*exception],
            Other { operands, .. } => operands.clone(),
        }
    }

    pub fn local_variable_name(&self) -> Option<&str> {
        match self {
            CfgNodeKind::LocalVariable { name } => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfgNode {
    pub id: CfgNodeId,
    #[serde(flatten)]
    pub kind: CfgNodeKind,
    /// Fragment the node was produced for; synthetic nodes have none
    #[serde(default)]
    pub syntax: Option<SyntaxId>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Blocks
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialBlockKind {
    Entry,
    Exit,
    ExceptionalExit,
}

impl SpecialBlockKind {
    pub const ALL: [SpecialBlockKind; 3] = [
        SpecialBlockKind::Entry,
        SpecialBlockKind::Exit,
        SpecialBlockKind::ExceptionalExit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialBlockKind::Entry => "Entry",
            SpecialBlockKind::Exit => "Exit",
            SpecialBlockKind::ExceptionalExit => "ExceptionalExit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    Regular {
        nodes: Vec<CfgNodeId>,
        #[serde(default)]
        successor: Option<BlockId>,
    },
    Conditional {
        then_successor: BlockId,
        else_successor: BlockId,
    },
    Special {
        kind: SpecialBlockKind,
        #[serde(default)]
        successor: Option<BlockId>,
    },
    /// Single guarded node; `successor` absent when it always raises
    Exception {
        node: CfgNodeId,
        #[serde(default)]
        successor: Option<BlockId>,
        #[serde(default)]
        exceptional_successors: BTreeMap<String, BTreeSet<BlockId>>,
    },
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Regular { .. } => "REGULAR",
            BlockKind::Conditional { .. } => "CONDITIONAL",
            BlockKind::Special { .. } => "SPECIAL",
            BlockKind::Exception { .. } => "EXCEPTION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    #[serde(flatten)]
    pub kind: BlockKind,
}

impl BasicBlock {
    /// Owned nodes in execution order
    pub fn nodes(&self) -> &[CfgNodeId] {
        match &self.kind {
            BlockKind::Regular { nodes, .. } => nodes,
            BlockKind::Exception { node, .. } => std::slice::from_ref(node),
            BlockKind::Conditional { .. } | BlockKind::Special { .. } => &[],
        }
    }

    /// All successors, normal first, then exceptional in type order
    pub fn successors(&self) -> Vec<BlockId> {
        self.labeled_successors()
            .into_iter()
            .map(|(block, _)| block)
            .collect()
    }

    /// Successors with the label of the edge leading there
    ///
    /// Conditional branches are labelled `true`/`false`, exceptional edges by
    /// exception type, plain fall-through edges carry no label.
    pub fn labeled_successors(&self) -> Vec<(BlockId, Option<String>)> {
        match &self.kind {
            BlockKind::Regular { successor, .. } | BlockKind::Special { successor, .. } => {
                successor.iter().map(|s| (*s, None)).collect()
            }
            BlockKind::Conditional {
                then_successor,
                else_successor,
            } => vec![
                (*then_successor, Some("true".to_string())),
                (*else_successor, Some("false".to_string())),
            ],
            BlockKind::Exception {
                successor,
                exceptional_successors,
                ..
            } => {
                let mut out: Vec<(BlockId, Option<String>)> =
                    successor.iter().map(|s| (*s, None)).collect();
                for (exception, targets) in exceptional_successors {
                    out.extend(targets.iter().map(|t| (*t, Some(exception.clone()))));
                }
                out
            }
        }
    }

    pub fn special_kind(&self) -> Option<SpecialBlockKind> {
        match &self.kind {
            BlockKind::Special { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self.kind, BlockKind::Conditional { .. })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Graph
// ═══════════════════════════════════════════════════════════════════════════

/// One procedure's control-flow graph plus derived lookups
///
/// Construct through `ControlFlowGraphBuilder` or deserialize; both paths
/// validate and fill the derived indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    try_from = "crate::features::flow_graph::infrastructure::ControlFlowGraphDto",
    into = "crate::features::flow_graph::infrastructure::ControlFlowGraphDto"
)]
pub struct ControlFlowGraph {
    pub(crate) nodes: Vec<CfgNode>,
    pub(crate) blocks: Vec<BasicBlock>,
    pub(crate) parameters: Vec<CfgNodeId>,
    pub(crate) postfix: BTreeMap<SyntaxId, Vec<CfgNodeId>>,

    pub(crate) predecessors: Vec<BTreeSet<BlockId>>,
    pub(crate) owner: FxHashMap<CfgNodeId, BlockId>,
    pub(crate) by_tree: FxHashMap<SyntaxId, Vec<CfgNodeId>>,
}

impl PartialEq for ControlFlowGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
            && self.blocks == other.blocks
            && self.parameters == other.parameters
            && self.postfix == other.postfix
    }
}

impl Eq for ControlFlowGraph {}

impl ControlFlowGraph {
    pub fn node(&self, id: CfgNodeId) -> Option<&CfgNode> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> &[CfgNode] {
        &self.nodes
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.index())
    }

    /// Blocks in id order
    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    /// Formal parameter nodes in declaration order
    pub fn parameters(&self) -> &[CfgNodeId] {
        &self.parameters
    }

    pub fn predecessors(&self, block: BlockId) -> impl Iterator<Item = BlockId> + '_ {
        self.predecessors
            .get(block.index())
            .into_iter()
            .flat_map(|preds| preds.iter().copied())
    }

    pub fn predecessor_count(&self, block: BlockId) -> usize {
        self.predecessors
            .get(block.index())
            .map_or(0, BTreeSet::len)
    }

    /// Block owning `node`; `None` for parameters and operand-only nodes
    pub fn owning_block(&self, node: CfgNodeId) -> Option<BlockId> {
        self.owner.get(&node).copied()
    }

    /// Nodes the front end produced for a fragment
    pub fn nodes_for_tree(&self, tree: SyntaxId) -> &[CfgNodeId] {
        self.by_tree.get(&tree).map_or(&[], Vec::as_slice)
    }

    /// Extra nodes of a postfix/compound rewrite of `tree`
    pub fn postfix_nodes(&self, tree: SyntaxId) -> &[CfgNodeId] {
        self.postfix.get(&tree).map_or(&[], Vec::as_slice)
    }

    /// Special blocks of `kind`, in id order
    pub fn special_blocks(&self, kind: SpecialBlockKind) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks
            .iter()
            .filter(move |b| b.special_kind() == Some(kind))
            .map(|b| b.id)
    }

    /// Last-registered special block of `kind`
    pub fn special_block(&self, kind: SpecialBlockKind) -> Option<BlockId> {
        self.special_blocks(kind).last()
    }

    pub fn entry_block(&self) -> Option<BlockId> {
        self.special_block(SpecialBlockKind::Entry)
    }

    pub fn regular_exit_block(&self) -> Option<BlockId> {
        self.special_block(SpecialBlockKind::Exit)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}
