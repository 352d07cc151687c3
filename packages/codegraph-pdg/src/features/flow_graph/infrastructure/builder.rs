/*
 * Control-flow graph construction and validation
 *
 * The core never builds CFGs from source; this builder exists so front ends
 * (and tests) can hand over a graph whose ids are guaranteed consistent.
 *
 * build() checks:
 * - every referenced node/block id exists
 * - every conditional block has both branches
 * - at least one Entry special block exists
 * - no node is owned by two blocks
 */

use crate::errors::{PdgError, Result};
use crate::features::flow_graph::domain::{
    BasicBlock, BlockId, BlockKind, CfgNode, CfgNodeId, CfgNodeKind, ControlFlowGraph,
    SpecialBlockKind,
};
use crate::features::syntax::SyntaxId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Placeholder for a branch not yet wired
const UNSET: BlockId = BlockId(u32::MAX);

/// Incremental CFG builder
///
/// `new()` pre-creates the three special blocks with ids 0 (Entry),
/// 1 (Exit) and 2 (ExceptionalExit).
#[derive(Debug, Clone)]
pub struct ControlFlowGraphBuilder {
    nodes: Vec<CfgNode>,
    blocks: Vec<BasicBlock>,
    parameters: Vec<CfgNodeId>,
    postfix: BTreeMap<SyntaxId, Vec<CfgNodeId>>,
}

impl ControlFlowGraphBuilder {
    pub const ENTRY: BlockId = BlockId(0);
    pub const EXIT: BlockId = BlockId(1);
    pub const EXCEPTIONAL_EXIT: BlockId = BlockId(2);

    pub fn new() -> Self {
        let mut builder = Self {
            nodes: Vec::new(),
            blocks: Vec::new(),
            parameters: Vec::new(),
            postfix: BTreeMap::new(),
        };
        for kind in SpecialBlockKind::ALL {
            builder.special_block(kind);
        }
        builder
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Nodes
    // ═══════════════════════════════════════════════════════════════════════

    pub fn add_node(&mut self, kind: CfgNodeKind, syntax: Option<SyntaxId>) -> CfgNodeId {
        let id = CfgNodeId(self.nodes.len() as u32);
        self.nodes.push(CfgNode { id, kind, syntax });
        id
    }

    /// Formal parameter: a declaration node owned by no block
    pub fn add_parameter(&mut self, name: impl Into<String>, syntax: Option<SyntaxId>) -> CfgNodeId {
        let id = self.add_node(CfgNodeKind::VariableDeclaration { name: name.into() }, syntax);
        self.parameters.push(id);
        id
    }

    /// Associate extra rewrite nodes with a postfix/compound fragment
    pub fn map_postfix(&mut self, tree: SyntaxId, node: CfgNodeId) {
        self.postfix.entry(tree).or_default().push(node);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Blocks
    // ═══════════════════════════════════════════════════════════════════════

    fn push_block(&mut self, kind: BlockKind) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(BasicBlock { id, kind });
        id
    }

    pub fn regular_block(&mut self, nodes: Vec<CfgNodeId>) -> BlockId {
        self.push_block(BlockKind::Regular {
            nodes,
            successor: None,
        })
    }

    /// Conditional block; wire both branches with `set_branches`
    pub fn conditional_block(&mut self) -> BlockId {
        self.push_block(BlockKind::Conditional {
            then_successor: UNSET,
            else_successor: UNSET,
        })
    }

    pub fn exception_block(&mut self, node: CfgNodeId) -> BlockId {
        self.push_block(BlockKind::Exception {
            node,
            successor: None,
            exceptional_successors: BTreeMap::new(),
        })
    }

    /// Additional special block (front ends occasionally emit more than one)
    pub fn special_block(&mut self, kind: SpecialBlockKind) -> BlockId {
        self.push_block(BlockKind::Special {
            kind,
            successor: None,
        })
    }

    /// Normal successor of a regular, special or exception block
    pub fn set_successor(&mut self, block: BlockId, next: BlockId) -> &mut Self {
        if let Some(b) = self.blocks.get_mut(block.index()) {
            match &mut b.kind {
                BlockKind::Regular { successor, .. }
                | BlockKind::Special { successor, .. }
                | BlockKind::Exception { successor, .. } => *successor = Some(next),
                BlockKind::Conditional { .. } => {}
            }
        }
        self
    }

    pub fn set_branches(&mut self, block: BlockId, then_block: BlockId, else_block: BlockId) -> &mut Self {
        if let Some(BasicBlock {
            kind:
                BlockKind::Conditional {
                    then_successor,
                    else_successor,
                },
            ..
        }) = self.blocks.get_mut(block.index())
        {
            *then_successor = then_block;
            *else_successor = else_block;
        }
        self
    }

    pub fn add_exceptional_successor(
        &mut self,
        block: BlockId,
        exception: impl Into<String>,
        target: BlockId,
    ) -> &mut Self {
        if let Some(BasicBlock {
            kind: BlockKind::Exception {
                exceptional_successors,
                ..
            },
            ..
        }) = self.blocks.get_mut(block.index())
        {
            exceptional_successors
                .entry(exception.into())
                .or_default()
                .insert(target);
        }
        self
    }

    /// Append nodes to a regular block
    pub fn push_nodes(&mut self, block: BlockId, extra: impl IntoIterator<Item = CfgNodeId>) -> &mut Self {
        if let Some(BasicBlock {
            kind: BlockKind::Regular { nodes, .. },
            ..
        }) = self.blocks.get_mut(block.index())
        {
            nodes.extend(extra);
        }
        self
    }

    pub fn build(self) -> Result<ControlFlowGraph> {
        ControlFlowGraph::from_parts(self.nodes, self.blocks, self.parameters, self.postfix)
    }
}

impl ControlFlowGraph {
    /// Validate raw parts and derive the lookup indices
    pub fn from_parts(
        nodes: Vec<CfgNode>,
        blocks: Vec<BasicBlock>,
        parameters: Vec<CfgNodeId>,
        postfix: BTreeMap<SyntaxId, Vec<CfgNodeId>>,
    ) -> Result<Self> {
        for (index, node) in nodes.iter().enumerate() {
            if node.id.index() != index {
                return Err(PdgError::invalid_input(format!(
                    "node {} stored at position {}",
                    node.id, index
                )));
            }
            for operand in node.kind.operands() {
                if operand.index() >= nodes.len() {
                    return Err(PdgError::invalid_input(format!(
                        "node {} references unknown operand {}",
                        node.id, operand
                    )));
                }
            }
        }

        let node_exists = |id: CfgNodeId| id.index() < nodes.len();
        let block_exists = |id: BlockId| id.index() < blocks.len();

        let mut owner: FxHashMap<CfgNodeId, BlockId> = FxHashMap::default();
        let mut predecessors: Vec<BTreeSet<BlockId>> = vec![BTreeSet::new(); blocks.len()];

        for (index, block) in blocks.iter().enumerate() {
            if block.id.index() != index {
                return Err(PdgError::invalid_input(format!(
                    "block {} stored at position {}",
                    block.id, index
                )));
            }

            if let BlockKind::Conditional {
                then_successor,
                else_successor,
            } = &block.kind
            {
                if *then_successor == UNSET || *else_successor == UNSET {
                    return Err(PdgError::invalid_input(format!(
                        "conditional block {} is missing a branch",
                        block.id
                    )));
                }
            }

            for node in block.nodes() {
                if !node_exists(*node) {
                    return Err(PdgError::invalid_input(format!(
                        "block {} owns unknown node {}",
                        block.id, node
                    )));
                }
                if let Some(previous) = owner.insert(*node, block.id) {
                    return Err(PdgError::invalid_input(format!(
                        "node {} owned by both {} and {}",
                        node, previous, block.id
                    )));
                }
            }

            for successor in block.successors() {
                if !block_exists(successor) {
                    return Err(PdgError::invalid_input(format!(
                        "block {} has dangling successor {}",
                        block.id, successor
                    )));
                }
                predecessors[successor.index()].insert(block.id);
            }
        }

        if !blocks
            .iter()
            .any(|b| b.special_kind() == Some(SpecialBlockKind::Entry))
        {
            return Err(PdgError::invalid_input("graph has no entry block"));
        }

        for param in &parameters {
            if !node_exists(*param) {
                return Err(PdgError::invalid_input(format!(
                    "unknown parameter node {param}"
                )));
            }
        }
        for (tree, extra) in &postfix {
            if let Some(bad) = extra.iter().find(|n| !node_exists(**n)) {
                return Err(PdgError::invalid_input(format!(
                    "postfix rewrite of {tree} references unknown node {bad}"
                )));
            }
        }

        let mut by_tree: FxHashMap<SyntaxId, Vec<CfgNodeId>> = FxHashMap::default();
        for node in &nodes {
            if let Some(tree) = node.syntax {
                by_tree.entry(tree).or_default().push(node.id);
            }
        }

        Ok(Self {
            nodes,
            blocks,
            parameters,
            postfix,
            predecessors,
            owner,
            by_tree,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Serialization
// ═══════════════════════════════════════════════════════════════════════════

/// Serialized CFG: raw parts only, indices are rebuilt on load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlFlowGraphDto {
    pub nodes: Vec<CfgNode>,
    pub blocks: Vec<BasicBlock>,
    #[serde(default)]
    pub parameters: Vec<CfgNodeId>,
    #[serde(default)]
    pub postfix: BTreeMap<SyntaxId, Vec<CfgNodeId>>,
}

impl TryFrom<ControlFlowGraphDto> for ControlFlowGraph {
    type Error = PdgError;

    fn try_from(dto: ControlFlowGraphDto) -> Result<Self> {
        ControlFlowGraph::from_parts(dto.nodes, dto.blocks, dto.parameters, dto.postfix)
    }
}

impl From<ControlFlowGraph> for ControlFlowGraphDto {
    fn from(cfg: ControlFlowGraph) -> Self {
        Self {
            nodes: cfg.nodes,
            blocks: cfg.blocks,
            parameters: cfg.parameters,
            postfix: cfg.postfix,
        }
    }
}
