/*
 * CONTROL edge construction
 *
 * Block-level successor links become element-level edges:
 *   from_nodes(block)  last element of the block, else union over predecessors
 *   to_nodes(block)    first element of the block, else union over successors
 *
 * Block kinds:
 *   REGULAR      scan owned nodes (reverse for from, forward for to)
 *   CONDITIONAL  owns nothing; emits its own `true`/`false` edges from the
 *                element before it, so edges into it are skipped
 *   SPECIAL      registered synthetic element (Entry/Exit/ExceptionalExit)
 *   EXCEPTION    element of the guarded node, empty when unmapped
 *
 * The regular exit closes the procedure with one EXIT edge Exit → Entry,
 * emitted only when the exit is reachable.
 */

use super::node_index::NodeElementIndex;
use super::pdg::ProcedurePdg;
use crate::features::flow_graph::{BasicBlock, BlockId, BlockKind, ControlFlowGraph, SpecialBlockKind};
use crate::features::pdg::domain::{EdgeKind, ElementId};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, error, warn};

// ═══════════════════════════════════════════════════════════════════════════
// Special element registry
// ═══════════════════════════════════════════════════════════════════════════

/// Special block → synthetic element
#[derive(Debug, Clone, Default)]
pub struct SpecialRegistry {
    elements: FxHashMap<BlockId, ElementId>,
    /// Block kept for each kind (the last registered one)
    kept: FxHashMap<SpecialBlockKind, BlockId>,
}

impl SpecialRegistry {
    pub fn from_cfg(cfg: &ControlFlowGraph) -> Self {
        let mut registry = Self::default();
        for block in cfg.blocks() {
            if let Some(kind) = block.special_kind() {
                registry.register(kind, block.id);
            }
        }
        registry
    }

    fn register(&mut self, kind: SpecialBlockKind, block: BlockId) {
        let element = match kind {
            SpecialBlockKind::Entry => ElementId::ENTRY,
            SpecialBlockKind::Exit => ElementId::EXIT,
            SpecialBlockKind::ExceptionalExit => ElementId::EXCEPTIONAL_EXIT,
        };
        if let Some(previous) = self.kept.insert(kind, block) {
            warn!(
                kind = kind.as_str(),
                %previous,
                kept = %block,
                "special block registered twice; keeping the later one"
            );
        }
        self.elements.insert(block, element);
    }

    pub fn element(&self, block: BlockId) -> Option<ElementId> {
        self.elements.get(&block).copied()
    }

    pub fn block(&self, kind: SpecialBlockKind) -> Option<BlockId> {
        self.kept.get(&kind).copied()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════

pub struct ControlEdgeBuilder<'a> {
    cfg: &'a ControlFlowGraph,
    index: &'a NodeElementIndex,
    registry: SpecialRegistry,
}

impl<'a> ControlEdgeBuilder<'a> {
    pub fn new(cfg: &'a ControlFlowGraph, index: &'a NodeElementIndex) -> Self {
        Self {
            cfg,
            index,
            registry: SpecialRegistry::from_cfg(cfg),
        }
    }

    /// Add CONTROL (and optionally EXIT) edges to `pdg`; returns how many were new
    pub fn build(&self, pdg: &mut ProcedurePdg, emit_exit_edge: bool) -> usize {
        let mut added = 0;

        for block in self.cfg.blocks() {
            if block.special_kind() == Some(SpecialBlockKind::Exit) {
                continue;
            }
            self.check_successor_shape(block);
            added += self.intra_block_edges(block, pdg);
            added += self.inter_block_edges(block, pdg);
        }

        if emit_exit_edge {
            added += self.exit_edge(pdg);
        }
        added
    }

    /// Consecutive distinct elements inside one block
    fn intra_block_edges(&self, block: &BasicBlock, pdg: &mut ProcedurePdg) -> usize {
        let mut added = 0;
        let mut previous: Option<ElementId> = None;
        for node in block.nodes() {
            let Some(element) = self.index.element_of(*node) else {
                continue;
            };
            if let Some(prev) = previous {
                if prev != element && pdg.add_edge(prev, element, EdgeKind::Control, None) {
                    added += 1;
                }
            }
            previous = Some(element);
        }
        added
    }

    fn inter_block_edges(&self, block: &BasicBlock, pdg: &mut ProcedurePdg) -> usize {
        let from = self.from_nodes(block.id, &mut FxHashSet::default());
        let mut added = 0;

        for (successor, label) in block.labeled_successors() {
            // a conditional successor emits its own labeled edges; exceptional
            // edges into one still go through anchor resolution
            if label.is_none()
                && !block.is_conditional()
                && self
                    .cfg
                    .block(successor)
                    .is_some_and(BasicBlock::is_conditional)
            {
                continue;
            }

            let to = self.to_nodes(successor, &mut FxHashSet::default());
            if from.is_empty() || to.is_empty() {
                debug!(
                    block = %block.id,
                    %successor,
                    kind = block.kind.as_str(),
                    from = from.len(),
                    to = to.len(),
                    "control anchor unresolved; no edge"
                );
                continue;
            }

            for f in &from {
                for t in &to {
                    if f == t && successor != block.id {
                        continue;
                    }
                    if pdg.add_edge(*f, *t, EdgeKind::Control, label.clone()) {
                        added += 1;
                    }
                }
            }
        }
        added
    }

    fn exit_edge(&self, pdg: &mut ProcedurePdg) -> usize {
        let Some(exit) = self.registry.block(SpecialBlockKind::Exit) else {
            debug!(procedure = %pdg.signature, "no regular exit block; EXIT edge omitted");
            return 0;
        };
        if !self.reachable_from_entry(exit) {
            debug!(procedure = %pdg.signature, "regular exit unreachable; EXIT edge omitted");
            return 0;
        }

        let mut added = 0;
        for from in self.from_nodes(exit, &mut FxHashSet::default()) {
            if pdg.add_edge(from, ElementId::ENTRY, EdgeKind::Exit, None) {
                added += 1;
            }
        }
        added
    }

    fn check_successor_shape(&self, block: &BasicBlock) {
        if !matches!(block.kind, BlockKind::Conditional { .. } | BlockKind::Special { .. }) {
            return;
        }
        for successor in block.successors() {
            if self
                .cfg
                .block(successor)
                .is_some_and(BasicBlock::is_conditional)
            {
                error!(
                    block = %block.id,
                    kind = block.kind.as_str(),
                    %successor,
                    "conditional block directly follows a conditional or special block"
                );
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Anchor resolution
    // ═══════════════════════════════════════════════════════════════════════

    /// Elements control can leave `block` from
    pub fn from_nodes(&self, block: BlockId, visited: &mut FxHashSet<BlockId>) -> BTreeSet<ElementId> {
        let mut out = BTreeSet::new();
        if !visited.insert(block) {
            return out;
        }
        let Some(b) = self.cfg.block(block) else {
            return out;
        };

        match &b.kind {
            BlockKind::Regular { nodes, .. } => {
                if let Some(element) = nodes.iter().rev().find_map(|n| self.index.element_of(*n)) {
                    out.insert(element);
                    return out;
                }
                for pred in self.cfg.predecessors(block) {
                    out.extend(self.from_nodes(pred, visited));
                }
            }
            BlockKind::Conditional { .. } => {
                for pred in self.cfg.predecessors(block) {
                    out.extend(self.from_nodes(pred, visited));
                }
            }
            BlockKind::Special { .. } => out.extend(self.registry.element(block)),
            BlockKind::Exception { node, .. } => out.extend(self.index.element_of(*node)),
        }
        out
    }

    /// Elements control enters `block` at
    pub fn to_nodes(&self, block: BlockId, visited: &mut FxHashSet<BlockId>) -> BTreeSet<ElementId> {
        let mut out = BTreeSet::new();
        if !visited.insert(block) {
            return out;
        }
        let Some(b) = self.cfg.block(block) else {
            return out;
        };

        match &b.kind {
            BlockKind::Regular { nodes, .. } => {
                if let Some(element) = nodes.iter().find_map(|n| self.index.element_of(*n)) {
                    out.insert(element);
                    return out;
                }
                for succ in b.successors() {
                    out.extend(self.to_nodes(succ, visited));
                }
            }
            BlockKind::Conditional { .. } => {}
            BlockKind::Special { .. } => out.extend(self.registry.element(block)),
            BlockKind::Exception { node, .. } => out.extend(self.index.element_of(*node)),
        }
        out
    }

    fn reachable_from_entry(&self, target: BlockId) -> bool {
        let Some(entry) = self.registry.block(SpecialBlockKind::Entry) else {
            return false;
        };
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::from([entry]);
        while let Some(current) = queue.pop_front() {
            if current == target {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(block) = self.cfg.block(current) {
                queue.extend(block.successors());
            }
        }
        false
    }
}
