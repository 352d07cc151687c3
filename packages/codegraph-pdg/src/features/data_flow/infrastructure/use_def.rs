/*
 * Use-def (last-use) analysis
 *
 * Transfer rules:
 * - VariableDeclaration: seed the name if it is not tracked yet
 * - LocalVariable read:  link every last use to this occurrence, then it
 *                        becomes the only last use
 * - Assignment to a local: the target occurrence becomes the only last use
 * - anything else:       transparent
 *
 * LocalVariable nodes that are assignment targets are writes, not reads;
 * they are collected once per graph before solving.
 */

use crate::features::data_flow::domain::{DataEdge, DataflowValue, UseDefStore};
use crate::features::data_flow::infrastructure::errors::DataflowResult;
use crate::features::data_flow::ports::{FixpointSolver, ForwardTransfer};
use crate::features::flow_graph::{CfgNode, CfgNodeId, CfgNodeKind, ControlFlowGraph};
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;
use tracing::debug;

pub struct UseDefTransfer {
    assignment_targets: FxHashSet<CfgNodeId>,
}

impl UseDefTransfer {
    pub fn new(cfg: &ControlFlowGraph) -> Self {
        let assignment_targets = cfg
            .nodes()
            .iter()
            .filter_map(|node| match &node.kind {
                CfgNodeKind::Assignment { target, .. } => Some(*target),
                _ => None,
            })
            .collect();
        Self { assignment_targets }
    }

    fn is_write(&self, node: CfgNodeId) -> bool {
        self.assignment_targets.contains(&node)
    }
}

impl ForwardTransfer for UseDefTransfer {
    type Store = UseDefStore;

    /// Every formal parameter is its own last use
    fn initial_store(&self, cfg: &ControlFlowGraph) -> UseDefStore {
        let mut store = UseDefStore::new();
        for param in cfg.parameters() {
            if let Some(CfgNode {
                kind: CfgNodeKind::VariableDeclaration { name },
                ..
            }) = cfg.node(*param)
            {
                store.declare(name, DataflowValue(*param));
            }
        }
        store
    }

    fn transfer(&self, cfg: &ControlFlowGraph, node: &CfgNode, store: &mut UseDefStore) {
        match &node.kind {
            CfgNodeKind::VariableDeclaration { name } => {
                store.declare(name, DataflowValue(node.id));
            }
            CfgNodeKind::LocalVariable { name } if !self.is_write(node.id) => {
                store.read(name, DataflowValue(node.id));
            }
            CfgNodeKind::Assignment { target, .. } => {
                if let Some(name) = cfg.node(*target).and_then(|t| t.kind.local_variable_name()) {
                    store.write(name, DataflowValue(*target));
                }
            }
            _ => {}
        }
    }
}

/// Run use-def to a fixpoint and collect the DATA edges of every path
pub fn analyze_use_def<S: FixpointSolver>(
    cfg: &ControlFlowGraph,
    solver: &S,
) -> DataflowResult<BTreeSet<DataEdge>> {
    let transfer = UseDefTransfer::new(cfg);
    let result = solver.solve(cfg, &transfer)?;

    let edges: BTreeSet<DataEdge> = result
        .block_out
        .values()
        .flat_map(|store| store.edges.iter().cloned())
        .collect();

    debug!(
        iterations = result.iterations,
        edges = edges.len(),
        "use-def analysis finished"
    );
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::data_flow::WorklistSolver;
    use crate::features::flow_graph::ControlFlowGraphBuilder;

    fn local(b: &mut ControlFlowGraphBuilder, name: &str) -> CfgNodeId {
        b.add_node(CfgNodeKind::LocalVariable { name: name.into() }, None)
    }

    fn lit(b: &mut ControlFlowGraphBuilder, value: &str) -> CfgNodeId {
        b.add_node(CfgNodeKind::Literal { value: value.into() }, None)
    }

    fn assign(b: &mut ControlFlowGraphBuilder, target: CfgNodeId, expression: CfgNodeId) -> CfgNodeId {
        b.add_node(CfgNodeKind::Assignment { target, expression }, None)
    }

    #[test]
    fn test_overwritten_declaration_has_no_edge() {
        // int a = 1; a = 2; int b = a;
        let mut b = ControlFlowGraphBuilder::new();
        let decl_a = b.add_node(CfgNodeKind::VariableDeclaration { name: "a".into() }, None);
        let t1 = local(&mut b, "a");
        let one = lit(&mut b, "1");
        let as1 = assign(&mut b, t1, one);
        let t2 = local(&mut b, "a");
        let two = lit(&mut b, "2");
        let as2 = assign(&mut b, t2, two);
        let decl_b = b.add_node(CfgNodeKind::VariableDeclaration { name: "b".into() }, None);
        let read_a = local(&mut b, "a");
        let tb = local(&mut b, "b");
        let as3 = assign(&mut b, tb, read_a);
        let body = b.regular_block(vec![decl_a, t1, one, as1, t2, two, as2, decl_b, read_a, tb, as3]);
        b.set_successor(ControlFlowGraphBuilder::ENTRY, body);
        b.set_successor(body, ControlFlowGraphBuilder::EXIT);
        let cfg = b.build().unwrap();

        let edges = analyze_use_def(&cfg, &WorklistSolver::default()).unwrap();
        let pairs: Vec<_> = edges.iter().map(|e| (e.from.node(), e.to.node())).collect();
        assert_eq!(pairs, vec![(t2, read_a)]);
    }

    #[test]
    fn test_parameter_is_initial_last_use() {
        let mut b = ControlFlowGraphBuilder::new();
        let x = b.add_parameter("x", None);
        let read = local(&mut b, "x");
        let body = b.regular_block(vec![read]);
        b.set_successor(ControlFlowGraphBuilder::ENTRY, body);
        b.set_successor(body, ControlFlowGraphBuilder::EXIT);
        let cfg = b.build().unwrap();

        let edges = analyze_use_def(&cfg, &WorklistSolver::default()).unwrap();
        assert_eq!(edges.len(), 1);
        let edge = edges.iter().next().unwrap();
        assert_eq!(edge.from.node(), x);
        assert_eq!(edge.variable, "x");
        assert_eq!(cfg.owning_block(edge.from.node()), None);
    }

    #[test]
    fn test_branches_merge_last_uses() {
        // if (c) a = 1; else a = 2; use(a)
        let mut b = ControlFlowGraphBuilder::new();
        let c = local(&mut b, "c");
        let t1 = local(&mut b, "a");
        let one = lit(&mut b, "1");
        let as1 = assign(&mut b, t1, one);
        let t2 = local(&mut b, "a");
        let two = lit(&mut b, "2");
        let as2 = assign(&mut b, t2, two);
        let read = local(&mut b, "a");

        let head = b.regular_block(vec![c]);
        let cond = b.conditional_block();
        let then_block = b.regular_block(vec![t1, one, as1]);
        let else_block = b.regular_block(vec![t2, two, as2]);
        let join = b.regular_block(vec![read]);
        b.set_successor(ControlFlowGraphBuilder::ENTRY, head);
        b.set_successor(head, cond);
        b.set_branches(cond, then_block, else_block);
        b.set_successor(then_block, join);
        b.set_successor(else_block, join);
        b.set_successor(join, ControlFlowGraphBuilder::EXIT);
        let cfg = b.build().unwrap();

        let edges = analyze_use_def(&cfg, &WorklistSolver::default()).unwrap();
        let into_read: BTreeSet<_> = edges
            .iter()
            .filter(|e| e.to.node() == read)
            .map(|e| e.from.node())
            .collect();
        assert_eq!(into_read, BTreeSet::from([t1, t2]));
    }
}
