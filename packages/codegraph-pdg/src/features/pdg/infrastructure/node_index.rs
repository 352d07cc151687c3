//! Node-to-element index
//!
//! Every CFG node produced for a fragment under an element (including the
//! transitive operands of those nodes and the extra nodes of postfix or
//! compound rewrites) maps to that element. Unmapped nodes are scaffolding.

use crate::features::flow_graph::{CfgNodeId, ControlFlowGraph};
use crate::features::pdg::domain::ElementId;
use crate::features::syntax::{SyntaxId, SyntaxTree};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct NodeElementIndex {
    map: FxHashMap<CfgNodeId, ElementId>,
}

impl NodeElementIndex {
    /// Index the nodes of `elements`, visited in the given order
    ///
    /// A node claimed by an earlier element keeps that mapping.
    pub fn build(
        tree: &SyntaxTree,
        cfg: &ControlFlowGraph,
        elements: impl IntoIterator<Item = (ElementId, SyntaxId)>,
    ) -> Self {
        let mut index = Self::default();

        for (element, syntax) in elements {
            let mut queue: VecDeque<CfgNodeId> = VecDeque::new();
            for fragment in tree.descendants_within_procedure(syntax) {
                queue.extend(cfg.nodes_for_tree(fragment));
                queue.extend(cfg.postfix_nodes(fragment));
            }

            while let Some(node) = queue.pop_front() {
                match index.map.get(&node) {
                    Some(owner) if *owner == element => continue,
                    Some(owner) => {
                        debug!(%node, kept = %owner, dropped = %element, "node already owned by another element");
                        continue;
                    }
                    None => {
                        index.map.insert(node, element);
                    }
                }
                if let Some(cfg_node) = cfg.node(node) {
                    queue.extend(cfg_node.kind.operands());
                }
            }
        }

        index
    }

    pub fn element_of(&self, node: CfgNodeId) -> Option<ElementId> {
        self.map.get(&node).copied()
    }

    /// Nodes owned by `element`, in id order
    pub fn nodes_of(&self, element: ElementId) -> Vec<CfgNodeId> {
        let mut nodes: Vec<CfgNodeId> = self
            .map
            .iter()
            .filter(|(_, owner)| **owner == element)
            .map(|(node, _)| *node)
            .collect();
        nodes.sort();
        nodes
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::flow_graph::{CfgNodeKind, ControlFlowGraphBuilder};
    use crate::features::syntax::{SyntaxKind, UnaryOperator};
    use crate::shared::models::Span;

    #[test]
    fn test_maps_operands_and_postfix_nodes() {
        // x++; y = x;
        let mut tree = SyntaxTree::new();
        let x = tree.add(SyntaxKind::Identifier { name: "x".into() }, "x", Span::lines(1, 1));
        let inc = tree.add(
            SyntaxKind::Unary {
                operator: UnaryOperator::PostIncrement,
                operand: x,
            },
            "x++",
            Span::lines(1, 1),
        );
        let y = tree.add(SyntaxKind::Identifier { name: "y".into() }, "y", Span::lines(2, 2));
        let x2 = tree.add(SyntaxKind::Identifier { name: "x".into() }, "x", Span::lines(2, 2));
        let asg = tree.add(SyntaxKind::Assignment { target: y, value: x2 }, "y = x", Span::lines(2, 2));

        let mut b = ControlFlowGraphBuilder::new();
        let read = b.add_node(CfgNodeKind::LocalVariable { name: "x".into() }, Some(x));
        let one = b.add_node(CfgNodeKind::Literal { value: "1".into() }, None);
        let plus = b.add_node(CfgNodeKind::Binary { lhs: read, rhs: one }, None);
        let target = b.add_node(CfgNodeKind::LocalVariable { name: "x".into() }, None);
        let write = b.add_node(CfgNodeKind::Assignment { target, expression: plus }, None);
        b.map_postfix(inc, write);
        let ty = b.add_node(CfgNodeKind::LocalVariable { name: "y".into() }, Some(y));
        let rx = b.add_node(CfgNodeKind::LocalVariable { name: "x".into() }, Some(x2));
        let assign = b.add_node(CfgNodeKind::Assignment { target: ty, expression: rx }, Some(asg));
        let scaffolding = b.add_node(
            CfgNodeKind::Other {
                label: "marker".into(),
                operands: vec![],
            },
            None,
        );
        let body = b.regular_block(vec![read, one, plus, target, write, ty, rx, assign, scaffolding]);
        b.set_successor(ControlFlowGraphBuilder::ENTRY, body);
        b.set_successor(body, ControlFlowGraphBuilder::EXIT);
        let cfg = b.build().unwrap();

        let first = ElementId(3);
        let second = ElementId(4);
        let index = NodeElementIndex::build(&tree, &cfg, [(first, inc), (second, asg)]);

        assert_eq!(index.nodes_of(first), vec![read, one, plus, target, write]);
        assert_eq!(index.nodes_of(second), vec![ty, rx, assign]);
        assert_eq!(index.element_of(scaffolding), None);
        assert_eq!(index.len(), 8);
    }

    #[test]
    fn test_first_element_keeps_shared_node() {
        let mut tree = SyntaxTree::new();
        let a = tree.add(SyntaxKind::Identifier { name: "a".into() }, "a", Span::lines(1, 1));

        let mut b = ControlFlowGraphBuilder::new();
        let node = b.add_node(CfgNodeKind::LocalVariable { name: "a".into() }, Some(a));
        let body = b.regular_block(vec![node]);
        b.set_successor(ControlFlowGraphBuilder::ENTRY, body);
        b.set_successor(body, ControlFlowGraphBuilder::EXIT);
        let cfg = b.build().unwrap();

        let index = NodeElementIndex::build(&tree, &cfg, [(ElementId(3), a), (ElementId(4), a)]);
        assert_eq!(index.element_of(node), Some(ElementId(3)));
        assert!(index.nodes_of(ElementId(4)).is_empty());
    }
}
