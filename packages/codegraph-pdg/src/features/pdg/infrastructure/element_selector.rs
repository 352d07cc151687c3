//! Element selection
//!
//! Walks a procedure body and keeps the dependence-worthy fragments:
//! expression statements (their inner expression), local declarations,
//! returns, throws, and the conditions/iterables of control structures.
//! Control-structure headers themselves are never elements, neither are
//! formal parameters or nested procedures.

use crate::features::pdg::domain::FragmentKind;
use crate::features::syntax::{SyntaxId, SyntaxKind, SyntaxTree};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedElement {
    pub syntax: SyntaxId,
    pub kind: FragmentKind,
}

/// Classify a fragment that stands in statement position
fn classify(kind: &SyntaxKind) -> FragmentKind {
    match kind {
        SyntaxKind::VariableDeclaration { .. } => FragmentKind::Declaration,
        SyntaxKind::Assignment { .. } | SyntaxKind::CompoundAssignment { .. } => {
            FragmentKind::Assignment
        }
        SyntaxKind::MethodInvocation { .. } | SyntaxKind::NewObject { .. } => FragmentKind::Call,
        SyntaxKind::Return { .. } => FragmentKind::Return,
        SyntaxKind::Throw { .. } => FragmentKind::Throw,
        SyntaxKind::Unary { .. } => FragmentKind::Unary,
        _ => FragmentKind::Expression,
    }
}

struct Selector<'a> {
    tree: &'a SyntaxTree,
    out: Vec<SelectedElement>,
}

impl Selector<'_> {
    fn push(&mut self, syntax: SyntaxId, kind: FragmentKind) {
        self.out.push(SelectedElement { syntax, kind });
    }

    fn statements(&mut self, ids: &[SyntaxId]) {
        for id in ids {
            self.statement(*id);
        }
    }

    fn statement(&mut self, id: SyntaxId) {
        let Some(node) = self.tree.get(id) else {
            return;
        };

        match &node.kind {
            SyntaxKind::Block { statements } => self.statements(statements),
            SyntaxKind::ExpressionStatement { expression } => {
                if let Some(inner) = self.tree.kind(*expression) {
                    self.push(*expression, classify(inner));
                }
            }
            SyntaxKind::VariableDeclaration { .. }
            | SyntaxKind::Return { .. }
            | SyntaxKind::Throw { .. } => self.push(id, classify(&node.kind)),
            SyntaxKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.push(*condition, FragmentKind::Condition);
                self.statement(*then_branch);
                if let Some(else_branch) = else_branch {
                    self.statement(*else_branch);
                }
            }
            SyntaxKind::While { condition, body } => {
                self.push(*condition, FragmentKind::Condition);
                self.statement(*body);
            }
            SyntaxKind::DoWhile { body, condition } => {
                self.statement(*body);
                self.push(*condition, FragmentKind::Condition);
            }
            SyntaxKind::For {
                initializers,
                condition,
                updates,
                body,
            } => {
                self.statements(initializers);
                if let Some(condition) = condition {
                    self.push(*condition, FragmentKind::Condition);
                }
                self.statements(updates);
                self.statement(*body);
            }
            SyntaxKind::ForEach {
                variable,
                iterable,
                body,
            } => {
                self.push(*variable, FragmentKind::Declaration);
                self.push(*iterable, FragmentKind::Iteration);
                self.statement(*body);
            }
            SyntaxKind::Switch { selector, cases } => {
                self.push(*selector, FragmentKind::Condition);
                self.statements(cases);
            }
            SyntaxKind::Case { body, .. } => self.statements(body),
            SyntaxKind::Try {
                body,
                catches,
                finally,
            } => {
                self.statement(*body);
                self.statements(catches);
                if let Some(finally) = finally {
                    self.statement(*finally);
                }
            }
            SyntaxKind::Catch { parameter, body } => {
                self.push(*parameter, FragmentKind::Declaration);
                self.statement(*body);
            }
            SyntaxKind::Labeled { body, .. } => self.statement(*body),
            SyntaxKind::Break { .. }
            | SyntaxKind::Continue { .. }
            | SyntaxKind::Empty
            | SyntaxKind::Procedure(_) => {}
            // bare expression in statement position (for-updates, lambdas bodies)
            other if other.is_expression() => self.push(id, classify(other)),
            other => trace!(kind = other.as_str(), "fragment is not an element"),
        }
    }
}

/// Select the elements of one procedure
///
/// Output is ordered by (start line, start column, syntax id); a procedure
/// without body selects nothing.
pub fn select_elements(tree: &SyntaxTree, procedure: SyntaxId) -> Vec<SelectedElement> {
    let Some(body) = tree.procedure(procedure).and_then(|decl| decl.body) else {
        return Vec::new();
    };

    let mut selector = Selector {
        tree,
        out: Vec::new(),
    };
    selector.statement(body);

    let mut elements = selector.out;
    elements.sort_by_key(|e| {
        let (line, col) = tree
            .get(e.syntax)
            .map_or((0, 0), |n| (n.span.start_line, n.span.start_col));
        (line, col, e.syntax)
    });
    elements.dedup_by_key(|e| e.syntax);
    elements
}
