/*
 * Name-flow analysis
 *
 * On `target := expr` the expression is unwrapped through unary, ternary
 * (both arms), cast, instanceof and binary wrappers. Each leaf yields a record
 * attached to `target`:
 *   literal         → (value, Literal)
 *   local variable  → (name, Variable)
 *   call / new      → (callee simple name | class, Method)
 * Other leaves (field and array accesses, opaque nodes) yield nothing.
 *
 * Call arguments are bound into the resolved callee's formals the same way,
 * and variables in `return` expressions are remembered for return binding.
 */

use crate::features::data_flow::domain::{FormalRef, NameKind, NameRecord, NameStore};
use crate::features::data_flow::infrastructure::errors::DataflowResult;
use crate::features::data_flow::ports::{FixpointSolver, ForwardTransfer};
use crate::features::flow_graph::{CfgNode, CfgNodeId, CfgNodeKind, ControlFlowGraph};
use crate::features::syntax::SymbolResolver;
use tracing::debug;

pub struct NameFlowTransfer<'a> {
    resolver: &'a dyn SymbolResolver,
}

impl<'a> NameFlowTransfer<'a> {
    pub fn new(resolver: &'a dyn SymbolResolver) -> Self {
        Self { resolver }
    }

    fn bind_arguments(
        &self,
        cfg: &ControlFlowGraph,
        call: &CfgNode,
        arguments: &[CfgNodeId],
        store: &mut NameStore,
    ) {
        let Some(syntax) = call.syntax else {
            return;
        };
        let Some(declaration) = self.resolver.declaration_of(syntax) else {
            return;
        };
        let Some(callee) = declaration.as_procedure() else {
            return;
        };

        for (position, (argument, formal)) in arguments
            .iter()
            .zip(callee.parameter_names.iter())
            .enumerate()
        {
            let records = leaf_records(cfg, *argument);
            if records.is_empty() {
                continue;
            }
            store.bind_argument(
                FormalRef {
                    callee: callee.signature.clone(),
                    position,
                    name: formal.clone(),
                },
                records,
            );
        }
    }
}

/// Names reachable from `expr` through transparent wrappers
pub fn leaf_records(cfg: &ControlFlowGraph, expr: CfgNodeId) -> Vec<NameRecord> {
    let mut records = Vec::new();
    let mut stack = vec![expr];

    while let Some(id) = stack.pop() {
        let Some(node) = cfg.node(id) else {
            continue;
        };
        match &node.kind {
            CfgNodeKind::Literal { value } => {
                records.push(NameRecord::new(value.clone(), NameKind::Literal, id));
            }
            CfgNodeKind::LocalVariable { name } => {
                records.push(NameRecord::new(name.clone(), NameKind::Variable, id));
            }
            CfgNodeKind::MethodInvocation { name, .. } => {
                records.push(NameRecord::new(name.clone(), NameKind::Method, id));
            }
            CfgNodeKind::ObjectCreation { class, .. } => {
                records.push(NameRecord::new(class.clone(), NameKind::Method, id));
            }
            CfgNodeKind::Unary { operand }
            | CfgNodeKind::Cast { operand }
            | CfgNodeKind::InstanceOf { operand } => stack.push(*operand),
            CfgNodeKind::Ternary {
                then_operand,
                else_operand,
                ..
            } => {
                stack.push(*else_operand);
                stack.push(*then_operand);
            }
            CfgNodeKind::Binary { lhs, rhs } => {
                stack.push(*rhs);
                stack.push(*lhs);
            }
            _ => {}
        }
    }
    records
}

impl ForwardTransfer for NameFlowTransfer<'_> {
    type Store = NameStore;

    /// Formal parameters are declared on entry
    fn initial_store(&self, cfg: &ControlFlowGraph) -> NameStore {
        let mut store = NameStore::new();
        for param in cfg.parameters() {
            if let Some(CfgNode {
                kind: CfgNodeKind::VariableDeclaration { name },
                ..
            }) = cfg.node(*param)
            {
                store.declare(name, *param);
            }
        }
        store
    }

    fn transfer(&self, cfg: &ControlFlowGraph, node: &CfgNode, store: &mut NameStore) {
        match &node.kind {
            CfgNodeKind::VariableDeclaration { name } => store.declare(name, node.id),
            CfgNodeKind::Assignment { target, expression } => {
                if let Some(name) = cfg.node(*target).and_then(|t| t.kind.local_variable_name()) {
                    store.assign(name, leaf_records(cfg, *expression));
                }
            }
            CfgNodeKind::MethodInvocation { arguments, .. }
            | CfgNodeKind::ObjectCreation { arguments, .. } => {
                self.bind_arguments(cfg, node, arguments, store);
            }
            CfgNodeKind::Return {
                result: Some(result),
            } => {
                for record in leaf_records(cfg, *result) {
                    if record.kind == NameKind::Variable {
                        store.mark_returned(&record.name);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Run name-flow to a fixpoint; the result is the join of every out-store
pub fn analyze_name_flow<S: FixpointSolver>(
    cfg: &ControlFlowGraph,
    resolver: &dyn SymbolResolver,
    solver: &S,
) -> DataflowResult<NameStore> {
    let transfer = NameFlowTransfer::new(resolver);
    let result = solver.solve(cfg, &transfer)?;
    let store = result.joined_out().unwrap_or_default();

    debug!(
        iterations = result.iterations,
        variables = store.xi.len(),
        returned = store.returned_variables.len(),
        "name-flow analysis finished"
    );
    Ok(store)
}
