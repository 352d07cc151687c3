/*
 * Local call resolution
 *
 * For every element, each call fragment beneath it is resolved through the
 * symbol oracle. A callee found in the file's procedure index yields
 *   CALL  call-site element → callee Entry      (label: callee signature)
 * and each Variable record the caller bound into one of the callee's
 * formals yields
 *   NAME  callee Entry → argument's declaring element   (label: formal name)
 * Calls leaving the file produce nothing.
 */

use super::context::BuildContext;
use super::pdg::ProcedurePdg;
use crate::features::data_flow::{NameKind, NameStore};
use crate::features::pdg::domain::{EdgeKind, ElementId, ElementRef, PdgEdge};
use crate::features::syntax::{SymbolResolver, SyntaxTree};
use tracing::trace;

pub struct LocalCallResolver<'a> {
    context: &'a BuildContext,
    tree: &'a SyntaxTree,
    resolver: &'a dyn SymbolResolver,
}

impl<'a> LocalCallResolver<'a> {
    pub fn new(
        context: &'a BuildContext,
        tree: &'a SyntaxTree,
        resolver: &'a dyn SymbolResolver,
    ) -> Self {
        Self {
            context,
            tree,
            resolver,
        }
    }

    /// CALL edges leaving the elements of `caller`, in element order
    pub fn call_edges(&self, caller: &ProcedurePdg) -> Vec<PdgEdge> {
        let mut edges = Vec::new();

        for element in caller.fragments() {
            let Some(root) = element.kind.syntax() else {
                continue;
            };
            for fragment in self.tree.descendants_within_procedure(root) {
                if !self.tree.kind(fragment).is_some_and(|k| k.is_call()) {
                    continue;
                }
                let Some(declaration) = self.resolver.declaration_of(fragment) else {
                    trace!(call = %fragment, "call without declaration");
                    continue;
                };
                let Some(callee) = declaration.as_procedure() else {
                    continue;
                };
                let Some(target) = self
                    .context
                    .resolve(&callee.signature)
                    .and_then(|id| self.context.entry_of(id))
                else {
                    trace!(call = %fragment, callee = %callee.signature, "callee outside the file");
                    continue;
                };
                edges.push(PdgEdge::new(
                    element.element_ref(),
                    target,
                    EdgeKind::Call,
                    Some(callee.signature.to_string()),
                ));
            }
        }
        edges
    }

    /// NAME edges binding `caller`'s argument variables to local callees
    ///
    /// `declaring` lifts a caller variable to its declaring element.
    pub fn argument_edges(
        &self,
        caller: &ProcedurePdg,
        store: &NameStore,
        declaring: impl Fn(&str) -> Option<ElementId>,
    ) -> Vec<PdgEdge> {
        let mut edges = Vec::new();

        for (formal, records) in &store.argument_bindings {
            let Some(callee_entry) = self
                .context
                .resolve(&formal.callee)
                .and_then(|id| self.context.entry_of(id))
            else {
                continue;
            };
            for record in records {
                if record.kind != NameKind::Variable || !store.is_tracked(&record.name) {
                    continue;
                }
                let Some(element) = declaring(&record.name) else {
                    continue;
                };
                let target = ElementRef::new(caller.id, element);
                // recursive call passing a formal straight through
                if target == callee_entry {
                    continue;
                }
                edges.push(PdgEdge::new(
                    callee_entry,
                    target,
                    EdgeKind::Name,
                    Some(formal.name.clone()),
                ));
            }
        }
        edges
    }
}
