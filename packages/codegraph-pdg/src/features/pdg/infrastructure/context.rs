//! Per-file build context
//!
//! Holds the local procedure index (signature → procedure) and the Entry
//! registry. Created fresh for every file and read-only once registration
//! is done.

use crate::features::pdg::domain::{ElementRef, ProcedureId};
use crate::features::syntax::{ProcedureSignature, SymbolResolver, SyntaxId, SyntaxTree};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    signatures: BTreeMap<ProcedureSignature, ProcedureId>,
    entries: BTreeMap<ProcedureId, ElementRef>,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a local procedure; a repeated signature keeps the first
    pub fn register(&mut self, procedure: ProcedureId, signature: ProcedureSignature) -> bool {
        if let Some(existing) = self.signatures.get(&signature) {
            warn!(
                %signature,
                existing = existing.0,
                ignored = procedure.0,
                "procedure signature declared twice in one file"
            );
            return false;
        }
        self.signatures.insert(signature, procedure);
        self.entries.insert(procedure, ElementRef::entry(procedure));
        true
    }

    pub fn resolve(&self, signature: &ProcedureSignature) -> Option<ProcedureId> {
        self.signatures.get(signature).copied()
    }

    pub fn entry_of(&self, procedure: ProcedureId) -> Option<ElementRef> {
        self.entries.get(&procedure).copied()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

/// Signature of a procedure, filling undeclared parameter types from the oracle
pub fn procedure_signature(
    tree: &SyntaxTree,
    resolver: &dyn SymbolResolver,
    procedure: SyntaxId,
) -> Option<ProcedureSignature> {
    let mut signature = tree.signature_of(procedure)?;
    let decl = tree.procedure(procedure)?;

    for (ty, param) in signature.parameter_types.iter_mut().zip(&decl.parameters) {
        if ty.is_empty() {
            if let Some(resolved) = resolver.type_of(*param) {
                *ty = resolved;
            }
        }
    }
    Some(signature)
}
