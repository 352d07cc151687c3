use crate::features::syntax::domain::SyntaxId;
use crate::features::syntax::ports::{Declaration, SymbolResolver};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Precomputed resolution results shipped alongside a compilation unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    #[serde(default)]
    declarations: BTreeMap<SyntaxId, Declaration>,
    #[serde(default)]
    types: BTreeMap<SyntaxId, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record what `node` resolves to, replacing any earlier entry
    pub fn declare(&mut self, node: SyntaxId, declaration: Declaration) {
        self.declarations.insert(node, declaration);
    }

    pub fn set_type(&mut self, node: SyntaxId, ty: impl Into<String>) {
        self.types.insert(node, ty.into());
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.types.is_empty()
    }
}

impl SymbolResolver for SymbolTable {
    fn declaration_of(&self, node: SyntaxId) -> Option<Declaration> {
        self.declarations.get(&node).cloned()
    }

    fn type_of(&self, node: SyntaxId) -> Option<String> {
        self.types.get(&node).cloned()
    }
}
