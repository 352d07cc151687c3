//! Symbol-resolution oracle
//!
//! Name binding and type inference live in the front end; the PDG core only
//! asks what a call site or reference resolves to.

use crate::features::syntax::domain::{ProcedureSignature, SyntaxId};
use serde::{Deserialize, Serialize};

/// Resolved procedure: signature plus formal parameter names in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureDeclaration {
    pub signature: ProcedureSignature,
    pub parameter_names: Vec<String>,
}

/// What a fragment resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Procedure(ProcedureDeclaration),
    Variable {
        name: String,
        #[serde(default)]
        ty: Option<String>,
    },
}

impl Declaration {
    pub fn as_procedure(&self) -> Option<&ProcedureDeclaration> {
        match self {
            Declaration::Procedure(decl) => Some(decl),
            Declaration::Variable { .. } => None,
        }
    }
}

/// Oracle consulted during call resolution and argument binding
///
/// Returning `None` means "unresolved" (library call, missing classpath);
/// the pipeline skips such fragments without failing.
pub trait SymbolResolver: Sync {
    fn declaration_of(&self, node: SyntaxId) -> Option<Declaration>;

    fn type_of(&self, node: SyntaxId) -> Option<String>;
}
