//! Syntax domain: fragment arena and procedure signatures

mod signature;
mod tree;

pub use signature::ProcedureSignature;
pub use tree::{ProcedureDecl, SyntaxId, SyntaxKind, SyntaxNode, SyntaxTree, UnaryOperator};
