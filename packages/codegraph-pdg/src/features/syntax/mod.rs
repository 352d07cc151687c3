//! Syntax tree and symbol-resolution oracle
//!
//! The tree is produced by an external front end. The core only walks it to
//! pick elements, find call sites and derive procedure signatures.

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{
    ProcedureDecl, ProcedureSignature, SyntaxId, SyntaxKind, SyntaxNode, SyntaxTree,
    UnaryOperator,
};
pub use infrastructure::SymbolTable;
pub use ports::{Declaration, ProcedureDeclaration, SymbolResolver};
