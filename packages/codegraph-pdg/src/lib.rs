/*
 * Codegraph PDG - Statement-level Program Dependence Graph extraction
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Span)
 * - features/    : Vertical slices (syntax → flow_graph → data_flow → pdg)
 * - config/      : PdgConfig, presets, validation
 *
 * Pipeline per file:
 * - element selection → node index → CONTROL edges
 * - use-def + name-flow dataflow → DATA / NAME edges
 * - local call resolution → CALL edges
 * - DOT / JSON serialization
 */

// Crate-level lint configuration
#![allow(clippy::upper_case_acronyms)] // PDG, CFG naming
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules (syntax, flow graph, dataflow, PDG)
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{PdgConfig, Preset, SolverConfig};
pub use errors::{PdgError, Result};
pub use features::flow_graph::{
    BasicBlock, BlockId, BlockKind, CfgNode, CfgNodeId, CfgNodeKind, ControlFlowGraph,
    ControlFlowGraphBuilder, SpecialBlockKind,
};
pub use features::pdg::application::{CompilationUnit, PdgExtractor, ProcedureSource};
pub use features::pdg::domain::{
    EdgeKind, ElementId, ElementKind, ElementRef, FragmentKind, PdgEdge, PdgElement, ProcedureId,
};
pub use features::pdg::infrastructure::{FilePdg, PdgStats, ProcedurePdg};
pub use features::pdg::ports::{OutputFormat, PdgSerializer};
pub use features::syntax::{
    Declaration, ProcedureDecl, ProcedureDeclaration, ProcedureSignature, SymbolResolver,
    SymbolTable, SyntaxId, SyntaxKind, SyntaxNode, SyntaxTree, UnaryOperator,
};
pub use shared::models::Span;
