//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure models (no external dependencies)
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - Implementations

// Input side: syntax tree + symbol oracle handed over by the front end
pub mod syntax;

// Input side: block-level CFG handed over by the CFG builder
pub mod flow_graph;

// Store types, transfer rules and the reference worklist solver
pub mod data_flow;

// Element selection, edge builders, assembly and serialization
pub mod pdg;
