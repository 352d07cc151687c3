//! Program Dependence Graph construction
//!
//! - domain/         elements, edges, edge kind table
//! - ports/          serializer port
//! - infrastructure/ selector, node index, edge builders, graph, DOT/JSON
//! - application/    per-file pipeline (`PdgExtractor`)

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;
