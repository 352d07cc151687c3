//! Common test utilities for codegraph-pdg integration tests
//!
//! - `builders`: `UnitBuilder`, a miniature front end producing tree + CFG
//! - `fixtures`: ready-made compilation units
//! - `assertions`: edge-level assertions

#![allow(dead_code, unused_imports)]

mod assertions;
mod builders;
mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
