//! Forward dataflow analyses over a procedure CFG
//!
//! - use-def: last-use tracking, yields node-level DATA edges
//! - name-flow: symbolic name propagation, yields NAME links and bindings
//!
//! Both run on the solver behind the `FixpointSolver` port.

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{
    AbstractStore, AnalysisResult, DataEdge, DataflowValue, FormalRef, NameKind, NameRecord,
    NameStore, UseDefStore,
};
pub use infrastructure::{
    analyze_name_flow, analyze_use_def, DataflowError, DataflowResult, NameFlowTransfer,
    UseDefTransfer, WorklistSolver,
};
pub use ports::{FixpointSolver, ForwardTransfer};
