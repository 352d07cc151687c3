pub mod errors;
mod name_flow;
mod solver;
mod use_def;

pub use errors::{DataflowError, DataflowResult};
pub use name_flow::{analyze_name_flow, NameFlowTransfer};
pub use solver::WorklistSolver;
pub use use_def::{analyze_use_def, UseDefTransfer};
