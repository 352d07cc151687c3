/*
 * Dataflow Error Types
 *
 * - WideningUnsupported: a store was asked for a widened bound (fatal)
 * - NonConvergence: solver budget exhausted (recoverable by raising the budget)
 */

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataflowError {
    /// Neither store of this crate has a widening operator; a request for one
    /// means the solver and the lattice disagree about the analysis.
    #[error("{analysis} store does not support widening")]
    WideningUnsupported { analysis: &'static str },

    #[error("{analysis} did not reach a fixpoint within {iterations} block visits")]
    NonConvergence {
        analysis: &'static str,
        iterations: usize,
    },
}

impl DataflowError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, DataflowError::WideningUnsupported { .. })
    }

    pub fn analysis(&self) -> &'static str {
        match self {
            DataflowError::WideningUnsupported { analysis }
            | DataflowError::NonConvergence { analysis, .. } => analysis,
        }
    }
}

/// Result type for dataflow operations
pub type DataflowResult<T> = Result<T, DataflowError>;
