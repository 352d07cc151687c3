use crate::features::data_flow::infrastructure::errors::{DataflowError, DataflowResult};
use crate::features::flow_graph::{BlockId, CfgNodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One occurrence of a low-level CFG node
///
/// Compared by node identity, never by text: two identical expressions at
/// different program points are different values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataflowValue(pub CfgNodeId);

impl DataflowValue {
    pub fn node(self) -> CfgNodeId {
        self.0
    }
}

impl From<CfgNodeId> for DataflowValue {
    fn from(node: CfgNodeId) -> Self {
        Self(node)
    }
}

impl fmt::Display for DataflowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Join semilattice carried by a forward analysis
///
/// `join` must be pure, commutative and monotone (never shrinks either
/// operand); `Clone`/`Eq` give the solver its copy and equality hooks.
pub trait AbstractStore: Clone + Eq + fmt::Debug {
    /// Analysis name used in diagnostics
    const ANALYSIS: &'static str;

    /// Least upper bound: self ⊔ other
    fn join(&self, other: &Self) -> Self;

    /// Partial order: self ⊑ other
    fn less_than_or_equal(&self, other: &Self) -> bool;

    /// Widened bound of `self` and `next`
    ///
    /// Finite-height stores have no widening; the default reports the request
    /// as a fatal contract violation.
    fn widen(&self, _next: &Self) -> DataflowResult<Self> {
        Err(DataflowError::WideningUnsupported {
            analysis: Self::ANALYSIS,
        })
    }
}

/// Per-block stores at the fixpoint
#[derive(Debug, Clone)]
pub struct AnalysisResult<S: AbstractStore> {
    pub block_in: BTreeMap<BlockId, S>,
    pub block_out: BTreeMap<BlockId, S>,
    /// Block visits taken to converge
    pub iterations: usize,
}

impl<S: AbstractStore> AnalysisResult<S> {
    pub fn out_store(&self, block: BlockId) -> Option<&S> {
        self.block_out.get(&block)
    }

    /// Join of every block's out-store; `None` if no block was visited
    pub fn joined_out(&self) -> Option<S> {
        let mut stores = self.block_out.values();
        let first = stores.next()?.clone();
        Some(stores.fold(first, |acc, store| acc.join(store)))
    }
}
