/*
 * Forward worklist solver
 *
 * - REGULAR blocks apply the transfer to each node in order
 * - EXCEPTION blocks apply it to their guarded node
 * - CONDITIONAL / SPECIAL blocks are identity
 * - out-store flows to every successor (exceptional ones included) and is
 *   joined into the successor's in-store
 *
 * Blocks are popped in id order so the visit sequence is reproducible.
 */

use crate::config::SolverConfig;
use crate::features::data_flow::domain::{AbstractStore, AnalysisResult};
use crate::features::data_flow::infrastructure::errors::{DataflowError, DataflowResult};
use crate::features::data_flow::ports::{FixpointSolver, ForwardTransfer};
use crate::features::flow_graph::{BlockId, ControlFlowGraph};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct WorklistSolver {
    config: SolverConfig,
}

impl WorklistSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl FixpointSolver for WorklistSolver {
    fn solve<T: ForwardTransfer>(
        &self,
        cfg: &ControlFlowGraph,
        transfer: &T,
    ) -> DataflowResult<AnalysisResult<T::Store>> {
        let analysis = <T::Store as AbstractStore>::ANALYSIS;
        let mut block_in: BTreeMap<BlockId, T::Store> = BTreeMap::new();
        let mut block_out: BTreeMap<BlockId, T::Store> = BTreeMap::new();
        let mut visits: BTreeMap<BlockId, usize> = BTreeMap::new();
        let mut worklist: BTreeSet<BlockId> = BTreeSet::new();
        let mut iterations = 0usize;

        if let Some(entry) = cfg.entry_block() {
            block_in.insert(entry, transfer.initial_store(cfg));
            worklist.insert(entry);
        }

        while let Some(id) = worklist.pop_first() {
            iterations += 1;
            if iterations > self.config.max_iterations {
                return Err(DataflowError::NonConvergence {
                    analysis,
                    iterations: self.config.max_iterations,
                });
            }

            let Some(block) = cfg.block(id) else {
                continue;
            };
            let mut store = match block_in.get(&id) {
                Some(store) => store.clone(),
                None => continue,
            };
            *visits.entry(id).or_default() += 1;

            for node_id in block.nodes() {
                if let Some(node) = cfg.node(*node_id) {
                    transfer.transfer(cfg, node, &mut store);
                }
            }

            let successors: BTreeSet<BlockId> = block.successors().into_iter().collect();
            for succ in successors {
                let updated = match block_in.get(&succ) {
                    None => store.clone(),
                    Some(previous) => {
                        if store.less_than_or_equal(previous) {
                            continue;
                        }
                        let joined = previous.join(&store);
                        let revisits = visits.get(&succ).copied().unwrap_or(0);
                        match self.config.widening_threshold {
                            Some(threshold) if revisits > threshold => previous.widen(&joined)?,
                            _ => joined,
                        }
                    }
                };
                block_in.insert(succ, updated);
                worklist.insert(succ);
            }

            block_out.insert(id, store);
        }

        trace!(analysis, iterations, blocks = block_out.len(), "fixpoint reached");

        Ok(AnalysisResult {
            block_in,
            block_out,
            iterations,
        })
    }
}
