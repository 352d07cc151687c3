/*
 * PDG extraction use case
 *
 * Per procedure (rayon under the `parallel` feature, collected in order):
 *   select elements → node index → CONTROL/EXIT → use-def DATA → name-flow NAME
 * Per file, afterwards:
 *   local CALL edges → argument-binding NAME edges
 *
 * Procedure ids follow input order; procedures without a body are skipped.
 */

use crate::config::PdgConfig;
use crate::errors::{PdgError, Result};
use crate::features::data_flow::{analyze_name_flow, analyze_use_def, NameStore, WorklistSolver};
use crate::features::flow_graph::ControlFlowGraph;
use crate::features::pdg::domain::{ElementId, ElementKind, ProcedureId};
use crate::features::pdg::infrastructure::{
    add_data_edges, add_name_edges, procedure_signature, select_elements, serializer_for,
    BuildContext, ControlEdgeBuilder, ElementResolver, FilePdg, LocalCallResolver,
    NodeElementIndex, ProcedurePdg,
};
use crate::features::pdg::ports::OutputFormat;
use crate::features::syntax::{ProcedureSignature, SymbolResolver, SymbolTable, SyntaxId, SyntaxTree};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// ═══════════════════════════════════════════════════════════════════════════
// Input
// ═══════════════════════════════════════════════════════════════════════════

/// One procedure and the CFG the front end built for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureSource {
    /// `Procedure` fragment in the unit's tree
    pub declaration: SyntaxId,
    pub cfg: ControlFlowGraph,
}

/// Everything the front end hands over for one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub path: String,
    pub tree: SyntaxTree,
    /// Precomputed resolution; ignored when a resolver is passed explicitly
    #[serde(default)]
    pub symbols: SymbolTable,
    pub procedures: Vec<ProcedureSource>,
}

impl CompilationUnit {
    pub fn new(path: impl Into<String>, tree: SyntaxTree) -> Self {
        Self {
            path: path.into(),
            tree,
            symbols: SymbolTable::new(),
            procedures: Vec::new(),
        }
    }

    pub fn with_symbols(mut self, symbols: SymbolTable) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn add_procedure(&mut self, declaration: SyntaxId, cfg: ControlFlowGraph) {
        self.procedures.push(ProcedureSource { declaration, cfg });
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Extractor
// ═══════════════════════════════════════════════════════════════════════════

struct ProcedureJob<'a> {
    id: ProcedureId,
    signature: ProcedureSignature,
    source: &'a ProcedureSource,
}

struct ProcedureOutput {
    pdg: ProcedurePdg,
    index: NodeElementIndex,
    names: Option<NameStore>,
}

/// Builds the `FilePdg` of a compilation unit
#[derive(Debug, Clone, Default)]
pub struct PdgExtractor {
    config: PdgConfig,
    solver: WorklistSolver,
}

impl PdgExtractor {
    /// Extractor with a validated configuration
    pub fn new(config: PdgConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            solver: WorklistSolver::new(config.solver.clone()),
            config,
        })
    }

    pub fn config(&self) -> &PdgConfig {
        &self.config
    }

    /// Build using the unit's own symbol table
    pub fn extract(&self, unit: &CompilationUnit) -> Result<FilePdg> {
        self.build_file(unit, &unit.symbols)
    }

    /// Build with an external symbol oracle
    pub fn build_file(&self, unit: &CompilationUnit, resolver: &dyn SymbolResolver) -> Result<FilePdg> {
        unit.tree.validate()?;

        let mut context = BuildContext::new();
        let mut jobs = Vec::with_capacity(unit.procedures.len());
        for source in &unit.procedures {
            let Some(decl) = unit.tree.procedure(source.declaration) else {
                return Err(PdgError::invalid_input(format!(
                    "{} in {} is not a procedure",
                    source.declaration, unit.path
                )));
            };
            if decl.body.is_none() {
                debug!(procedure = %decl.name, "procedure without body skipped");
                continue;
            }
            let Some(signature) = procedure_signature(&unit.tree, resolver, source.declaration) else {
                debug!(
                    procedure = %source.declaration,
                    path = %unit.path,
                    "procedure signature unresolved; skipped"
                );
                continue;
            };
            let id = ProcedureId(jobs.len() as u32);
            context.register(id, signature.clone());
            jobs.push(ProcedureJob {
                id,
                signature,
                source,
            });
        }

        #[cfg(feature = "parallel")]
        let outputs: Vec<Result<ProcedureOutput>> = jobs
            .par_iter()
            .map(|job| self.build_procedure(job, &unit.tree, resolver))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let outputs: Vec<Result<ProcedureOutput>> = jobs
            .iter()
            .map(|job| self.build_procedure(job, &unit.tree, resolver))
            .collect();
        let outputs = outputs.into_iter().collect::<Result<Vec<_>>>()?;

        let mut file = FilePdg::new(unit.path.clone());
        let mut cross_edges = Vec::new();
        {
            let calls = LocalCallResolver::new(&context, &unit.tree, resolver);
            for (job, output) in jobs.iter().zip(&outputs) {
                if self.config.include_call {
                    cross_edges.extend(calls.call_edges(&output.pdg));
                }
                if let Some(names) = &output.names {
                    let elements = ElementResolver::new(&job.source.cfg, &output.index);
                    cross_edges.extend(calls.argument_edges(&output.pdg, names, |name| {
                        elements.declaring_element(names, name)
                    }));
                }
            }
        }

        file.procedures = outputs.into_iter().map(|output| output.pdg).collect();
        for edge in cross_edges {
            file.add_edge(edge);
        }

        let stats = file.stats();
        info!(
            path = %file.path,
            procedures = file.procedures.len(),
            elements = stats.element_count,
            control = stats.control_edges,
            data = stats.data_edges,
            name = stats.name_edges,
            call = stats.call_edges,
            interprocedural = file.interprocedural_edges.len(),
            "PDG built"
        );
        Ok(file)
    }

    fn build_procedure(
        &self,
        job: &ProcedureJob<'_>,
        tree: &SyntaxTree,
        resolver: &dyn SymbolResolver,
    ) -> Result<ProcedureOutput> {
        let cfg = &job.source.cfg;
        let declaration = job.source.declaration;

        let selected = select_elements(tree, declaration);
        let element_count = selected.len() + ElementId::FIRST_FRAGMENT.0 as usize;
        if element_count > self.config.max_elements {
            return Err(PdgError::invalid_input(format!(
                "procedure {} has {} elements (limit {})",
                job.signature, element_count, self.config.max_elements
            )));
        }

        let span = tree.get(declaration).map(|n| n.span).unwrap_or_default();
        let mut pdg = ProcedurePdg::new(job.id, job.signature.clone(), declaration, span);
        let mut anchors = Vec::with_capacity(selected.len());
        for element in &selected {
            let (label, span) = tree
                .get(element.syntax)
                .map(|n| (n.text.clone(), n.span))
                .unwrap_or_default();
            let id = pdg.add_element(
                ElementKind::Fragment {
                    syntax: element.syntax,
                    kind: element.kind,
                },
                label,
                span,
            );
            anchors.push((id, element.syntax));
        }

        let index = NodeElementIndex::build(tree, cfg, anchors);
        let elements = ElementResolver::new(cfg, &index);

        if self.config.include_control {
            ControlEdgeBuilder::new(cfg, &index).build(&mut pdg, self.config.emit_exit_edge);
            let unreachable = pdg.unreachable_from_entry();
            if !unreachable.is_empty() {
                debug!(
                    procedure = %job.signature,
                    count = unreachable.len(),
                    elements = ?unreachable,
                    "elements unreachable from Entry"
                );
            }
        }

        if self.config.include_data {
            let edges = analyze_use_def(cfg, &self.solver)?;
            add_data_edges(&mut pdg, &elements, &edges);
        }

        let names = if self.config.include_name {
            let store = analyze_name_flow(cfg, resolver, &self.solver)?;
            add_name_edges(&mut pdg, &elements, &store);
            Some(store)
        } else {
            None
        };

        debug!(
            procedure = %job.signature,
            elements = pdg.element_count(),
            indexed_nodes = index.len(),
            edges = pdg.stats().edge_count,
            "procedure PDG built"
        );
        Ok(ProcedureOutput { pdg, index, names })
    }

    /// Build and render in one step
    pub fn render(&self, unit: &CompilationUnit, format: OutputFormat) -> Result<String> {
        let pdg = self.extract(unit)?;
        serializer_for(format).serialize(&pdg)
    }
}
