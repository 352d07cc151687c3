//! PDG infrastructure
//!
//! Stage order per procedure: element_selector → node_index →
//! control_edges, dataflow_edges; per file: call_resolver, then dot/serializer.

pub mod call_resolver;
pub mod context;
pub mod control_edges;
pub mod dataflow_edges;
pub mod dot;
pub mod element_selector;
pub mod node_index;
pub mod pdg;
pub mod serializer;

pub use call_resolver::LocalCallResolver;
pub use context::{procedure_signature, BuildContext};
pub use control_edges::{ControlEdgeBuilder, SpecialRegistry};
pub use dataflow_edges::{add_data_edges, add_name_edges, ElementResolver, RETURN_LABEL};
pub use dot::escape_dot;
pub use element_selector::{select_elements, SelectedElement};
pub use node_index::NodeElementIndex;
pub use pdg::{FilePdg, PdgStats, ProcedurePdg, ProcedurePdgDto};
pub use serializer::{serializer_for, DotSerializer, JsonSerializer};
