//! Graphviz DOT rendering of a `FilePdg`
//!
//! One cluster per procedure (labelled with its signature) holding the
//! element nodes, then every edge of the file in sorted order:
//!
//! ```text
//! digraph "A.java" {
//!   subgraph cluster_0 {
//!     label="run <> -> null";
//!     n0_0 [label="Entry", span="1-4"];
//!   }
//!   n0_0 -> n0_3 [key=0, style=solid, color=black];
//! }
//! ```

use super::pdg::FilePdg;
use crate::features::pdg::domain::PdgEdge;
use std::fmt::Write;

/// Escape a string for a quoted DOT attribute
pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
}

fn write_edge(dot: &mut String, edge: &PdgEdge) {
    let kind = edge.kind;
    let _ = write!(
        dot,
        "  {} -> {} [key={}, style={}, color={}",
        edge.from,
        edge.to,
        kind.key(),
        kind.style(),
        kind.color()
    );
    if let Some(label) = &edge.label {
        let _ = write!(dot, ", label=\"{}\"", escape_dot(label));
    }
    dot.push_str("];\n");
}

impl FilePdg {
    /// Deterministic DOT document for the whole file
    pub fn to_dot(&self) -> String {
        let mut dot = String::new();
        let _ = writeln!(dot, "digraph \"{}\" {{", escape_dot(&self.path));

        for procedure in &self.procedures {
            let _ = writeln!(dot, "  subgraph cluster_{} {{", procedure.id.0);
            let _ = writeln!(dot, "    label=\"{}\";", escape_dot(&procedure.signature.to_string()));
            for element in procedure.elements() {
                let _ = writeln!(
                    dot,
                    "    {} [label=\"{}\", span=\"{}\"];",
                    element.element_ref(),
                    escape_dot(&element.label),
                    element.span.line_range()
                );
            }
            dot.push_str("  }\n");
        }

        for edge in self.all_edges() {
            write_edge(&mut dot, &edge);
        }

        dot.push_str("}\n");
        dot
    }
}
