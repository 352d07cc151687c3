//! Custom assertions for PDG tests

use codegraph_pdg::{EdgeKind, ElementId, FilePdg, ProcedureId, ProcedurePdg};

/// `(from, to, label)` of every edge of `kind`, sorted
pub fn edges_of(pdg: &ProcedurePdg, kind: EdgeKind) -> Vec<(u32, u32, Option<String>)> {
    let mut edges: Vec<_> = pdg
        .edges_of_kind(kind)
        .map(|e| (e.from.element.0, e.to.element.0, e.label.clone()))
        .collect();
    edges.sort();
    edges
}

/// Shorthand for building expected edge lists
pub fn edge(from: u32, to: u32, label: Option<&str>) -> (u32, u32, Option<String>) {
    (from, to, label.map(str::to_string))
}

pub fn procedure(file: &FilePdg, id: u32) -> &ProcedurePdg {
    file.procedure(ProcedureId(id))
        .unwrap_or_else(|| panic!("procedure {id} missing from {}", file.path))
}

/// Assert that a CONTROL edge with exactly this label exists
pub fn assert_control_edge(pdg: &ProcedurePdg, from: u32, to: u32, label: Option<&str>) {
    let found = pdg.edges_of_kind(EdgeKind::Control).any(|e| {
        e.from.element == ElementId(from)
            && e.to.element == ElementId(to)
            && e.label.as_deref() == label
    });
    assert!(
        found,
        "expected CONTROL edge {from} -> {to} ({label:?}) in {}, got {:?}",
        pdg.signature,
        edges_of(pdg, EdgeKind::Control)
    );
}

/// Assert that no edge of `kind` connects the two elements
pub fn assert_no_edge(pdg: &ProcedurePdg, from: u32, to: u32, kind: EdgeKind) {
    assert!(
        !pdg.has_edge(ElementId(from), ElementId(to), kind),
        "unexpected {kind:?} edge {from} -> {to} in {}",
        pdg.signature
    );
}

/// Assert the number of elements (synthetic ones included)
pub fn assert_element_count(pdg: &ProcedurePdg, expected: usize) {
    assert_eq!(
        pdg.element_count(),
        expected,
        "Expected {} elements in {}, got {}",
        expected,
        pdg.signature,
        pdg.element_count()
    );
}

/// Assert the single EXIT edge Exit → Entry
pub fn assert_exit_edge(pdg: &ProcedurePdg) {
    assert_eq!(
        edges_of(pdg, EdgeKind::Exit),
        vec![(ElementId::EXIT.0, ElementId::ENTRY.0, None)],
        "EXIT edge of {}",
        pdg.signature
    );
}

/// Outgoing CONTROL edges of Entry
pub fn entry_out_degree(pdg: &ProcedurePdg) -> usize {
    pdg.dependents(ElementId::ENTRY)
        .into_iter()
        .filter(|e| e.kind == EdgeKind::Control)
        .count()
}

/// Incoming CONTROL edges of Exit
pub fn exit_in_degree(pdg: &ProcedurePdg) -> usize {
    pdg.dependencies(ElementId::EXIT)
        .into_iter()
        .filter(|e| e.kind == EdgeKind::Control)
        .count()
}
