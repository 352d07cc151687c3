//! PDG (Program Dependence Graph) domain models
//!
//! Elements are statement-level fragments plus three synthetic nodes per
//! procedure; edges carry one of five kinds.

use crate::features::syntax::SyntaxId;
use crate::shared::models::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element id, unique within its procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

impl ElementId {
    pub const ENTRY: ElementId = ElementId(0);
    pub const EXIT: ElementId = ElementId(1);
    pub const EXCEPTIONAL_EXIT: ElementId = ElementId(2);
    /// First id handed to a selected fragment
    pub const FIRST_FRAGMENT: ElementId = ElementId(3);
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Procedure position within its file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcedureId(pub u32);

impl ProcedureId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// File-wide element address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementRef {
    pub procedure: ProcedureId,
    pub element: ElementId,
}

impl ElementRef {
    pub fn new(procedure: ProcedureId, element: ElementId) -> Self {
        Self { procedure, element }
    }

    pub fn entry(procedure: ProcedureId) -> Self {
        Self::new(procedure, ElementId::ENTRY)
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}_{}", self.procedure.0, self.element.0)
    }
}

/// Why a fragment was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    Declaration,
    Assignment,
    Call,
    Return,
    Throw,
    Unary,
    /// Condition of if/loop/switch
    Condition,
    /// Iterable of a for-each loop
    Iteration,
    Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Entry,
    Exit,
    ExceptionalExit,
    Fragment { syntax: SyntaxId, kind: FragmentKind },
}

impl ElementKind {
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, ElementKind::Fragment { .. })
    }

    pub fn syntax(&self) -> Option<SyntaxId> {
        match self {
            ElementKind::Fragment { syntax, .. } => Some(*syntax),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdgElement {
    pub id: ElementId,
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Source text of the fragment, or the synthetic node name
    pub label: String,
    pub span: Span,
    pub procedure: ProcedureId,
}

impl PdgElement {
    pub fn element_ref(&self) -> ElementRef {
        ElementRef::new(self.procedure, self.id)
    }
}

/// Edge kind with its fixed rendering attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    Control,
    Data,
    Call,
    Name,
    Exit,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 5] = [
        EdgeKind::Control,
        EdgeKind::Data,
        EdgeKind::Call,
        EdgeKind::Name,
        EdgeKind::Exit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Control => "CONTROL",
            EdgeKind::Data => "DATA",
            EdgeKind::Call => "CALL",
            EdgeKind::Name => "NAME",
            EdgeKind::Exit => "EXIT",
        }
    }

    /// Numeric key; EXIT shares CONTROL's
    pub fn key(&self) -> u8 {
        match self {
            EdgeKind::Control | EdgeKind::Exit => 0,
            EdgeKind::Data => 1,
            EdgeKind::Call => 2,
            EdgeKind::Name => 3,
        }
    }

    pub fn style(&self) -> &'static str {
        match self {
            EdgeKind::Control => "solid",
            EdgeKind::Data => "dashed",
            EdgeKind::Call => "dotted",
            EdgeKind::Name | EdgeKind::Exit => "bold",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            EdgeKind::Control | EdgeKind::Call => "black",
            EdgeKind::Data => "darkgreen",
            EdgeKind::Name => "purple",
            EdgeKind::Exit => "blue",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed edge; field order is the output sort order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PdgEdge {
    pub from: ElementRef,
    pub to: ElementRef,
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PdgEdge {
    pub fn new(from: ElementRef, to: ElementRef, kind: EdgeKind, label: Option<String>) -> Self {
        Self {
            from,
            to,
            kind,
            label,
        }
    }

    pub fn is_interprocedural(&self) -> bool {
        self.from.procedure != self.to.procedure
    }
}
