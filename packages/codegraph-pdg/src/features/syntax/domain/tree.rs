//! Arena-backed syntax tree
//!
//! Fragments are addressed by `SyntaxId` (index into the arena). A node's
//! children must be added before the node itself, which keeps the arena
//! acyclic and lets `add` fill in parent links.

use crate::errors::{PdgError, Result};
use crate::features::syntax::domain::ProcedureSignature;
use crate::shared::models::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a fragment in its `SyntaxTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyntaxId(pub u32);

impl SyntaxId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SyntaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
    Plus,
    Minus,
    Not,
    BitwiseComplement,
}

impl UnaryOperator {
    /// `++`/`--` in either position
    pub fn is_update(self) -> bool {
        matches!(
            self,
            UnaryOperator::PreIncrement
                | UnaryOperator::PreDecrement
                | UnaryOperator::PostIncrement
                | UnaryOperator::PostDecrement
        )
    }

    pub fn is_postfix(self) -> bool {
        matches!(
            self,
            UnaryOperator::PostIncrement | UnaryOperator::PostDecrement
        )
    }
}

/// Procedure header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureDecl {
    pub name: String,
    /// Enclosing type, used to qualify the signature
    #[serde(default)]
    pub owner: Option<String>,
    /// Formal parameters, each a `VariableDeclaration`
    pub parameters: Vec<SyntaxId>,
    /// `None` for constructors and `void`
    #[serde(default)]
    pub return_type: Option<String>,
    /// `None` for abstract/native procedures
    #[serde(default)]
    pub body: Option<SyntaxId>,
}

/// Closed set of fragment kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyntaxKind {
    Procedure(ProcedureDecl),
    Block {
        statements: Vec<SyntaxId>,
    },
    ExpressionStatement {
        expression: SyntaxId,
    },
    VariableDeclaration {
        name: String,
        ty: String,
        initializer: Option<SyntaxId>,
    },
    Assignment {
        target: SyntaxId,
        value: SyntaxId,
    },
    CompoundAssignment {
        operator: String,
        target: SyntaxId,
        value: SyntaxId,
    },
    Unary {
        operator: UnaryOperator,
        operand: SyntaxId,
    },
    Binary {
        operator: String,
        lhs: SyntaxId,
        rhs: SyntaxId,
    },
    /// `c ? a : b`
    Conditional {
        condition: SyntaxId,
        then_value: SyntaxId,
        else_value: SyntaxId,
    },
    Cast {
        ty: String,
        expression: SyntaxId,
    },
    InstanceOf {
        expression: SyntaxId,
        ty: String,
    },
    MethodInvocation {
        name: String,
        receiver: Option<SyntaxId>,
        arguments: Vec<SyntaxId>,
    },
    NewObject {
        class: String,
        arguments: Vec<SyntaxId>,
    },
    Identifier {
        name: String,
    },
    Literal {
        value: String,
    },
    FieldAccess {
        receiver: SyntaxId,
        field: String,
    },
    ArrayAccess {
        array: SyntaxId,
        index: SyntaxId,
    },
    Parenthesized {
        expression: SyntaxId,
    },
    Return {
        expression: Option<SyntaxId>,
    },
    Throw {
        expression: SyntaxId,
    },
    If {
        condition: SyntaxId,
        then_branch: SyntaxId,
        else_branch: Option<SyntaxId>,
    },
    While {
        condition: SyntaxId,
        body: SyntaxId,
    },
    DoWhile {
        body: SyntaxId,
        condition: SyntaxId,
    },
    For {
        initializers: Vec<SyntaxId>,
        condition: Option<SyntaxId>,
        updates: Vec<SyntaxId>,
        body: SyntaxId,
    },
    ForEach {
        variable: SyntaxId,
        iterable: SyntaxId,
        body: SyntaxId,
    },
    Switch {
        selector: SyntaxId,
        cases: Vec<SyntaxId>,
    },
    /// `labels` empty for `default:`
    Case {
        labels: Vec<SyntaxId>,
        body: Vec<SyntaxId>,
    },
    Try {
        body: SyntaxId,
        catches: Vec<SyntaxId>,
        finally: Option<SyntaxId>,
    },
    Catch {
        parameter: SyntaxId,
        body: SyntaxId,
    },
    Labeled {
        label: String,
        body: SyntaxId,
    },
    Break {
        label: Option<String>,
    },
    Continue {
        label: Option<String>,
    },
    Empty,
}

impl SyntaxKind {
    /// Direct sub-fragments in source order
    pub fn children(&self) -> Vec<SyntaxId> {
        use SyntaxKind::*;
        match self {
            Procedure(decl) => decl.parameters.iter().copied().chain(decl.body).collect(),
            Block { statements } => statements.clone(),
            ExpressionStatement { expression } => vec![*expression],
            VariableDeclaration { initializer, .. } => initializer.iter().copied().collect(),
            Assignment { target, value } | CompoundAssignment { target, value, .. } => {
                vec![*target, *value]
            }
            Unary { operand, .. } => vec![*operand],
            Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            Conditional {
                condition,
                then_value,
                else_value,
            } => vec![*condition, *then_value, *else_value],
            Cast { expression, .. } | InstanceOf { expression, .. } => vec![*expression],
            MethodInvocation {
                receiver,
                arguments,
                ..
            } => receiver.iter().chain(arguments.iter()).copied().collect(),
            NewObject { arguments, .. } => arguments.clone(),
            FieldAccess { receiver, .. } => vec![*receiver],
            ArrayAccess { array, index } => vec![*array, *index],
            Parenthesized { expression } => vec![*expression],
            Return { expression } => expression.iter().copied().collect(),
            Throw { expression } => vec![*expression],
            If {
                condition,
                then_branch,
                else_branch,
            } => std::iter::once(*condition)
                .chain(std::iter::once(*then_branch))
                .chain(else_branch.iter().copied())
                .collect(),
            While { condition, body } => vec![*condition, *body],
            DoWhile { body, condition } => vec![*body, *condition],
            For {
                initializers,
                condition,
                updates,
                body,
            } => initializers
                .iter()
                .chain(condition.iter())
                .chain(updates.iter())
                .chain(std::iter::once(body))
                .copied()
                .collect(),
            ForEach {
                variable,
                iterable,
                body,
            } => vec![*variable, *iterable, *body],
            Switch { selector, cases } => std::iter::once(*selector)
                .chain(cases.iter().copied())
                .collect(),
            Case { labels, body } => labels.iter().chain(body.iter()).copied().collect(),
            Try {
                body,
                catches,
                finally,
            } => std::iter::once(*body)
                .chain(catches.iter().copied())
                .chain(finally.iter().copied())
                .collect(),
            Catch { parameter, body } => vec![*parameter, *body],
            Labeled { body, .. } => vec![*body],
            Identifier { .. } | Literal { .. } | Break { .. } | Continue { .. } | Empty => {
                Vec::new()
            }
        }
    }

    /// Invocation or constructor call
    pub fn is_call(&self) -> bool {
        matches!(
            self,
            SyntaxKind::MethodInvocation { .. } | SyntaxKind::NewObject { .. }
        )
    }

    /// Fragment evaluates to a value
    pub fn is_expression(&self) -> bool {
        use SyntaxKind::*;
        matches!(
            self,
            Assignment { .. }
                | CompoundAssignment { .. }
                | Unary { .. }
                | Binary { .. }
                | Conditional { .. }
                | Cast { .. }
                | InstanceOf { .. }
                | MethodInvocation { .. }
                | NewObject { .. }
                | Identifier { .. }
                | Literal { .. }
                | FieldAccess { .. }
                | ArrayAccess { .. }
                | Parenthesized { .. }
        )
    }

    /// Short kind name for diagnostics
    pub fn as_str(&self) -> &'static str {
        use SyntaxKind::*;
        match self {
            Procedure(_) => "procedure",
            Block { .. } => "block",
            ExpressionStatement { .. } => "expression_statement",
            VariableDeclaration { .. } => "variable_declaration",
            Assignment { .. } => "assignment",
            CompoundAssignment { .. } => "compound_assignment",
            Unary { .. } => "unary",
            Binary { .. } => "binary",
            Conditional { .. } => "conditional",
            Cast { .. } => "cast",
            InstanceOf { .. } => "instance_of",
            MethodInvocation { .. } => "method_invocation",
            NewObject { .. } => "new_object",
            Identifier { .. } => "identifier",
            Literal { .. } => "literal",
            FieldAccess { .. } => "field_access",
            ArrayAccess { .. } => "array_access",
            Parenthesized { .. } => "parenthesized",
            Return { .. } => "return",
            Throw { .. } => "throw",
            If { .. } => "if",
            While { .. } => "while",
            DoWhile { .. } => "do_while",
            For { .. } => "for",
            ForEach { .. } => "for_each",
            Switch { .. } => "switch",
            Case { .. } => "case",
            Try { .. } => "try",
            Catch { .. } => "catch",
            Labeled { .. } => "labeled",
            Break { .. } => "break",
            Continue { .. } => "continue",
            Empty => "empty",
        }
    }
}

/// One fragment of source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub id: SyntaxId,
    #[serde(flatten)]
    pub kind: SyntaxKind,
    /// Source text of the fragment
    pub text: String,
    pub span: Span,
    #[serde(skip)]
    pub parent: Option<SyntaxId>,
}

/// Serialized form: nodes only, parent links are derived
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SyntaxTreeDto {
    nodes: Vec<SyntaxNode>,
}

/// Syntax tree of one compilation unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SyntaxTreeDto", into = "SyntaxTreeDto")]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl From<SyntaxTreeDto> for SyntaxTree {
    fn from(dto: SyntaxTreeDto) -> Self {
        let mut tree = SyntaxTree::new();
        for node in dto.nodes {
            tree.add(node.kind, node.text, node.span);
        }
        tree
    }
}

impl From<SyntaxTree> for SyntaxTreeDto {
    fn from(tree: SyntaxTree) -> Self {
        SyntaxTreeDto { nodes: tree.nodes }
    }
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a fragment; its children must already be in the tree
    pub fn add(&mut self, kind: SyntaxKind, text: impl Into<String>, span: Span) -> SyntaxId {
        let id = SyntaxId(self.nodes.len() as u32);
        for child in kind.children() {
            if let Some(node) = self.nodes.get_mut(child.index()) {
                node.parent = Some(id);
            }
        }
        self.nodes.push(SyntaxNode {
            id,
            kind,
            text: text.into(),
            span,
            parent: None,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: SyntaxId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.nodes.iter()
    }

    pub fn kind(&self, id: SyntaxId) -> Option<&SyntaxKind> {
        self.get(id).map(|node| &node.kind)
    }

    pub fn parent(&self, id: SyntaxId) -> Option<SyntaxId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: SyntaxId) -> Vec<SyntaxId> {
        self.get(id)
            .map(|node| node.kind.children())
            .unwrap_or_default()
    }

    /// Pre-order walk of `root` and everything under it
    pub fn descendants(&self, root: SyntaxId) -> Vec<SyntaxId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if self.get(id).is_none() {
                continue;
            }
            out.push(id);
            let children = self.children(id);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Pre-order walk that does not enter nested procedures
    pub fn descendants_within_procedure(&self, root: SyntaxId) -> Vec<SyntaxId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            if id != root && matches!(node.kind, SyntaxKind::Procedure(_)) {
                continue;
            }
            out.push(id);
            stack.extend(node.kind.children().into_iter().rev());
        }
        out
    }

    /// Every `Procedure` fragment, in arena order
    pub fn procedures(&self) -> impl Iterator<Item = (SyntaxId, &ProcedureDecl)> {
        self.nodes.iter().filter_map(|node| match &node.kind {
            SyntaxKind::Procedure(decl) => Some((node.id, decl)),
            _ => None,
        })
    }

    pub fn procedure(&self, id: SyntaxId) -> Option<&ProcedureDecl> {
        match self.kind(id)? {
            SyntaxKind::Procedure(decl) => Some(decl),
            _ => None,
        }
    }

    /// Signature from the declared parameter types
    pub fn signature_of(&self, procedure: SyntaxId) -> Option<ProcedureSignature> {
        let decl = self.procedure(procedure)?;
        let parameter_types = decl
            .parameters
            .iter()
            .map(|param| match self.kind(*param) {
                Some(SyntaxKind::VariableDeclaration { ty, .. }) => ty.clone(),
                _ => String::new(),
            })
            .collect();
        Some(ProcedureSignature {
            owner: decl.owner.clone(),
            name: decl.name.clone(),
            parameter_types,
            return_type: decl.return_type.clone(),
        })
    }

    /// Declared parameter names of a procedure
    pub fn parameter_names(&self, procedure: SyntaxId) -> Vec<String> {
        let Some(decl) = self.procedure(procedure) else {
            return Vec::new();
        };
        decl.parameters
            .iter()
            .filter_map(|param| match self.kind(*param) {
                Some(SyntaxKind::VariableDeclaration { name, .. }) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Check that every child reference points at an earlier fragment
    pub fn validate(&self) -> Result<()> {
        for node in &self.nodes {
            for child in node.kind.children() {
                if child >= node.id {
                    return Err(PdgError::invalid_input(format!(
                        "{} {} references {} which is not an earlier fragment",
                        node.kind.as_str(),
                        node.id,
                        child
                    )));
                }
            }
        }
        Ok(())
    }
}
