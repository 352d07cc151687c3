//! Test data builders
//!
//! `UnitBuilder` plays the front end: every helper adds the syntax fragment
//! and the CFG nodes for it, so tree and graph stay consistent. Each fragment
//! gets its own source line, so element order follows creation order.

use codegraph_pdg::{
    BlockId, CfgNodeId, CfgNodeKind, CompilationUnit, ControlFlowGraphBuilder, Declaration,
    ProcedureDecl, ProcedureDeclaration, ProcedureSignature, Span, SymbolTable, SyntaxId,
    SyntaxKind, SyntaxTree,
};

pub const ENTRY: BlockId = ControlFlowGraphBuilder::ENTRY;
pub const EXIT: BlockId = ControlFlowGraphBuilder::EXIT;
pub const EXCEPTIONAL_EXIT: BlockId = ControlFlowGraphBuilder::EXCEPTIONAL_EXIT;

/// Expression: its fragment, its value node and all nodes in evaluation order
#[derive(Debug, Clone)]
pub struct Expr {
    pub syntax: SyntaxId,
    pub node: CfgNodeId,
    pub nodes: Vec<CfgNodeId>,
}

/// Statement: its fragment and the CFG nodes a block should own for it
#[derive(Debug, Clone)]
pub struct Stmt {
    pub syntax: SyntaxId,
    pub nodes: Vec<CfgNodeId>,
}

pub struct UnitBuilder {
    pub tree: SyntaxTree,
    pub cfg: ControlFlowGraphBuilder,
    pub symbols: SymbolTable,
    owner: String,
    line: u32,
    procedures: Vec<(SyntaxId, ControlFlowGraphBuilder)>,
}

impl UnitBuilder {
    pub fn new(owner: &str) -> Self {
        Self {
            tree: SyntaxTree::new(),
            cfg: ControlFlowGraphBuilder::new(),
            symbols: SymbolTable::new(),
            owner: owner.to_string(),
            line: 0,
            procedures: Vec::new(),
        }
    }

    fn add(&mut self, kind: SyntaxKind, text: impl Into<String>) -> SyntaxId {
        self.line += 1;
        self.tree
            .add(kind, text, Span::new(self.line, 4, self.line, 40))
    }

    fn node(&mut self, kind: CfgNodeKind, syntax: SyntaxId) -> CfgNodeId {
        self.cfg.add_node(kind, Some(syntax))
    }

    fn text(&self, id: SyntaxId) -> String {
        self.tree.get(id).map(|n| n.text.clone()).unwrap_or_default()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════════

    pub fn var(&mut self, name: &str) -> Expr {
        let syntax = self.add(SyntaxKind::Identifier { name: name.into() }, name);
        let node = self.node(CfgNodeKind::LocalVariable { name: name.into() }, syntax);
        Expr {
            syntax,
            node,
            nodes: vec![node],
        }
    }

    pub fn lit(&mut self, value: &str) -> Expr {
        let syntax = self.add(SyntaxKind::Literal { value: value.into() }, value);
        let node = self.node(CfgNodeKind::Literal { value: value.into() }, syntax);
        Expr {
            syntax,
            node,
            nodes: vec![node],
        }
    }

    pub fn binary(&mut self, operator: &str, lhs: Expr, rhs: Expr) -> Expr {
        let text = format!("{} {operator} {}", self.text(lhs.syntax), self.text(rhs.syntax));
        let syntax = self.add(
            SyntaxKind::Binary {
                operator: operator.into(),
                lhs: lhs.syntax,
                rhs: rhs.syntax,
            },
            text,
        );
        let node = self.node(
            CfgNodeKind::Binary {
                lhs: lhs.node,
                rhs: rhs.node,
            },
            syntax,
        );
        let mut nodes = lhs.nodes;
        nodes.extend(rhs.nodes);
        nodes.push(node);
        Expr { syntax, node, nodes }
    }

    /// Unqualified call `name(args)`
    pub fn call(&mut self, name: &str, args: Vec<Expr>) -> Expr {
        let text = format!(
            "{name}({})",
            args.iter()
                .map(|a| self.text(a.syntax))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let syntax = self.add(
            SyntaxKind::MethodInvocation {
                name: name.into(),
                receiver: None,
                arguments: args.iter().map(|a| a.syntax).collect(),
            },
            text,
        );
        let node = self.node(
            CfgNodeKind::MethodInvocation {
                name: name.into(),
                receiver: None,
                arguments: args.iter().map(|a| a.node).collect(),
            },
            syntax,
        );
        let mut nodes: Vec<CfgNodeId> = args.into_iter().flat_map(|a| a.nodes).collect();
        nodes.push(node);
        Expr { syntax, node, nodes }
    }

    /// Record what a call site resolves to
    pub fn resolve_call(&mut self, call: &Expr, signature: ProcedureSignature, formals: &[&str]) {
        self.symbols.declare(
            call.syntax,
            Declaration::Procedure(ProcedureDeclaration {
                signature,
                parameter_names: formals.iter().map(|f| f.to_string()).collect(),
            }),
        );
    }

    /// Signature of a procedure declared in this unit
    pub fn local_signature(&self, name: &str, parameter_types: &[&str], return_type: Option<&str>) -> ProcedureSignature {
        ProcedureSignature::new(name, parameter_types.iter().copied(), return_type)
            .with_owner(self.owner.clone())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════════

    /// `ty name (= init)?;`
    pub fn declare(&mut self, ty: &str, name: &str, init: Option<Expr>) -> Stmt {
        let text = match &init {
            Some(init) => format!("{ty} {name} = {}", self.text(init.syntax)),
            None => format!("{ty} {name}"),
        };
        let syntax = self.add(
            SyntaxKind::VariableDeclaration {
                name: name.into(),
                ty: ty.into(),
                initializer: init.as_ref().map(|i| i.syntax),
            },
            text,
        );
        let decl = self.node(CfgNodeKind::VariableDeclaration { name: name.into() }, syntax);
        let mut nodes = vec![decl];
        if let Some(init) = init {
            nodes.extend(init.nodes);
            let target = self.node(CfgNodeKind::LocalVariable { name: name.into() }, syntax);
            let assign = self.node(
                CfgNodeKind::Assignment {
                    target,
                    expression: init.node,
                },
                syntax,
            );
            nodes.push(target);
            nodes.push(assign);
        }
        Stmt { syntax, nodes }
    }

    /// `name = value;`
    pub fn assign(&mut self, name: &str, value: Expr) -> Stmt {
        let target_syntax = self.add(SyntaxKind::Identifier { name: name.into() }, name);
        let text = format!("{name} = {}", self.text(value.syntax));
        let syntax = self.add(
            SyntaxKind::Assignment {
                target: target_syntax,
                value: value.syntax,
            },
            text.clone(),
        );
        let target = self.node(CfgNodeKind::LocalVariable { name: name.into() }, target_syntax);
        let assign = self.node(
            CfgNodeKind::Assignment {
                target,
                expression: value.node,
            },
            syntax,
        );
        let mut nodes = value.nodes;
        nodes.push(target);
        nodes.push(assign);
        self.expression_statement(syntax, text, nodes)
    }

    /// `expr;`
    pub fn expr_stmt(&mut self, expr: Expr) -> Stmt {
        let text = self.text(expr.syntax);
        self.expression_statement(expr.syntax, text, expr.nodes)
    }

    fn expression_statement(&mut self, expression: SyntaxId, text: String, nodes: Vec<CfgNodeId>) -> Stmt {
        let syntax = self.add(SyntaxKind::ExpressionStatement { expression }, format!("{text};"));
        Stmt { syntax, nodes }
    }

    /// `return (value)?;`
    pub fn ret(&mut self, value: Option<Expr>) -> Stmt {
        let text = match &value {
            Some(v) => format!("return {}", self.text(v.syntax)),
            None => "return".to_string(),
        };
        let syntax = self.add(
            SyntaxKind::Return {
                expression: value.as_ref().map(|v| v.syntax),
            },
            text,
        );
        let node = self.node(
            CfgNodeKind::Return {
                result: value.as_ref().map(|v| v.node),
            },
            syntax,
        );
        let mut nodes = value.map(|v| v.nodes).unwrap_or_default();
        nodes.push(node);
        Stmt { syntax, nodes }
    }

    /// `throw new name();`
    pub fn throw(&mut self, exception: &str) -> Stmt {
        let creation_syntax = self.add(
            SyntaxKind::NewObject {
                class: exception.into(),
                arguments: vec![],
            },
            format!("new {exception}()"),
        );
        let syntax = self.add(
            SyntaxKind::Throw {
                expression: creation_syntax,
            },
            format!("throw new {exception}()"),
        );
        let creation = self.node(
            CfgNodeKind::ObjectCreation {
                class: exception.into(),
                arguments: vec![],
            },
            creation_syntax,
        );
        let node = self.node(CfgNodeKind::Throw { exception: creation }, syntax);
        Stmt {
            syntax,
            nodes: vec![creation, node],
        }
    }

    /// `break;` (no CFG node of its own)
    pub fn brk(&mut self) -> Stmt {
        let syntax = self.add(SyntaxKind::Break { label: None }, "break");
        Stmt {
            syntax,
            nodes: Vec::new(),
        }
    }

    pub fn block(&mut self, statements: &[&Stmt]) -> SyntaxId {
        self.add(
            SyntaxKind::Block {
                statements: statements.iter().map(|s| s.syntax).collect(),
            },
            "{ .. }",
        )
    }

    /// `if (condition) then else otherwise`
    pub fn if_else(&mut self, condition: &Expr, then_branch: SyntaxId, else_branch: Option<SyntaxId>) -> Stmt {
        let syntax = self.add(
            SyntaxKind::If {
                condition: condition.syntax,
                then_branch,
                else_branch,
            },
            format!("if ({})", self.text(condition.syntax)),
        );
        Stmt {
            syntax,
            nodes: Vec::new(),
        }
    }

    /// `while (condition) body`
    pub fn while_loop(&mut self, condition: &Expr, body: SyntaxId) -> Stmt {
        let syntax = self.add(
            SyntaxKind::While {
                condition: condition.syntax,
                body,
            },
            format!("while ({})", self.text(condition.syntax)),
        );
        Stmt {
            syntax,
            nodes: Vec::new(),
        }
    }

    /// `case label: body` ; `None` is `default:`
    pub fn case(&mut self, label: Option<&Expr>, body: &[&Stmt]) -> SyntaxId {
        let text = match label {
            Some(l) => format!("case {}:", self.text(l.syntax)),
            None => "default:".to_string(),
        };
        self.add(
            SyntaxKind::Case {
                labels: label.iter().map(|l| l.syntax).collect(),
                body: body.iter().map(|s| s.syntax).collect(),
            },
            text,
        )
    }

    pub fn switch(&mut self, selector: &Expr, cases: Vec<SyntaxId>) -> Stmt {
        let syntax = self.add(
            SyntaxKind::Switch {
                selector: selector.syntax,
                cases,
            },
            format!("switch ({})", self.text(selector.syntax)),
        );
        Stmt {
            syntax,
            nodes: Vec::new(),
        }
    }

    /// Comparison node a front end emits for a case label; owned by no element
    pub fn case_test(&mut self, selector: &str, label: &Expr) -> CfgNodeId {
        self.cfg.add_node(
            CfgNodeKind::Other {
                label: format!("{selector} == {}", self.text(label.syntax)),
                operands: vec![label.node],
            },
            None,
        )
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Procedures
    // ═══════════════════════════════════════════════════════════════════════

    /// Formal parameter: a declaration fragment plus a block-less CFG node
    pub fn param(&mut self, ty: &str, name: &str) -> SyntaxId {
        let syntax = self.add(
            SyntaxKind::VariableDeclaration {
                name: name.into(),
                ty: ty.into(),
                initializer: None,
            },
            format!("{ty} {name}"),
        );
        self.cfg.add_parameter(name, Some(syntax));
        syntax
    }

    /// Single regular block holding `statements`, Entry → block → Exit
    pub fn straight_line(&mut self, statements: &[&Stmt]) -> BlockId {
        let nodes = statements.iter().flat_map(|s| s.nodes.iter().copied()).collect();
        let block = self.cfg.regular_block(nodes);
        self.cfg.set_successor(ENTRY, block);
        self.cfg.set_successor(block, EXIT);
        block
    }

    /// Close the current procedure; its CFG builder is taken and reset
    pub fn finish_procedure(
        &mut self,
        name: &str,
        parameters: Vec<SyntaxId>,
        return_type: Option<&str>,
        body: &[&Stmt],
    ) -> SyntaxId {
        let body = self.block(body);
        let declaration = self.add(
            SyntaxKind::Procedure(ProcedureDecl {
                name: name.into(),
                owner: Some(self.owner.clone()),
                parameters,
                return_type: return_type.map(str::to_string),
                body: Some(body),
            }),
            format!("{name}(..)"),
        );
        let cfg = std::mem::replace(&mut self.cfg, ControlFlowGraphBuilder::new());
        self.procedures.push((declaration, cfg));
        declaration
    }

    pub fn build(self, path: &str) -> CompilationUnit {
        let mut unit = CompilationUnit::new(path, self.tree).with_symbols(self.symbols);
        for (declaration, cfg) in self.procedures {
            unit.add_procedure(declaration, cfg.build().expect("fixture CFG is well formed"));
        }
        unit
    }
}
