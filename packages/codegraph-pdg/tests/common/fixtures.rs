//! Small Java-shaped programs with hand-built CFGs
//!
//! Element ids noted in each fixture follow source order, starting at 3.

use super::builders::{UnitBuilder, ENTRY, EXCEPTIONAL_EXIT, EXIT};
use codegraph_pdg::CompilationUnit;

/// ```java
/// void classify(int k) {
///     int r;                 // n0_3
///     switch (k) {           // n0_4
///         case 1: r = 10;    // n0_5
///                 break;     // (omitted when `fallthrough`)
///         case 2: r = 20;    // n0_6
///                 break;
///     }
/// }
/// ```
///
/// Case tests live in elementless blocks between the selector and the
/// conditional blocks, the way a front end lowers `switch`.
pub fn switch_unit(fallthrough: bool) -> CompilationUnit {
    let mut u = UnitBuilder::new("A");
    let k = u.param("int", "k");

    let decl_r = u.declare("int", "r", None);
    let selector = u.var("k");
    let one = u.lit("1");
    let ten = u.lit("10");
    let assign_10 = u.assign("r", ten);
    let break_1 = u.brk();
    let case_1 = if fallthrough {
        u.case(Some(&one), &[&assign_10])
    } else {
        u.case(Some(&one), &[&assign_10, &break_1])
    };
    let two = u.lit("2");
    let twenty = u.lit("20");
    let assign_20 = u.assign("r", twenty);
    let break_2 = u.brk();
    let case_2 = u.case(Some(&two), &[&assign_20, &break_2]);
    let switch = u.switch(&selector, vec![case_1, case_2]);

    let test_1 = u.case_test("k", &one);
    let test_2 = u.case_test("k", &two);

    let head = u
        .cfg
        .regular_block(decl_r.nodes.iter().copied().chain([selector.node]).collect());
    let t1 = u.cfg.regular_block(vec![one.node, test_1]);
    let c1 = u.cfg.conditional_block();
    let body_1 = u.cfg.regular_block(assign_10.nodes.clone());
    let t2 = u.cfg.regular_block(vec![two.node, test_2]);
    let c2 = u.cfg.conditional_block();
    let body_2 = u.cfg.regular_block(assign_20.nodes.clone());

    u.cfg.set_successor(ENTRY, head);
    u.cfg.set_successor(head, t1);
    u.cfg.set_successor(t1, c1);
    u.cfg.set_branches(c1, body_1, t2);
    u.cfg.set_successor(t2, c2);
    u.cfg.set_branches(c2, body_2, EXIT);
    u.cfg
        .set_successor(body_1, if fallthrough { body_2 } else { EXIT });
    u.cfg.set_successor(body_2, EXIT);

    u.finish_procedure("classify", vec![k], None, &[&decl_r, &switch]);
    u.build("Switch.java")
}

/// ```java
/// void pick(int c) {
///     int r;            // n0_3
///     if (c > 0) {      // n0_4
///         r = 1;        // n0_5
///     } else {
///         r = 2;        // n0_6
///     }
///     log(r);           // n0_7
/// }
/// ```
pub fn if_else_unit() -> CompilationUnit {
    let mut u = UnitBuilder::new("A");
    let c = u.param("int", "c");

    let decl_r = u.declare("int", "r", None);
    let lhs = u.var("c");
    let zero = u.lit("0");
    let condition = u.binary(">", lhs, zero);
    let one = u.lit("1");
    let then_assign = u.assign("r", one);
    let then_block = u.block(&[&then_assign]);
    let two = u.lit("2");
    let else_assign = u.assign("r", two);
    let else_block = u.block(&[&else_assign]);
    let if_stmt = u.if_else(&condition, then_block, Some(else_block));
    let r = u.var("r");
    let log = u.call("log", vec![r]);
    let log_stmt = u.expr_stmt(log);

    let head = u.cfg.regular_block(
        decl_r
            .nodes
            .iter()
            .chain(condition.nodes.iter())
            .copied()
            .collect(),
    );
    let branch = u.cfg.conditional_block();
    let then_b = u.cfg.regular_block(then_assign.nodes.clone());
    let else_b = u.cfg.regular_block(else_assign.nodes.clone());
    let join = u.cfg.regular_block(log_stmt.nodes.clone());
    u.cfg.set_successor(ENTRY, head);
    u.cfg.set_successor(head, branch);
    u.cfg.set_branches(branch, then_b, else_b);
    u.cfg.set_successor(then_b, join);
    u.cfg.set_successor(else_b, join);
    u.cfg.set_successor(join, EXIT);

    u.finish_procedure("pick", vec![c], None, &[&decl_r, &if_stmt, &log_stmt]);
    u.build("Pick.java")
}

/// ```java
/// void spin(int n) {
///     while (n > 0) {     // n0_3
///         n = n - 1;      // n0_4
///     }
/// }
/// ```
pub fn loop_unit() -> CompilationUnit {
    let mut u = UnitBuilder::new("A");
    let n = u.param("int", "n");

    let lhs = u.var("n");
    let zero = u.lit("0");
    let condition = u.binary(">", lhs, zero);
    let read = u.var("n");
    let one = u.lit("1");
    let minus = u.binary("-", read, one);
    let decrement = u.assign("n", minus);
    let body = u.block(&[&decrement]);
    let while_stmt = u.while_loop(&condition, body);

    let head = u.cfg.regular_block(condition.nodes.clone());
    let branch = u.cfg.conditional_block();
    let body_b = u.cfg.regular_block(decrement.nodes.clone());
    u.cfg.set_successor(ENTRY, head);
    u.cfg.set_successor(head, branch);
    u.cfg.set_branches(branch, body_b, EXIT);
    u.cfg.set_successor(body_b, head);

    u.finish_procedure("spin", vec![n], None, &[&while_stmt]);
    u.build("Spin.java")
}

/// ```java
/// void fail() {
///     throw new IllegalStateException();   // n0_3
/// }
/// ```
pub fn throwing_unit() -> CompilationUnit {
    let mut u = UnitBuilder::new("A");
    let throw = u.throw("IllegalStateException");

    let (creation, raise) = (throw.nodes[0], throw.nodes[1]);
    let evaluate = u.cfg.regular_block(vec![creation]);
    let guarded = u.cfg.exception_block(raise);
    u.cfg.set_successor(ENTRY, evaluate);
    u.cfg.set_successor(evaluate, guarded);
    u.cfg
        .add_exceptional_successor(guarded, "IllegalStateException", EXCEPTIONAL_EXIT);

    u.finish_procedure("fail", vec![], None, &[&throw]);
    u.build("Fail.java")
}

/// ```java
/// void f() {
///     int a = 1;   // n0_3
///     a = 2;       // n0_4
///     int b = a;   // n0_5
/// }
/// ```
pub fn use_def_unit() -> CompilationUnit {
    let mut u = UnitBuilder::new("A");
    let one = u.lit("1");
    let decl_a = u.declare("int", "a", Some(one));
    let two = u.lit("2");
    let reassign = u.assign("a", two);
    let read = u.var("a");
    let decl_b = u.declare("int", "b", Some(read));

    u.straight_line(&[&decl_a, &reassign, &decl_b]);
    u.finish_procedure("f", vec![], None, &[&decl_a, &reassign, &decl_b]);
    u.build("F.java")
}

/// ```java
/// int id(int p) {
///     int q = p;   // n0_3
///     return q;    // n0_4
/// }
/// ```
pub fn identity_unit() -> CompilationUnit {
    let mut u = UnitBuilder::new("A");
    let p = u.param("int", "p");
    let read_p = u.var("p");
    let decl_q = u.declare("int", "q", Some(read_p));
    let read_q = u.var("q");
    let ret = u.ret(Some(read_q));

    u.straight_line(&[&decl_q, &ret]);
    u.finish_procedure("id", vec![p], Some("int"), &[&decl_q, &ret]);
    u.build("Id.java")
}

/// ```java
/// class A {
///     void bar(int x, int y) {}     // procedure 0
///     void bar(int x) {}            // procedure 1
///     void main() {                 // procedure 2
///         int a = 1;                // n2_3
///         bar(a, 2);                // n2_4
///         bar(a);                   // n2_5
///         Lib.bar(a);               // n2_6
///     }
/// }
/// ```
pub fn overloads_unit() -> CompilationUnit {
    let mut u = UnitBuilder::new("A");

    let x = u.param("int", "x");
    let y = u.param("int", "y");
    u.cfg.set_successor(ENTRY, EXIT);
    u.finish_procedure("bar", vec![x, y], None, &[]);

    let x = u.param("int", "x");
    u.cfg.set_successor(ENTRY, EXIT);
    u.finish_procedure("bar", vec![x], None, &[]);

    let one = u.lit("1");
    let decl_a = u.declare("int", "a", Some(one));

    let a = u.var("a");
    let two = u.lit("2");
    let call_2 = u.call("bar", vec![a, two]);
    let bar_2 = u.local_signature("bar", &["int", "int"], None);
    u.resolve_call(&call_2, bar_2, &["x", "y"]);
    let stmt_2 = u.expr_stmt(call_2);

    let a = u.var("a");
    let call_1 = u.call("bar", vec![a]);
    let bar_1 = u.local_signature("bar", &["int"], None);
    u.resolve_call(&call_1, bar_1, &["x"]);
    let stmt_1 = u.expr_stmt(call_1);

    let a = u.var("a");
    let call_lib = u.call("bar", vec![a]);
    let lib = codegraph_pdg::ProcedureSignature::new("bar", ["int"], None).with_owner("Lib");
    u.resolve_call(&call_lib, lib, &["x"]);
    let stmt_lib = u.expr_stmt(call_lib);

    u.straight_line(&[&decl_a, &stmt_2, &stmt_1, &stmt_lib]);
    u.finish_procedure("main", vec![], None, &[&decl_a, &stmt_2, &stmt_1, &stmt_lib]);
    u.build("A.java")
}

/// ```java
/// int fact(int n) {
///     return fact(n);   // n0_3
/// }
/// ```
pub fn recursion_unit() -> CompilationUnit {
    let mut u = UnitBuilder::new("A");
    let n = u.param("int", "n");
    let arg = u.var("n");
    let call = u.call("fact", vec![arg]);
    let fact = u.local_signature("fact", &["int"], Some("int"));
    u.resolve_call(&call, fact, &["n"]);
    let ret = u.ret(Some(call));

    u.straight_line(&[&ret]);
    u.finish_procedure("fact", vec![n], Some("int"), &[&ret]);
    u.build("Fact.java")
}

/// `void run() { int v0 = 0; v1 = v0; log(v1); ... }` with `count` statements
///
/// Statement `i` cycles through a declaration, an assignment from the
/// previous variable and a call reading it.
pub fn straight_line_unit(count: usize) -> CompilationUnit {
    let mut u = UnitBuilder::new("A");
    let mut statements = Vec::with_capacity(count);
    for i in 0..count {
        let stmt = match i % 3 {
            0 => {
                let init = u.lit(&i.to_string());
                u.declare("int", &format!("v{i}"), Some(init))
            }
            1 => {
                let source = u.var(&format!("v{}", i - 1));
                u.declare("int", &format!("v{i}"), Some(source))
            }
            _ => {
                let arg = u.var(&format!("v{}", i - 1));
                let call = u.call("log", vec![arg]);
                u.expr_stmt(call)
            }
        };
        statements.push(stmt);
    }
    let refs: Vec<_> = statements.iter().collect();
    if refs.is_empty() {
        u.cfg.set_successor(ENTRY, EXIT);
    } else {
        u.straight_line(&refs);
    }
    u.finish_procedure("run", vec![], None, &refs);
    u.build("Run.java")
}
