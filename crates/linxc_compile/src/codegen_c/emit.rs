//! Expression and statement emission into portable C (`spec.md` §6).
//!
//! One function body at a time: `codegen_stmt` walks a `StmtId` list
//! with an indent level, `codegen_expr` recurses over the `ExprKind`
//! tree and returns the C text for one expression. Declarations
//! (`TypeDecl`/`FuncDecl` at top level) are handled by `mod.rs` instead
//! — by the time a function body reaches here, its own declarations are
//! local variables only.

use std::fmt::Write;

use linxc_lang::types::OperatorImpl;
use linxc_lang::{BinOp, Expr, ExprId, ExprKind, StmtId, StmtKind, World};
use linxc_lang::ast::expr::{Literal, UnaryOp};

use super::types::{c_type_string, mangled_func_name};

fn bin_op_str(op: BinOp) -> &'static str {
    match op {
        BinOp::Add | BinOp::AddAssign => "+",
        BinOp::Sub | BinOp::SubAssign => "-",
        BinOp::Mul | BinOp::MulAssign => "*",
        BinOp::Div | BinOp::DivAssign => "/",
        BinOp::Mod | BinOp::ModAssign => "%",
        BinOp::Eq => "==",
        BinOp::NotEq => "!=",
        BinOp::Lt => "<",
        BinOp::LtEq => "<=",
        BinOp::Gt => ">",
        BinOp::GtEq => ">=",
        BinOp::And => "&&",
        BinOp::Or => "||",
        BinOp::BitAnd => "&",
        BinOp::BitOr => "|",
        BinOp::BitXor => "^",
        BinOp::Assign => "=",
    }
}

fn codegen_literal(lit: &Literal, world: &World) -> String {
    match lit {
        Literal::Int(n) => n.to_string(),
        Literal::Float(f) => format!("{}", f),
        Literal::Bool(b) => b.to_string(),
        Literal::Char(c) => format!("'{}'", c.escape_default()),
        Literal::Str(s) => format!("\"{}\"", world.interner.resolve(*s).escape_default()),
    }
}

pub fn codegen_expr(world: &World, id: ExprId) -> String {
    let expr: &Expr = world.expr(id);
    match &expr.kind {
        ExprKind::None => String::new(),
        ExprKind::Literal(lit) => codegen_literal(lit, world),
        ExprKind::Variable(v) => {
            let var = world.variable(*v);
            let name = world.interner.resolve(var.name);
            // A struct field reached by its bare name inside a method
            // resolves to the field's own `VarId` with no receiver
            // expression in the AST (`spec.md` §6's implicit `this`) —
            // the only receiver that could apply in an emitted C
            // function body is the synthesized `this` parameter.
            if var.member_of.is_some() && name != "this" {
                format!("this->{}", name)
            } else {
                name.to_string()
            }
        }
        ExprKind::FunctionRef(f) => mangled_func_name(world, *f),
        ExprKind::ExternRef(name) => world.interner.resolve(*name).to_string(),
        ExprKind::TypeRef(tr) => c_type_string(world, tr),
        ExprKind::EnumMemberRef { owner, member } => {
            format!("{}_{}", super::types::mangled_type_name(world, *owner), world.interner.resolve(*member))
        }
        ExprKind::NamespaceRef(_) => String::new(),
        ExprKind::OperatorCall { op, left, right } => {
            let l = codegen_expr(world, *left);
            let r = codegen_expr(world, *right);
            let lookup_op = op.non_assign_form();
            let left_ty = world.expr(*left).resolves_to.target;
            let right_ty = world.expr(*right).resolves_to.target;
            let overload = left_ty.zip(right_ty).and_then(|(lt, rt)| {
                world
                    .type_(lt)
                    .operator_overloads
                    .get(&OperatorImpl::Operator { op: lookup_op, left: lt, right: rt })
            });
            match overload {
                Some(of) => format!("{}({}, {})", mangled_func_name(world, of.function), l, r),
                None => format!("({} {} {})", l, bin_op_str(lookup_op), r),
            }
        }
        ExprKind::TypeCast { target, expr: inner } => {
            format!("(({}){})", c_type_string(world, target), codegen_expr(world, *inner))
        }
        ExprKind::Modified { expr: inner, op, prefix } => {
            let operand = codegen_expr(world, *inner);
            match op {
                UnaryOp::Neg => format!("(-{})", operand),
                UnaryOp::Not => format!("(!{})", operand),
                UnaryOp::BitNot => format!("(~{})", operand),
                UnaryOp::Deref => format!("(*{})", operand),
                UnaryOp::AddressOf => format!("(&{})", operand),
                UnaryOp::Inc if *prefix => format!("(++{})", operand),
                UnaryOp::Inc => format!("({}++)", operand),
                UnaryOp::Dec if *prefix => format!("(--{})", operand),
                UnaryOp::Dec => format!("({}--)", operand),
            }
        }
        ExprKind::Indexer { base, index } => {
            format!("{}[{}]", codegen_expr(world, *base), codegen_expr(world, *index))
        }
        ExprKind::IndexerCall { base, index } => {
            // The overload to dispatch through is resolved once every
            // concrete type's operator[] is registered; until then this
            // renders as a plain index so the emitted C still compiles
            // for the common pointer/array case.
            format!("{}[{}]", codegen_expr(world, *base), codegen_expr(world, *index))
        }
        ExprKind::FuncCall { callee, args } | ExprKind::FuncPointerCall { callee, args } => {
            let callee_str = codegen_expr(world, *callee);
            let arg_strs: Vec<String> = args.iter().map(|&a| codegen_expr(world, a)).collect();
            format!("{}({})", callee_str, arg_strs.join(", "))
        }
        ExprKind::Sizeof(tr) => format!("sizeof({})", c_type_string(world, tr)),
        ExprKind::Nameof(inner) => format!("\"{}\"", codegen_expr(world, *inner)),
        ExprKind::Typeof(inner) => codegen_expr(world, *inner),
    }
}

fn indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("    ");
    }
}

pub fn codegen_stmt(world: &World, id: StmtId, output: &mut String, level: usize) {
    let stmt = world.stmt(id);
    match &stmt.kind {
        StmtKind::Include { .. } | StmtKind::TypeDecl(_) | StmtKind::FuncDecl(_) | StmtKind::UseLang { .. } => {
            // Declarations are hoisted to file scope by `mod.rs`; a
            // nested occurrence inside a body has nothing left to emit.
        }
        StmtKind::ExpressionStmt(e) => {
            indent(output, level);
            writeln!(output, "{};", codegen_expr(world, *e)).unwrap();
        }
        StmtKind::Return(value) => {
            indent(output, level);
            match value {
                Some(e) => writeln!(output, "return {};", codegen_expr(world, *e)).unwrap(),
                None => writeln!(output, "return;").unwrap(),
            }
        }
        StmtKind::VarDecl(v) => {
            indent(output, level);
            let var = world.variable(*v);
            let ty = c_type_string(world, &var.type_ref);
            let name = world.interner.resolve(var.name);
            match var.default_value {
                Some(e) => writeln!(output, "{} {} = {};", ty, name, codegen_expr(world, e)).unwrap(),
                None => writeln!(output, "{} {};", ty, name).unwrap(),
            }
        }
        StmtKind::NamespaceScope { body, .. } => {
            for &s in body {
                codegen_stmt(world, s, output, level);
            }
        }
        StmtKind::If { condition, then_body } => {
            indent(output, level);
            writeln!(output, "if ({}) {{", codegen_expr(world, *condition)).unwrap();
            for &s in then_body {
                codegen_stmt(world, s, output, level + 1);
            }
            indent(output, level);
            writeln!(output, "}}").unwrap();
        }
        StmtKind::Else { body } => {
            indent(output, level);
            writeln!(output, "else {{").unwrap();
            for &s in body {
                codegen_stmt(world, s, output, level + 1);
            }
            indent(output, level);
            writeln!(output, "}}").unwrap();
        }
        StmtKind::For { init, condition, post, body } => {
            indent(output, level);
            let init_str = init.map(|s| codegen_stmt_inline(world, s)).unwrap_or_default();
            let cond_str = condition.map(|e| codegen_expr(world, e)).unwrap_or_default();
            let post_str = post.map(|e| codegen_expr(world, e)).unwrap_or_default();
            writeln!(output, "for ({}; {}; {}) {{", init_str, cond_str, post_str).unwrap();
            for &s in body {
                codegen_stmt(world, s, output, level + 1);
            }
            indent(output, level);
            writeln!(output, "}}").unwrap();
        }
    }
}

/// Renders a `for`-header's init clause without its own trailing
/// newline or semicolon, since the `for (...)` header supplies those.
fn codegen_stmt_inline(world: &World, id: StmtId) -> String {
    let stmt = world.stmt(id);
    match &stmt.kind {
        StmtKind::VarDecl(v) => {
            let var = world.variable(*v);
            let ty = c_type_string(world, &var.type_ref);
            let name = world.interner.resolve(var.name);
            match var.default_value {
                Some(e) => format!("{} {} = {}", ty, name, codegen_expr(world, e)),
                None => format!("{} {}", ty, name),
            }
        }
        StmtKind::ExpressionStmt(e) => codegen_expr(world, *e),
        _ => String::new(),
    }
}
