//! AST data model (`spec.md` §3): expressions and statements.

pub mod expr;
pub mod stmt;

pub use expr::{Expr, ExprId, ExprKind, Literal, UnaryOp};
pub use stmt::{Stmt, StmtId, StmtKind};
