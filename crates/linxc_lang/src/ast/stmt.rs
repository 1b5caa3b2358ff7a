//! Statement AST (`spec.md` §3): an 11-variant tagged union matching
//! the original `LinxcStatementID` enumeration. Statements are stored
//! in an index-addressed slab owned by [`crate::namespace::World`] and
//! referenced by [`StmtId`].

use crate::ast::expr::ExprId;
use crate::types::{FuncId, NamespaceId, TypeId, VarId};
use linxc_base::{Span, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StmtId(pub u32);

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// `#include <path>` or `#include "path"`; resolution against the
    /// include-directory search path happens outside this crate
    /// (`spec.md` §6 fixes it as a driver/loader responsibility).
    Include {
        path: Symbol,
        is_angle_bracket: bool,
    },
    ExpressionStmt(ExprId),
    Return(Option<ExprId>),
    TypeDecl(TypeId),
    VarDecl(VarId),
    FuncDecl(FuncId),
    NamespaceScope {
        namespace: NamespaceId,
        body: Vec<StmtId>,
    },
    If {
        condition: ExprId,
        then_body: Vec<StmtId>,
    },
    Else {
        body: Vec<StmtId>,
    },
    UseLang {
        name: Symbol,
    },
    For {
        init: Option<StmtId>,
        condition: Option<ExprId>,
        post: Option<ExprId>,
        body: Vec<StmtId>,
    },
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_stmt_records_bracket_style() {
        let stmt = Stmt::new(
            StmtKind::Include {
                path: Symbol::EMPTY,
                is_angle_bracket: true,
            },
            Span::new(0, 10),
        );
        match stmt.kind {
            StmtKind::Include { is_angle_bracket, .. } => assert!(is_angle_bracket),
            _ => panic!("expected Include"),
        }
    }
}
