//! Expression AST (`spec.md` §3): a tagged union, each
//! variant wrapped in a common [`Expr`] record that carries the
//! `resolvesTo: TypeReference` the naming invariant is phrased around —
//! "`resolvesTo.target == null` iff the expression denotes a
//! compile-time entity" (a type, a namespace, an unresolved generic).
//!
//! Expressions are stored in an index-addressed slab owned by
//! [`crate::namespace::World`] (see `types.rs` module doc for why slabs
//! rather than `bumpalo::Arena` directly) and referenced by [`ExprId`].

use crate::token::TokenKind;
use crate::types::{FuncId, NamespaceId, TypeId, TypeReference, VarId};
use linxc_base::{Span, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(Symbol),
    Char(char),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
    Deref,
    AddressOf,
    Inc,
    Dec,
}

impl UnaryOp {
    pub fn from_token(kind: TokenKind) -> Option<UnaryOp> {
        Some(match kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Star => UnaryOp::Deref,
            TokenKind::Amp => UnaryOp::AddressOf,
            TokenKind::PlusPlus => UnaryOp::Inc,
            TokenKind::MinusMinus => UnaryOp::Dec,
            _ => return None,
        })
    }
}

/// The 17 expression shapes of `spec.md` §3, matching the original
/// `LinxcExpressionID` enumeration one-for-one (`None` included — an
/// explicit "this expression failed to parse/resolve" marker rather
/// than an `Option` wrapper, so malformed input still has a span to
/// attach diagnostics to).
#[derive(Debug, Clone)]
pub enum ExprKind {
    None,
    OperatorCall {
        op: crate::types::BinOp,
        left: ExprId,
        right: ExprId,
    },
    Literal(Literal),
    Variable(VarId),
    FunctionRef(FuncId),
    /// An identifier that resolved against nothing in scope but was
    /// immediately called, e.g. a bare `printf(...)` with no declaration
    /// visible from a `#include <stdio.h>` this front-end never opens
    /// (`spec.md` §6 leaves system headers for the C compiler that
    /// consumes the emitted output). Carries just the name through to
    /// codegen unchanged.
    ExternRef(Symbol),
    TypeRef(TypeReference),
    EnumMemberRef {
        owner: TypeId,
        member: Symbol,
    },
    NamespaceRef(NamespaceId),
    TypeCast {
        target: TypeReference,
        expr: ExprId,
    },
    Modified {
        expr: ExprId,
        op: UnaryOp,
        prefix: bool,
    },
    Indexer {
        base: ExprId,
        index: ExprId,
    },
    FuncCall {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    FuncPointerCall {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    Sizeof(TypeReference),
    Nameof(ExprId),
    Typeof(ExprId),
    /// Distinct from `Indexer`: dispatches through an `operator[]`
    /// overload rather than raw pointer arithmetic.
    IndexerCall {
        base: ExprId,
        index: ExprId,
    },
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub resolves_to: TypeReference,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, resolves_to: TypeReference, span: Span) -> Self {
        Expr { kind, resolves_to, span }
    }

    /// `true` iff this expression denotes a compile-time entity (a
    /// type, a namespace, an unresolved generic name) rather than a
    /// runtime value — `spec.md` §3's naming invariant.
    pub fn is_compile_time_entity(&self) -> bool {
        self.resolves_to.is_sentinel()
            || matches!(self.kind, ExprKind::TypeRef(_) | ExprKind::NamespaceRef(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unary_op_recognizes_prefix_tokens() {
        assert_eq!(UnaryOp::from_token(TokenKind::Minus), Some(UnaryOp::Neg));
        assert_eq!(UnaryOp::from_token(TokenKind::Bang), Some(UnaryOp::Not));
        assert_eq!(UnaryOp::from_token(TokenKind::Comma), None);
    }

    #[test]
    fn namespace_ref_is_a_compile_time_entity() {
        let e = Expr::new(
            ExprKind::NamespaceRef(NamespaceId(0)),
            TypeReference::none_sentinel(),
            Span::new(0, 1),
        );
        assert!(e.is_compile_time_entity());
    }

    #[test]
    fn literal_is_not_a_compile_time_entity() {
        let e = Expr::new(
            ExprKind::Literal(Literal::Int(1)),
            TypeReference::of(TypeId(0)),
            Span::new(0, 1),
        );
        assert!(!e.is_compile_time_entity());
    }
}
