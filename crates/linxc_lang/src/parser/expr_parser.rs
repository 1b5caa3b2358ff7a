//! Expression parser: precedence-climbing over `spec.md` §4.4's table.
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|----------------|
//! | 6 (highest) | `::` | left |
//! | 5 | `->` `.` | left |
//! | 3 | `*` `/` `%` | left |
//! | 2 | `+` `-` `&` `^` `~` `\|` `<` `>` `<=` `>=` | left |
//! | 1 | `\|\|` `!=` `==` `&&` | left |
//! | 0 (lowest) | `=` `+=` `-=` `*=` `%=` `/=` | right |
//!
//! Ported from the original `parser.hpp: GetPrecedence`/`GetAssociation`
//! functions rather than reinvented, per `spec.md` §4.4.
//!
//! Parsing and name resolution happen in the same pass: an identifier
//! primary is resolved against the current scope chain as soon as it's
//! parsed (mirroring the original `ParseExpressionPrimary`), rather than
//! building an unresolved AST that a later pass walks.

use crate::ast::{Expr, ExprId, ExprKind, Literal, UnaryOp};
use crate::namespace::{LookupScope, Resolved, World};
use crate::token::{ExpandedToken, Keyword, PrimitiveKeyword, TokenKind};
use crate::types::{can_assign, BinOp, FuncOwner, NamespaceId, PrimitiveKind, TypeId, TypeReference};
use linxc_base::{SpannedError, Span, Symbol};
use std::collections::HashMap;

fn precedence_of(kind: TokenKind) -> Option<(u8, bool /* right_assoc */)> {
    Some(match kind {
        TokenKind::ColonColon => (6, false),
        TokenKind::Dot | TokenKind::Arrow => (5, false),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => (3, false),
        TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Amp
        | TokenKind::Caret
        | TokenKind::Tilde
        | TokenKind::Pipe
        | TokenKind::Lt
        | TokenKind::Gt
        | TokenKind::LtEq
        | TokenKind::GtEq => (2, false),
        TokenKind::PipePipe | TokenKind::BangEq | TokenKind::EqEq | TokenKind::AmpAmp => (1, false),
        TokenKind::Eq
        | TokenKind::PlusEq
        | TokenKind::MinusEq
        | TokenKind::StarEq
        | TokenKind::PercentEq
        | TokenKind::SlashEq => (0, true),
        _ => return None,
    })
}

pub struct ExprParser<'w, 'a> {
    pub world: &'w mut World,
    tokens: &'a [ExpandedToken],
    pos: usize,
    pub current_namespace: NamespaceId,
    pub enclosing_types: Vec<TypeId>,
    pub local_vars: HashMap<Symbol, VarIdSlot>,
    pub errors: Vec<SpannedError>,
}

/// Alias kept distinct from `crate::types::VarId` only so call sites
/// reading `local_vars` don't need an extra `use`.
pub type VarIdSlot = crate::types::VarId;

impl<'w, 'a> ExprParser<'w, 'a> {
    pub fn new(
        world: &'w mut World,
        tokens: &'a [ExpandedToken],
        current_namespace: NamespaceId,
        enclosing_types: Vec<TypeId>,
        local_vars: HashMap<Symbol, VarIdSlot>,
    ) -> Self {
        ExprParser {
            world,
            tokens,
            pos: 0,
            current_namespace,
            enclosing_types,
            local_vars,
            errors: Vec::new(),
        }
    }

    pub fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Number of tokens consumed from the slice this parser was given;
    /// lets a caller that handed over a subslice advance its own
    /// cursor by the same amount once this parser is done with it.
    pub fn consumed(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> ExpandedToken {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, n: usize) -> ExpandedToken {
        self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> ExpandedToken {
        let t = self.peek();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn text(&self, tok: ExpandedToken) -> &str {
        self.world.interner.resolve(tok.text)
    }

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.errors.push(SpannedError::syntactic(message, span));
    }

    /// Checks `src_expr` against a declared/expected `dst` type via
    /// `canAssign` (`spec.md` §4.5) and records a diagnostic if the
    /// assignment isn't allowed. A sentinel `dst` (no declared type to
    /// check against, e.g. an unresolved generic parameter) is always
    /// accepted.
    pub(crate) fn check_assignable(&mut self, dst: &TypeReference, src_expr: ExprId, span: Span) {
        if dst.is_sentinel() {
            return;
        }
        let src_ty = self.world.expr(src_expr).resolves_to.clone();
        let is_string_literal = matches!(self.world.expr(src_expr).kind, ExprKind::Literal(Literal::Str(_)));
        let u8_ty = self.world.primitive_types[&PrimitiveKind::U8];
        let void_ty = self.world.primitive_types[&PrimitiveKind::Void];
        if can_assign(dst, &src_ty, is_string_literal, u8_ty, void_ty, &self.world.implicit_casts) {
            return;
        }
        if is_string_literal {
            self.errors.push(SpannedError::type_error(
                "String literals may only be assigned to const u8*",
                span,
            ));
        } else {
            self.errors.push(SpannedError::type_error(
                "value cannot be implicitly converted to the declared type. An explicit cast is required.",
                span,
            ));
        }
    }

    fn scope_chain(&self) -> Vec<NamespaceId> {
        let mut chain = Vec::new();
        let mut cur = Some(self.current_namespace);
        while let Some(id) = cur {
            chain.push(id);
            cur = self.world.namespace(id).parent;
        }
        chain
    }

    pub fn void_type(&self) -> TypeId {
        self.world.primitive_types[&PrimitiveKind::Void]
    }

    fn primitive_type_ref(&self, kw: PrimitiveKeyword) -> TypeReference {
        let kind = PrimitiveKind::from_keyword(kw);
        TypeReference::of(self.world.primitive_types[&kind])
    }

    /// Entry point: parses a full expression at the lowest precedence.
    pub fn parse_expression(&mut self) -> ExprId {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, min_prec: u8) -> ExprId {
        let mut left = self.parse_unary();
        loop {
            let op_tok = self.peek();
            let Some((prec, right_assoc)) = precedence_of(op_tok.kind) else { break };
            if prec < min_prec {
                break;
            }
            self.bump();

            if matches!(op_tok.kind, TokenKind::ColonColon | TokenKind::Dot | TokenKind::Arrow) {
                left = self.parse_scoped_member(left, op_tok.span());
                continue;
            }

            let next_min = if right_assoc { prec } else { prec + 1 };
            let right = self.parse_binary(next_min);
            left = self.build_operator_call(op_tok, left, right);
        }
        left
    }

    /// Resolves `left::name`, `left.name`, `left->name` against the
    /// scope `left` denotes: a namespace, a type, or (for `.`/`->`) the
    /// type of the variable/expression on the left.
    fn parse_scoped_member(&mut self, left: ExprId, op_span: Span) -> ExprId {
        let scope = match &self.world.expr(left).kind {
            ExprKind::NamespaceRef(ns) => Some(LookupScope::Namespace(*ns)),
            ExprKind::TypeRef(tr) => tr.target.map(LookupScope::Type),
            _ => self.world.expr(left).resolves_to.target.map(LookupScope::Type),
        };
        let name_tok = self.bump();
        if name_tok.kind != TokenKind::Identifier {
            self.error("expected identifier after scope operator", name_tok.span());
            return self.none_expr(op_span);
        }
        let name = name_tok.text;
        let resolved = scope.and_then(|s| self.world.lookup(Some(s), &HashMap::new(), &[], &[], name));
        self.expr_from_resolution(resolved, name, name_tok.span())
    }

    fn none_expr(&mut self, span: Span) -> ExprId {
        self.world.push_expr(Expr::new(ExprKind::None, TypeReference::none_sentinel(), span))
    }

    fn build_operator_call(&mut self, op_tok: ExpandedToken, left: ExprId, right: ExprId) -> ExprId {
        let Some(op) = BinOp::from_token(op_tok.kind) else {
            return self.none_expr(op_tok.span());
        };
        let span = self.world.expr(left).span.merge(self.world.expr(right).span);
        if op == BinOp::Assign {
            let dst = self.world.expr(left).resolves_to.clone();
            self.check_assignable(&dst, right, span);
        }
        let result_ty = self.operator_result_type(op, left, right);
        self.world.push_expr(Expr::new(ExprKind::OperatorCall { op, left, right }, result_ty, span))
    }

    /// Computes the result type of a binary/compound operator: first
    /// consult the left operand type's overload table (keyed by the
    /// *non-assign* form per the preserved `-=` quirk), falling back to
    /// the primitive arithmetic-promotion table.
    fn operator_result_type(&mut self, op: BinOp, left: ExprId, right: ExprId) -> TypeReference {
        let left_ty = self.world.expr(left).resolves_to.clone();
        let right_ty = self.world.expr(right).resolves_to.clone();
        let lookup_op = op.non_assign_form();
        if let (Some(lt), Some(rt)) = (left_ty.target, right_ty.target) {
            if let Some(of) = self
                .world
                .type_(lt)
                .operator_overloads
                .get(&crate::types::OperatorImpl::Operator { op: lookup_op, left: lt, right: rt })
            {
                return self.world.function(of.function).return_type.clone();
            }
            let lp = self.world.type_(lt).primitive;
            let rp = self.world.type_(rt).primitive;
            if let (Some(lp), Some(rp)) = (lp, rp) {
                if op.is_compound_assign() {
                    return left_ty;
                }
                if matches!(
                    op,
                    BinOp::Eq
                        | BinOp::NotEq
                        | BinOp::Lt
                        | BinOp::LtEq
                        | BinOp::Gt
                        | BinOp::GtEq
                        | BinOp::And
                        | BinOp::Or
                ) {
                    return TypeReference::of(self.world.primitive_types[&PrimitiveKind::Bool]);
                }
                let result_kind = crate::types::arithmetic_result(lp, rp);
                return TypeReference::of(self.world.primitive_types[&result_kind]);
            }
        }
        left_ty
    }

    fn parse_unary(&mut self) -> ExprId {
        let tok = self.peek();
        if let Some(op) = UnaryOp::from_token(tok.kind) {
            self.bump();
            let operand = self.parse_unary();
            let span = tok.span().merge(self.world.expr(operand).span);
            let result_ty = match op {
                UnaryOp::Deref => {
                    let mut t = self.world.expr(operand).resolves_to.clone();
                    t.pointer_count = t.pointer_count.saturating_sub(1);
                    t
                }
                UnaryOp::AddressOf => {
                    let mut t = self.world.expr(operand).resolves_to.clone();
                    t.pointer_count += 1;
                    t
                }
                UnaryOp::Not => TypeReference::of(self.world.primitive_types[&PrimitiveKind::Bool]),
                _ => self.world.expr(operand).resolves_to.clone(),
            };
            return self
                .world
                .push_expr(Expr::new(ExprKind::Modified { expr: operand, op, prefix: true }, result_ty, span));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> ExprId {
        let mut expr = self.parse_primary();
        loop {
            match self.peek().kind {
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let tok = self.bump();
                    let op = UnaryOp::from_token(tok.kind).unwrap();
                    let ty = self.world.expr(expr).resolves_to.clone();
                    let span = self.world.expr(expr).span.merge(tok.span());
                    expr = self.world.push_expr(Expr::new(
                        ExprKind::Modified { expr, op, prefix: false },
                        ty,
                        span,
                    ));
                }
                TokenKind::LParen if self.prev_touches(self.peek().start) => {
                    expr = self.parse_call(expr);
                }
                TokenKind::LBracket => {
                    expr = self.parse_index(expr);
                }
                _ => break,
            }
        }
        expr
    }

    /// Whether `next_start` is glued directly onto the previous token
    /// (no whitespace between), the distinction `a(` vs `a (` hinges on
    /// when deciding whether a bare identifier is a call.
    fn prev_touches(&self, next_start: usize) -> bool {
        if self.pos == 0 {
            false
        } else {
            self.tokens[self.pos - 1].span().touches(next_start)
        }
    }

    fn parse_call(&mut self, callee: ExprId) -> ExprId {
        let lparen = self.bump();
        let mut args = Vec::new();
        if self.peek().kind != TokenKind::RParen {
            loop {
                args.push(self.parse_binary(1));
                if self.peek().kind == TokenKind::Comma {
                    self.bump();
                    continue;
                }
                break;
            }
        }
        let end_span = self.expect(TokenKind::RParen, "expected `)` to close call arguments");
        let span = self.world.expr(callee).span.merge(end_span.unwrap_or(lparen.span()));

        let callee_kind = self.world.expr(callee).kind.clone();
        let (result_ty, is_func_ptr) = match &callee_kind {
            ExprKind::FunctionRef(f) => {
                let func = self.world.function(*f);
                let required_params = func.required_params as usize;
                let total_params = func.params.len();
                let variadic = func.variadic;
                let return_type = func.return_type.clone();
                self.check_arity(required_params, total_params, variadic, args.len(), span);
                (return_type, false)
            }
            _ => (self.world.expr(callee).resolves_to.clone(), true),
        };
        let kind = if is_func_ptr {
            ExprKind::FuncPointerCall { callee, args }
        } else {
            ExprKind::FuncCall { callee, args }
        };
        self.world.push_expr(Expr::new(kind, result_ty, span))
    }

    fn check_arity(&mut self, required: usize, total: usize, variadic: bool, given: usize, span: Span) {
        let ok = if variadic {
            given >= required
        } else {
            given >= required && given <= total
        };
        if !ok {
            self.error(
                format!("call arity mismatch: expected between {} and {} argument(s), got {}", required, total, given),
                span,
            );
        }
    }

    fn parse_index(&mut self, base: ExprId) -> ExprId {
        let lbracket = self.bump();
        let index = self.parse_binary(1);
        let end_span = self.expect(TokenKind::RBracket, "expected `]` to close index expression");
        let span = self.world.expr(base).span.merge(end_span.unwrap_or(lbracket.span()));

        let base_ty = self.world.expr(base).resolves_to.clone();
        if base_ty.pointer_count > 0 {
            let mut result = base_ty;
            result.pointer_count -= 1;
            self.world.push_expr(Expr::new(ExprKind::Indexer { base, index }, result, span))
        } else {
            // A value type being indexed dispatches through a user
            // `operator[]`; the callee function is resolved later by
            // the type checker once overloads for the concrete type
            // are all registered, so the node only records the shape.
            self.world.push_expr(Expr::new(ExprKind::IndexerCall { base, index }, base_ty, span))
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Option<Span> {
        if self.peek().kind == kind {
            Some(self.bump().span())
        } else {
            self.error(message, self.peek().span());
            None
        }
    }

    fn parse_primary(&mut self) -> ExprId {
        let tok = self.peek();
        match tok.kind {
            TokenKind::IntLiteral => {
                self.bump();
                let text = self.text(tok);
                let value = parse_int_literal(text);
                let ty = TypeReference::of(self.world.primitive_types[&PrimitiveKind::I32]);
                self.world.push_expr(Expr::new(ExprKind::Literal(Literal::Int(value)), ty, tok.span()))
            }
            TokenKind::FloatLiteral => {
                self.bump();
                let text = self.text(tok);
                let value: f64 = text.trim_end_matches(['f', 'F']).parse().unwrap_or(0.0);
                let ty = TypeReference::of(self.world.primitive_types[&PrimitiveKind::Double]);
                self.world.push_expr(Expr::new(ExprKind::Literal(Literal::Float(value)), ty, tok.span()))
            }
            TokenKind::StringLiteral => {
                self.bump();
                let u8_ty = self.world.primitive_types[&PrimitiveKind::U8];
                let ty = TypeReference::of(u8_ty).with_pointer_depth(1).with_const(true);
                self.world.push_expr(Expr::new(ExprKind::Literal(Literal::Str(tok.text)), ty, tok.span()))
            }
            TokenKind::CharLiteral => {
                self.bump();
                let text = self.text(tok);
                let c = text.chars().next().unwrap_or('\0');
                let ty = TypeReference::of(self.world.primitive_types[&PrimitiveKind::Char]);
                self.world.push_expr(Expr::new(ExprKind::Literal(Literal::Char(c)), ty, tok.span()))
            }
            TokenKind::Keyword(Keyword::True) | TokenKind::Keyword(Keyword::False) => {
                self.bump();
                let ty = TypeReference::of(self.world.primitive_types[&PrimitiveKind::Bool]);
                let value = tok.kind == TokenKind::Keyword(Keyword::True);
                self.world.push_expr(Expr::new(ExprKind::Literal(Literal::Bool(value)), ty, tok.span()))
            }
            TokenKind::Keyword(Keyword::Sizeof) => {
                self.bump();
                self.expect(TokenKind::LParen, "expected `(` after `sizeof`");
                let ty_ref = self.parse_type_reference();
                self.expect(TokenKind::RParen, "expected `)` after `sizeof(...)`");
                let u64_ty = TypeReference::of(self.world.primitive_types[&PrimitiveKind::U64]);
                self.world.push_expr(Expr::new(ExprKind::Sizeof(ty_ref), u64_ty, tok.span()))
            }
            TokenKind::Keyword(Keyword::Nameof) => {
                self.bump();
                self.expect(TokenKind::LParen, "expected `(` after `nameof`");
                let inner = self.parse_expression();
                self.expect(TokenKind::RParen, "expected `)` after `nameof(...)`");
                let u8_ty = self.world.primitive_types[&PrimitiveKind::U8];
                let ty = TypeReference::of(u8_ty).with_pointer_depth(1).with_const(true);
                self.world.push_expr(Expr::new(ExprKind::Nameof(inner), ty, tok.span()))
            }
            TokenKind::Keyword(Keyword::Typeof) => {
                self.bump();
                self.expect(TokenKind::LParen, "expected `(` after `typeof`");
                let inner = self.parse_expression();
                self.expect(TokenKind::RParen, "expected `)` after `typeof(...)`");
                self.world.push_expr(Expr::new(ExprKind::Typeof(inner), TypeReference::none_sentinel(), tok.span()))
            }
            TokenKind::LParen => self.parse_paren_or_cast(),
            TokenKind::Keyword(Keyword::Primitive(_)) => {
                let ty_ref = self.parse_type_reference();
                self.world.push_expr(Expr::new(ExprKind::TypeRef(ty_ref.clone()), TypeReference::none_sentinel(), tok.span()))
            }
            TokenKind::Identifier => self.parse_identifier_primary(),
            _ => {
                self.bump();
                self.error("expected an expression", tok.span());
                self.none_expr(tok.span())
            }
        }
    }

    /// Disambiguates `(Type)expr` casts from `(expr)` grouping: if the
    /// parenthesized content parses fully as a type reference and is
    /// immediately followed by `)`, and the token after that can start
    /// a primary expression, it's a cast.
    fn parse_paren_or_cast(&mut self) -> ExprId {
        let lparen = self.bump();
        let checkpoint = self.pos;
        if self.looks_like_type_start() {
            let ty_ref = self.parse_type_reference();
            if self.peek().kind == TokenKind::RParen && self.next_can_start_primary() {
                self.bump(); // )
                let operand = self.parse_unary();
                let span = lparen.span().merge(self.world.expr(operand).span);
                return self.world.push_expr(Expr::new(
                    ExprKind::TypeCast { target: ty_ref.clone(), expr: operand },
                    ty_ref,
                    span,
                ));
            }
        }
        self.pos = checkpoint;
        let inner = self.parse_expression();
        self.expect(TokenKind::RParen, "expected `)` to close parenthesized expression");
        inner
    }

    fn looks_like_type_start(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Keyword(Keyword::Primitive(_)) | TokenKind::Identifier)
    }

    fn next_can_start_primary(&self) -> bool {
        let after_paren = self.peek_at(1);
        matches!(
            after_paren.kind,
            TokenKind::Identifier
                | TokenKind::IntLiteral
                | TokenKind::FloatLiteral
                | TokenKind::StringLiteral
                | TokenKind::CharLiteral
                | TokenKind::LParen
                | TokenKind::Bang
                | TokenKind::Tilde
                | TokenKind::Star
                | TokenKind::Amp
                | TokenKind::Minus
        )
    }

    /// Parses `Type`, `Type*`, `const Type*`, `Namespace::Type` etc.
    pub fn parse_type_reference(&mut self) -> TypeReference {
        let mut is_const = false;
        if self.peek().kind == TokenKind::Keyword(Keyword::Const) {
            self.bump();
            is_const = true;
        }
        let tok = self.bump();
        let mut base = match tok.kind {
            TokenKind::Keyword(Keyword::Primitive(p)) => self.primitive_type_ref(p),
            TokenKind::Identifier => {
                let scopes = self.scope_chain();
                let resolved = self.world.lookup(None, &HashMap::new(), &scopes, &self.enclosing_types, tok.text);
                match resolved {
                    Some(Resolved::Type(t)) => TypeReference::of(t),
                    _ => TypeReference::unresolved(tok.text),
                }
            }
            _ => {
                self.error("expected a type name", tok.span());
                TypeReference::none_sentinel()
            }
        };
        while self.peek().kind == TokenKind::ColonColon {
            self.bump();
            let name_tok = self.bump();
            if let Some(target) = base.target {
                if let Some(&nested) = self
                    .world
                    .type_(target)
                    .nested_types
                    .iter()
                    .find(|&&t| self.world.type_(t).name == name_tok.text)
                {
                    base = TypeReference::of(nested);
                    continue;
                }
            }
            base = TypeReference::unresolved(name_tok.text);
        }
        while self.peek().kind == TokenKind::Star {
            self.bump();
            base.pointer_count += 1;
        }
        base.is_const = is_const;
        base
    }

    fn parse_identifier_primary(&mut self) -> ExprId {
        let tok = self.bump();
        let scopes = self.scope_chain();
        let resolved = self.world.lookup(None, &self.local_vars, &scopes, &self.enclosing_types, tok.text);
        if resolved.is_none() && self.peek().kind == TokenKind::LParen && tok.span().touches(self.peek().start) {
            // Called immediately with nothing in scope under that name:
            // assume an externally-declared C function rather than
            // erroring, since this front-end never opens system headers
            // for their symbols.
            return self.world.push_expr(Expr::new(ExprKind::ExternRef(tok.text), TypeReference::none_sentinel(), tok.span()));
        }
        self.expr_from_resolution(resolved, tok.text, tok.span())
    }

    fn expr_from_resolution(&mut self, resolved: Option<Resolved>, name: Symbol, span: Span) -> ExprId {
        match resolved {
            Some(Resolved::Variable(v)) => {
                let ty = self.world.variable(v).type_ref.clone();
                self.world.push_expr(Expr::new(ExprKind::Variable(v), ty, span))
            }
            Some(Resolved::Function(f)) => {
                let owner_is_method = matches!(self.world.function(f).owner, FuncOwner::Type(_));
                let _ = owner_is_method;
                self.world
                    .push_expr(Expr::new(ExprKind::FunctionRef(f), TypeReference::none_sentinel(), span))
            }
            Some(Resolved::Type(t)) => {
                self.world
                    .push_expr(Expr::new(ExprKind::TypeRef(TypeReference::of(t)), TypeReference::none_sentinel(), span))
            }
            Some(Resolved::Namespace(n)) => {
                self.world
                    .push_expr(Expr::new(ExprKind::NamespaceRef(n), TypeReference::none_sentinel(), span))
            }
            None => {
                self.error(format!("unresolved identifier `{}`", self.world.interner.resolve(name)), span);
                self.none_expr(span)
            }
        }
    }
}

fn parse_int_literal(text: &str) -> i64 {
    let trimmed = text.trim_end_matches(['u', 'U', 'l', 'L']);
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).unwrap_or(0)
    } else if let Some(bin) = trimmed.strip_prefix("0b").or_else(|| trimmed.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2).unwrap_or(0)
    } else if trimmed.len() > 1 && trimmed.starts_with('0') {
        i64::from_str_radix(&trimmed[1..], 8).unwrap_or(0)
    } else {
        trimmed.parse().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::macros::expand;

    fn parse(src: &str) -> (World, ExprId, Vec<SpannedError>) {
        let (tokens, _) = tokenize(src);
        let mut world = World::new();
        let (expanded, _macros, _errs) = expand(src, &tokens, &mut world.interner);
        let ns = world.root;
        let mut parser = ExprParser::new(&mut world, &expanded, ns, Vec::new(), HashMap::new());
        let id = parser.parse_expression();
        let errs = std::mem::take(&mut parser.errors);
        (world, id, errs)
    }

    #[test]
    fn parses_integer_literal() {
        let (world, id, errs) = parse("42");
        assert!(errs.is_empty());
        match &world.expr(id).kind {
            ExprKind::Literal(Literal::Int(v)) => assert_eq!(*v, 42),
            other => panic!("expected int literal, got {:?}", other),
        }
    }

    #[test]
    fn parses_additive_expression_left_associative() {
        let (world, id, errs) = parse("1 + 2 + 3");
        assert!(errs.is_empty());
        match &world.expr(id).kind {
            ExprKind::OperatorCall { op: BinOp::Add, left, .. } => match &world.expr(*left).kind {
                ExprKind::OperatorCall { op: BinOp::Add, .. } => {}
                other => panic!("expected left-nested add, got {:?}", other),
            },
            other => panic!("expected add, got {:?}", other),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let (world, id, errs) = parse("1 + 2 * 3");
        assert!(errs.is_empty());
        match &world.expr(id).kind {
            ExprKind::OperatorCall { op: BinOp::Add, right, .. } => match &world.expr(*right).kind {
                ExprKind::OperatorCall { op: BinOp::Mul, .. } => {}
                other => panic!("expected mul on the right of add, got {:?}", other),
            },
            other => panic!("expected add at the top, got {:?}", other),
        }
    }

    #[test]
    fn assignment_is_right_associative_and_lowest_precedence() {
        let (world, id, errs) = parse("1 == 2");
        assert!(errs.is_empty());
        match &world.expr(id).kind {
            ExprKind::OperatorCall { op: BinOp::Eq, .. } => {}
            other => panic!("expected eq, got {:?}", other),
        }
        assert_eq!(world.expr(id).resolves_to.target, world.primitive_types.get(&PrimitiveKind::Bool).copied());
    }

    #[test]
    fn string_literal_resolves_to_const_u8_pointer() {
        let (world, id, errs) = parse("\"hi\"");
        assert!(errs.is_empty());
        let ty = &world.expr(id).resolves_to;
        assert_eq!(ty.pointer_count, 1);
        assert!(ty.is_const);
    }

    #[test]
    fn sizeof_of_a_primitive_type_resolves_to_u64() {
        let (world, id, errs) = parse("sizeof(i32)");
        assert!(errs.is_empty());
        assert_eq!(world.expr(id).resolves_to.target, world.primitive_types.get(&PrimitiveKind::U64).copied());
    }

    #[test]
    fn minus_assign_is_parsed_as_its_own_operator_call() {
        let (world, id, _errs) = parse("1 -= 2");
        match &world.expr(id).kind {
            ExprKind::OperatorCall { op: BinOp::SubAssign, .. } => {}
            other => panic!("expected -=, got {:?}", other),
        }
    }
}
