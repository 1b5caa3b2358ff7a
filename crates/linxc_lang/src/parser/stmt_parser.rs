//! Statement parser: the compound-block driver (`spec.md` §4.6).
//!
//! A single [`StmtParser`] walks a flat token stream and recognizes,
//! at each position, one of: `#include`, `namespace { ... }`,
//! `struct Name { ... }`, `return ...;`, a declaration whose head is a
//! type expression (a variable or a function, disambiguated by
//! whether `(` follows the name), or a bare expression statement.
//! Parsing stops at one of six terminators mirroring the original
//! `LinxcEndOn`: a top-level `;`, the closing `}` of the current block,
//! a closing `)` (inside a `for`/`if` header), `#endif`, end of file,
//! or — for a single-statement `if`/`else`/`for` body with no braces —
//! after exactly one statement.

use crate::ast::{Stmt, StmtId, StmtKind};
use crate::namespace::World;
use crate::parser::expr_parser::ExprParser;
use crate::token::{ExpandedToken, Keyword, TokenKind};
use crate::types::{can_assign, FuncOwner, Function, NamespaceId, PrimitiveKind, TypeId, TypeReference, Variable};
use linxc_base::{SpannedError, Span};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOn {
    Semicolon,
    RBrace,
    RParen,
    Eof,
    SingleStatement,
}

pub struct StmtParser<'w, 'a> {
    pub world: &'w mut World,
    tokens: &'a [ExpandedToken],
    pos: usize,
    pub current_namespace: NamespaceId,
    pub enclosing_types: Vec<TypeId>,
    pub local_vars: HashMap<linxc_base::Symbol, crate::types::VarId>,
    pub errors: Vec<SpannedError>,
}

impl<'w, 'a> StmtParser<'w, 'a> {
    pub fn new(world: &'w mut World, tokens: &'a [ExpandedToken], current_namespace: NamespaceId) -> Self {
        StmtParser {
            world,
            tokens,
            pos: 0,
            current_namespace,
            enclosing_types: Vec::new(),
            local_vars: HashMap::new(),
            errors: Vec::new(),
        }
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

    fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.errors.push(SpannedError::syntactic(message, span));
    }

    /// Checks a variable declaration's initializer against its declared
    /// type via `canAssign` (`spec.md` §4.5), recording a diagnostic if
    /// the assignment isn't allowed — the statement-level counterpart of
    /// `ExprParser::check_assignable` (assignment *expressions* are
    /// checked there instead).
    fn check_assignable(&mut self, dst: &TypeReference, src_expr: crate::ast::ExprId, span: Span) {
        if dst.is_sentinel() {
            return;
        }
        let src_ty = self.world.expr(src_expr).resolves_to.clone();
        let is_string_literal = matches!(
            self.world.expr(src_expr).kind,
            crate::ast::ExprKind::Literal(crate::ast::expr::Literal::Str(_))
        );
        let u8_ty = self.world.primitive_types[&PrimitiveKind::U8];
        let void_ty = self.world.primitive_types[&PrimitiveKind::Void];
        if can_assign(dst, &src_ty, is_string_literal, u8_ty, void_ty, &self.world.implicit_casts) {
            return;
        }
        if is_string_literal {
            self.errors
                .push(SpannedError::type_error("String literals may only be assigned to const u8*", span));
        } else {
            self.errors.push(SpannedError::type_error(
                "value cannot be implicitly converted to the declared type. An explicit cast is required.",
                span,
            ));
        }
    }

    /// Parses every top-level statement in the file.
    pub fn parse_file(&mut self) -> Vec<StmtId> {
        self.parse_block(EndOn::Eof)
    }

    fn parse_block(&mut self, end_on: EndOn) -> Vec<StmtId> {
        let mut stmts = Vec::new();
        loop {
            match end_on {
                EndOn::Eof if self.at_end() => break,
                EndOn::RBrace if self.peek().kind == TokenKind::RBrace || self.at_end() => break,
                EndOn::RParen if self.peek().kind == TokenKind::RParen || self.at_end() => break,
                EndOn::Semicolon if self.peek().kind == TokenKind::Semicolon || self.at_end() => break,
                _ => {}
            }
            if self.at_end() {
                break;
            }
            let before = self.pos;
            let stmt = self.parse_statement();
            stmts.push(stmt);
            if end_on == EndOn::SingleStatement {
                break;
            }
            if self.pos == before {
                // Guard against an infinite loop on malformed input.
                self.bump();
            }
        }
        stmts
    }

    fn recover_to_next_boundary(&mut self) {
        while !matches!(self.peek().kind, TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Hash | TokenKind::Eof) {
            self.bump();
        }
        if self.peek().kind == TokenKind::Semicolon {
            self.bump();
        }
    }

    fn parse_statement(&mut self) -> StmtId {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Hash => self.parse_include(),
            TokenKind::Keyword(Keyword::Namespace) => self.parse_namespace(),
            TokenKind::Keyword(Keyword::Struct) => self.parse_struct(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return(),
            TokenKind::Keyword(Keyword::If) => self.parse_if(),
            TokenKind::Keyword(Keyword::Else) => self.parse_else(),
            TokenKind::Keyword(Keyword::For) => self.parse_for(),
            TokenKind::Keyword(Keyword::UseLang) => self.parse_use_lang(),
            _ => self.parse_declaration_or_expression_statement(),
        }
    }

    /// Handles a line starting with `#`. Only `#include` is given a
    /// dedicated statement shape; the other directives the lexer/macro
    /// expander recognize (`#ifdef`, `#ifndef`, `#endif`, `#error`,
    /// `#pragma`) are conditional-compilation and build concerns the
    /// driver owns per `spec.md` §6 — this parser skips their line
    /// rather than modeling them as statements.
    fn parse_include(&mut self) -> StmtId {
        let hash = self.bump();
        if !matches!(self.peek().kind, TokenKind::PreprocWord(crate::token::PreprocKeyword::Include)) {
            self.recover_to_next_boundary();
            return self.world.push_stmt(Stmt::new(
                StmtKind::Include { path: linxc_base::Symbol::EMPTY, is_angle_bracket: false },
                hash.span(),
            ));
        }
        self.bump(); // `include`
        let path_tok = self.peek();
        let (path, is_angle_bracket) = match path_tok.kind {
            TokenKind::MacroString => {
                self.bump();
                (path_tok.text, true)
            }
            TokenKind::StringLiteral => {
                self.bump();
                (path_tok.text, false)
            }
            _ => {
                self.error("expected a path after #include", path_tok.span());
                (linxc_base::Symbol::EMPTY, false)
            }
        };
        let span = hash.span().merge(path_tok.span());
        self.world.push_stmt(Stmt::new(StmtKind::Include { path, is_angle_bracket }, span))
    }

    fn parse_namespace(&mut self) -> StmtId {
        let kw = self.bump();
        let name_tok = self.bump();
        let name = name_tok.text;
        let ns = self.world.new_namespace(name, self.current_namespace);
        self.expect(TokenKind::LBrace, "expected `{` after namespace name");
        let saved = self.current_namespace;
        self.current_namespace = ns;
        let body = self.parse_block(EndOn::RBrace);
        self.current_namespace = saved;
        let end = self.expect(TokenKind::RBrace, "expected `}` to close namespace body");
        let span = kw.span().merge(end.unwrap_or(name_tok.span()));
        self.world.push_stmt(Stmt::new(StmtKind::NamespaceScope { namespace: ns, body }, span))
    }

    fn parse_struct(&mut self) -> StmtId {
        let kw = self.bump();
        let name_tok = self.bump();
        let parent_type = self.enclosing_types.last().copied();
        let ty = crate::types::Type::new(name_tok.text, self.current_namespace, parent_type);
        let type_id = self.world.declare_type(self.current_namespace, ty);
        if let Some(parent) = parent_type {
            self.world.type_mut(parent).nested_types.push(type_id);
        }

        self.expect(TokenKind::LBrace, "expected `{` after struct name");
        self.enclosing_types.push(type_id);
        loop {
            if self.peek().kind == TokenKind::RBrace || self.at_end() {
                break;
            }
            self.parse_struct_member(type_id);
        }
        self.enclosing_types.pop();
        let end = self.expect(TokenKind::RBrace, "expected `}` to close struct body");
        self.expect(TokenKind::Semicolon, "expected `;` after struct declaration");
        let span = kw.span().merge(end.unwrap_or(name_tok.span()));
        self.world.push_stmt(Stmt::new(StmtKind::TypeDecl(type_id), span))
    }

    fn parse_struct_member(&mut self, owner: TypeId) {
        let type_ref = {
            let mut ep = ExprParser::new(self.world, self.tokens_from_here(), self.current_namespace, self.enclosing_types.clone(), HashMap::new());
            let tr = ep.parse_type_reference();
            let consumed = ep_consumed(&ep);
            let mut ep_errors = ep.errors;
            self.advance_by(consumed);
            self.errors.append(&mut ep_errors);
            tr
        };
        if self.peek().kind == TokenKind::Keyword(Keyword::Operator) {
            self.parse_operator_overload(owner, type_ref);
            return;
        }
        let name_tok = self.bump();
        if self.peek().kind == TokenKind::LParen {
            // A method: implicit `this` param per `spec.md` §6.
            let func_id = self.parse_function_like(type_ref, name_tok, Some(owner));
            self.world.type_mut(owner).methods.push(func_id);
        } else {
            self.expect(TokenKind::Semicolon, "expected `;` after field declaration");
            let var = Variable {
                name: name_tok.text,
                type_ref,
                default_value: None,
                member_of: Some(owner),
                is_const: false,
            };
            let var_id = self.world.push_variable(var);
            self.world.type_mut(owner).variables.push(var_id);
        }
    }

    /// Parses `operator<symbol>(params) { body }` inside a struct body,
    /// registering the resulting method in the owner type's overload
    /// table (`spec.md` §4.5) under the *non-assign* form of the parsed
    /// operator, keyed by the right-hand operand's type so
    /// `operator_result_type` can find it by `(left, right)` the same
    /// way it finds primitive arithmetic.
    fn parse_operator_overload(&mut self, owner: TypeId, return_type: TypeReference) {
        let kw = self.bump(); // `operator`
        let op_tok = self.bump();
        let Some(op) = crate::types::BinOp::from_token(op_tok.kind) else {
            self.error("expected an operator symbol after `operator`", op_tok.span());
            self.recover_to_next_boundary();
            return;
        };
        let synthetic = self.world.interner.intern(operator_overload_name(op.non_assign_form()));
        let name_tok = ExpandedToken {
            kind: TokenKind::Identifier,
            text: synthetic,
            start: kw.start,
            end: op_tok.end,
        };
        let func_id = self.parse_function_like(return_type, name_tok, Some(owner));
        self.world.type_mut(owner).methods.push(func_id);
        let right = self
            .world
            .function(func_id)
            .params
            .get(1)
            .and_then(|&v| self.world.variable(v).type_ref.target);
        if let Some(right) = right {
            let key = crate::types::OperatorImpl::Operator { op: op.non_assign_form(), left: owner, right };
            self.world
                .type_mut(owner)
                .operator_overloads
                .insert(key.clone(), crate::types::OperatorFunc { key, function: func_id });
        }
    }

    /// Parses a parameter list and body for either a method (`owner_type
    /// = Some(_)`, receiving a synthesized `this` pointer as its first
    /// parameter per `spec.md` §6) or a free function (`owner_type =
    /// None`).
    fn parse_function_like(
        &mut self,
        return_type: crate::types::TypeReference,
        name_tok: ExpandedToken,
        owner_type: Option<TypeId>,
    ) -> crate::types::FuncId {
        self.bump(); // (
        let mut params = Vec::new();
        let mut required: u32 = 0;
        let mut variadic = false;
        if let Some(owner) = owner_type {
            let this_ty = crate::types::TypeReference::of(owner).with_pointer_depth(1);
            let this_name = self.world.interner.intern("this");
            let this_var = self.world.push_variable(Variable {
                name: this_name,
                type_ref: this_ty,
                default_value: None,
                member_of: Some(owner),
                is_const: false,
            });
            params.push(this_var);
            required += 1;
        }
        if self.peek().kind != TokenKind::RParen {
            loop {
                if self.peek().kind == TokenKind::Ellipsis {
                    // A trailing `...` consumes all remaining arguments
                    // without per-argument type checking (`spec.md`
                    // §4.4) and must be the parameter list's last entry.
                    self.bump();
                    variadic = true;
                    break;
                }
                let ptr = {
                    let mut ep = ExprParser::new(self.world, self.tokens_from_here(), self.current_namespace, self.enclosing_types.clone(), HashMap::new());
                    let tr = ep.parse_type_reference();
                    let consumed = ep_consumed(&ep);
                    let mut ep_errors = ep.errors;
                    self.advance_by(consumed);
                    self.errors.append(&mut ep_errors);
                    tr
                };
                let pname_tok = self.bump();
                let pvar = self.world.push_variable(Variable {
                    name: pname_tok.text,
                    type_ref: ptr,
                    default_value: None,
                    member_of: None,
                    is_const: false,
                });
                params.push(pvar);
                required += 1;
                if self.peek().kind == TokenKind::Comma {
                    self.bump();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen, "expected `)` to close parameter list");
        self.expect(TokenKind::LBrace, "expected `{` to open method body");

        let mut locals = HashMap::new();
        for &p in &params {
            locals.insert(self.world.variable(p).name, p);
        }
        if let Some(owner) = owner_type {
            self.enclosing_types.push(owner);
        }
        let saved_locals = std::mem::replace(&mut self.local_vars, locals);
        let body = self.parse_block(EndOn::RBrace);
        self.local_vars = saved_locals;
        if owner_type.is_some() {
            self.enclosing_types.pop();
        }
        self.expect(TokenKind::RBrace, "expected `}` to close method body");

        let owner = match owner_type {
            Some(t) => FuncOwner::Type(t),
            None => FuncOwner::Namespace(self.current_namespace),
        };
        let func = Function {
            name: name_tok.text,
            owner,
            return_type,
            params,
            required_params: required,
            template_params: Vec::new(),
            variadic,
            body,
            is_method: owner_type.is_some(),
        };
        self.world.push_function(func)
    }

    fn parse_return(&mut self) -> StmtId {
        let kw = self.bump();
        if self.peek().kind == TokenKind::Semicolon {
            self.bump();
            return self.world.push_stmt(Stmt::new(StmtKind::Return(None), kw.span()));
        }
        let value = self.parse_owned_expression();
        let end = self.expect(TokenKind::Semicolon, "expected `;` after return value");
        let span = kw.span().merge(end.unwrap_or(kw.span()));
        self.world.push_stmt(Stmt::new(StmtKind::Return(Some(value)), span))
    }

    fn parse_if(&mut self) -> StmtId {
        let kw = self.bump();
        self.expect(TokenKind::LParen, "expected `(` after `if`");
        let cond = self.parse_owned_expression();
        self.expect(TokenKind::RParen, "expected `)` after `if` condition");
        let then_body = self.parse_braced_or_single();
        let span = kw.span();
        self.world.push_stmt(Stmt::new(StmtKind::If { condition: cond, then_body }, span))
    }

    fn parse_else(&mut self) -> StmtId {
        let kw = self.bump();
        let body = self.parse_braced_or_single();
        self.world.push_stmt(Stmt::new(StmtKind::Else { body }, kw.span()))
    }

    fn parse_for(&mut self) -> StmtId {
        let kw = self.bump();
        self.expect(TokenKind::LParen, "expected `(` after `for`");
        let init = if self.peek().kind == TokenKind::Semicolon {
            self.bump();
            None
        } else {
            let s = self.parse_declaration_or_expression_statement();
            Some(s)
        };
        let condition = if self.peek().kind == TokenKind::Semicolon {
            None
        } else {
            Some(self.parse_owned_expression())
        };
        self.expect(TokenKind::Semicolon, "expected `;` after `for` condition");
        let post = if self.peek().kind == TokenKind::RParen {
            None
        } else {
            Some(self.parse_owned_expression())
        };
        self.expect(TokenKind::RParen, "expected `)` to close `for` header");
        let body = self.parse_braced_or_single();
        self.world.push_stmt(Stmt::new(StmtKind::For { init, condition, post, body }, kw.span()))
    }

    fn parse_use_lang(&mut self) -> StmtId {
        let kw = self.bump();
        let name_tok = self.bump();
        self.expect(TokenKind::Semicolon, "expected `;` after `uselang` directive");
        let span = kw.span().merge(name_tok.span());
        self.world.push_stmt(Stmt::new(StmtKind::UseLang { name: name_tok.text }, span))
    }

    fn parse_braced_or_single(&mut self) -> Vec<StmtId> {
        if self.peek().kind == TokenKind::LBrace {
            self.bump();
            let body = self.parse_block(EndOn::RBrace);
            self.expect(TokenKind::RBrace, "expected `}` to close block");
            body
        } else {
            self.parse_block(EndOn::SingleStatement)
        }
    }

    fn is_start_of_type_expression(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Keyword(Keyword::Primitive(_)) | TokenKind::Keyword(Keyword::Const))
            || (self.peek().kind == TokenKind::Identifier && self.peek_at(1).kind == TokenKind::Identifier)
    }

    fn parse_declaration_or_expression_statement(&mut self) -> StmtId {
        if self.is_start_of_type_expression() {
            return self.parse_var_decl();
        }
        let start_span = self.peek().span();
        let expr = self.parse_owned_expression();
        let end = self.expect(TokenKind::Semicolon, "expected `;` after expression statement");
        let span = start_span.merge(end.unwrap_or(start_span));
        self.world.push_stmt(Stmt::new(StmtKind::ExpressionStmt(expr), span))
    }

    fn parse_var_decl(&mut self) -> StmtId {
        let start_span = self.peek().span();
        let type_ref = {
            let mut ep = ExprParser::new(self.world, self.tokens_from_here(), self.current_namespace, self.enclosing_types.clone(), HashMap::new());
            let tr = ep.parse_type_reference();
            let consumed = ep_consumed(&ep);
            let mut ep_errors = ep.errors;
            self.advance_by(consumed);
            self.errors.append(&mut ep_errors);
            tr
        };
        let name_tok = self.bump();
        if self.peek().kind == TokenKind::LParen {
            let func_id = self.parse_function_like(type_ref, name_tok, None);
            self.world.namespace_mut(self.current_namespace).functions.entry(name_tok.text).or_default().push(func_id);
            return self.world.push_stmt(Stmt::new(StmtKind::FuncDecl(func_id), start_span));
        }
        let default_value = if self.peek().kind == TokenKind::Eq {
            self.bump();
            let value = self.parse_owned_expression();
            let span = self.world.expr(value).span;
            self.check_assignable(&type_ref, value, span);
            Some(value)
        } else {
            None
        };
        let end = self.expect(TokenKind::Semicolon, "expected `;` after variable declaration");
        let var = Variable {
            name: name_tok.text,
            type_ref,
            default_value,
            member_of: None,
            is_const: false,
        };
        let var_id = self.world.push_variable(var);
        self.world.namespace_mut(self.current_namespace).variables.insert(name_tok.text, var_id);
        self.local_vars.insert(name_tok.text, var_id);
        let span = start_span.merge(end.unwrap_or(start_span));
        self.world.push_stmt(Stmt::new(StmtKind::VarDecl(var_id), span))
    }

    fn parse_owned_expression(&mut self) -> crate::ast::ExprId {
        let mut ep = ExprParser::new(self.world, self.tokens_from_here(), self.current_namespace, self.enclosing_types.clone(), self.local_vars.clone());
        let id = ep.parse_expression();
        let consumed = ep_consumed(&ep);
        let mut ep_errors = ep.errors;
        self.advance_by(consumed);
        self.errors.append(&mut ep_errors);
        id
    }

    fn tokens_from_here(&self) -> &'a [ExpandedToken] {
        &self.tokens[self.pos..]
    }

    fn advance_by(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.tokens.len() - 1);
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Option<Span> {
        if self.peek().kind == kind {
            Some(self.bump().span())
        } else {
            self.error(message, self.peek().span());
            self.recover_to_next_boundary();
            None
        }
    }
}

fn ep_consumed(ep: &ExprParser) -> usize {
    ep.consumed()
}

/// A valid-C-identifier stand-in for each operator symbol, used as the
/// emitted function's own name segment (mangling then prefixes it with
/// the owning type, e.g. `V_operator_add`).
fn operator_overload_name(op: crate::types::BinOp) -> &'static str {
    use crate::types::BinOp;
    match op {
        BinOp::Add => "operator_add",
        BinOp::Sub => "operator_sub",
        BinOp::Mul => "operator_mul",
        BinOp::Div => "operator_div",
        BinOp::Mod => "operator_mod",
        BinOp::Eq => "operator_eq",
        BinOp::NotEq => "operator_noteq",
        BinOp::Lt => "operator_lt",
        BinOp::LtEq => "operator_lteq",
        BinOp::Gt => "operator_gt",
        BinOp::GtEq => "operator_gteq",
        BinOp::And => "operator_and",
        BinOp::Or => "operator_or",
        BinOp::BitAnd => "operator_bitand",
        BinOp::BitOr => "operator_bitor",
        BinOp::BitXor => "operator_bitxor",
        BinOp::Assign => "operator_assign",
        BinOp::AddAssign => "operator_addassign",
        BinOp::SubAssign => "operator_subassign",
        BinOp::MulAssign => "operator_mulassign",
        BinOp::DivAssign => "operator_divassign",
        BinOp::ModAssign => "operator_modassign",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::macros::expand;

    fn parse_file(src: &str) -> (World, Vec<StmtId>, Vec<SpannedError>) {
        let (tokens, _) = tokenize(src);
        let mut world = World::new();
        let (expanded, _macros, _errs) = expand(src, &tokens, &mut world.interner);
        let ns = world.root;
        let mut parser = StmtParser::new(&mut world, &expanded, ns);
        let stmts = parser.parse_file();
        let errs = std::mem::take(&mut parser.errors);
        (world, stmts, errs)
    }

    #[test]
    fn parses_struct_with_field_and_method() {
        let (world, stmts, errs) = parse_file("struct Point { i32 x; i32 sum() { return x; } };");
        assert!(errs.is_empty(), "unexpected errors: {:?}", errs);
        assert_eq!(stmts.len(), 1);
        match world.stmt(stmts[0]).kind.clone() {
            StmtKind::TypeDecl(ty) => {
                let t = world.type_(ty);
                assert_eq!(t.variables.len(), 1);
                assert_eq!(t.methods.len(), 1);
                let m = world.function(t.methods[0]);
                assert_eq!(m.params.len(), 1, "implicit `this` should be the sole parameter");
            }
            other => panic!("expected TypeDecl, got {:?}", other),
        }
    }

    #[test]
    fn parses_namespace_block() {
        let (world, stmts, errs) = parse_file("namespace Foo { i32 x; }");
        assert!(errs.is_empty());
        match world.stmt(stmts[0]).kind.clone() {
            StmtKind::NamespaceScope { namespace, ref body } => {
                assert_eq!(body.len(), 1);
                assert_ne!(namespace, world.root);
            }
            other => panic!("expected NamespaceScope, got {:?}", other),
        }
    }

    #[test]
    fn parses_return_statement_with_value() {
        let (world, stmts, errs) = parse_file("return 1 + 2;");
        assert!(errs.is_empty());
        match world.stmt(stmts[0]).kind.clone() {
            StmtKind::Return(Some(_)) => {}
            other => panic!("expected Return(Some), got {:?}", other),
        }
    }

    #[test]
    fn parses_if_with_braced_body() {
        let (_world, stmts, errs) = parse_file("if (1 == 1) { return 1; }");
        assert!(errs.is_empty());
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn parses_variadic_function_declaration() {
        let (world, stmts, errs) = parse_file("void printf_like(const u8* fmt, ...) { return; }");
        assert!(errs.is_empty(), "unexpected errors: {:?}", errs);
        match world.stmt(stmts[0]).kind.clone() {
            StmtKind::FuncDecl(f) => {
                let func = world.function(f);
                assert!(func.variadic, "trailing `...` should mark the function variadic");
                assert_eq!(func.params.len(), 1, "`...` is not itself a named parameter");
                assert_eq!(func.required_params, 1);
            }
            other => panic!("expected FuncDecl, got {:?}", other),
        }
    }

    #[test]
    fn parses_include_directive() {
        let (world, stmts, errs) = parse_file("#include <stdio.h>\n");
        assert!(errs.is_empty());
        match world.stmt(stmts[0]).kind.clone() {
            StmtKind::Include { is_angle_bracket, .. } => assert!(is_angle_bracket),
            other => panic!("expected Include, got {:?}", other),
        }
    }

    #[test]
    fn parses_variable_declaration_with_initializer() {
        let (world, stmts, errs) = parse_file("i32 x = 5;");
        assert!(errs.is_empty());
        match world.stmt(stmts[0]).kind.clone() {
            StmtKind::VarDecl(v) => assert!(world.variable(v).default_value.is_some()),
            other => panic!("expected VarDecl, got {:?}", other),
        }
    }
}
