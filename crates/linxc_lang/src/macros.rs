//! Macro expander (`spec.md` §4.2).
//!
//! Consumes the lexer's token stream and produces a new stream with every
//! `#define` removed and its expansions substituted at matching identifier
//! occurrences. `#include` tokens are passed through verbatim — resolving
//! them is the statement parser's job (and ultimately the driver's, per
//! `spec.md` §6).
//!
//! Two behaviors are preserved exactly per `spec.md` §4.2/§9 even though
//! they diverge from the classical C preprocessor:
//! - expansion is **not recursive** — a macro body is substituted once and
//!   never re-scanned for further macro invocations;
//! - a function-like macro's arguments are split on *top-level* commas
//!   only (parenthesis balance is tracked, nothing deeper).

use crate::token::{ExpandedToken, PreprocKeyword, Token, TokenKind};
use linxc_base::{Interner, SpannedError, Symbol};

#[derive(Debug, Clone)]
pub struct Macro {
    pub name: Symbol,
    pub is_function_like: bool,
    pub params: Vec<Symbol>,
    pub variadic: bool,
    pub body: Vec<ExpandedToken>,
    pub is_attribute: bool,
}

pub struct MacroExpander<'a> {
    src: &'a str,
    interner: &'a mut Interner,
    tokens: &'a [Token],
    pos: usize,
    pub macros: Vec<Macro>,
    pub errors: Vec<SpannedError>,
    pending_attribute: bool,
}

impl<'a> MacroExpander<'a> {
    pub fn new(src: &'a str, tokens: &'a [Token], interner: &'a mut Interner) -> Self {
        MacroExpander {
            src,
            interner,
            tokens,
            pos: 0,
            macros: Vec::new(),
            errors: Vec::new(),
            pending_attribute: false,
        }
    }

    fn text_of(&self, tok: &Token) -> &'a str {
        &self.src[tok.start..tok.end]
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_significant(&self, mut from: usize) -> Option<&Token> {
        while from < self.tokens.len() {
            let t = &self.tokens[from];
            if !t.is_trivia() {
                return Some(t);
            }
            from += 1;
        }
        None
    }

    fn bump(&mut self) -> Token {
        let t = self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn make_expanded(&mut self, tok: &Token) -> ExpandedToken {
        let text = self.interner.intern(self.text_of(tok));
        ExpandedToken {
            kind: tok.kind,
            text,
            start: tok.start,
            end: tok.end,
        }
    }

    pub fn expand(mut self) -> (Vec<ExpandedToken>, Vec<Macro>, Vec<SpannedError>) {
        let mut out = Vec::new();
        while self.peek().kind != TokenKind::Eof {
            let tok = *self.peek();
            match tok.kind {
                TokenKind::LineComment | TokenKind::BlockComment => {
                    self.bump();
                }
                TokenKind::Newline => {
                    self.bump();
                    self.pending_attribute = false;
                }
                TokenKind::Identifier if self.text_of(&tok) == "attribute" => {
                    self.bump();
                    self.pending_attribute = true;
                }
                TokenKind::Hash => {
                    self.expand_directive_line(&mut out);
                }
                TokenKind::Identifier => {
                    self.bump();
                    if let Some(name) = self.interner.lookup(self.text_of(&tok)) {
                        if let Some(idx) = self.macros.iter().position(|m| m.name == name && !m.is_attribute) {
                            self.expand_macro_use(idx, &tok, &mut out);
                            continue;
                        }
                    }
                    out.push(self.make_expanded(&tok));
                }
                _ => {
                    self.bump();
                    out.push(self.make_expanded(&tok));
                }
            }
        }
        let eof = self.tokens[self.tokens.len() - 1];
        out.push(self.make_expanded(&eof));
        (out, self.macros, self.errors)
    }

    fn expand_directive_line(&mut self, out: &mut Vec<ExpandedToken>) {
        let hash = self.bump();
        let next = self.peek_significant(self.pos).copied();
        match next.map(|t| t.kind) {
            Some(TokenKind::PreprocWord(PreprocKeyword::Define)) => {
                self.skip_trivia();
                self.bump(); // `define`
                self.parse_define();
            }
            Some(TokenKind::PreprocWord(PreprocKeyword::Include)) => {
                // Preserved verbatim for the statement parser.
                out.push(self.make_expanded(&hash));
                self.skip_trivia();
                let kw = self.bump();
                out.push(self.make_expanded(&kw));
                self.skip_trivia();
                if self.peek().kind == TokenKind::MacroString || self.peek().kind == TokenKind::StringLiteral {
                    let path_tok = self.bump();
                    out.push(self.make_expanded(&path_tok));
                } else {
                    self.errors.push(SpannedError::preprocessor(
                        "malformed #include directive",
                        linxc_base::Span::new(hash.start, hash.end),
                    ));
                }
                self.pending_attribute = false;
            }
            _ => {
                // Other directives (#ifdef/#ifndef/#endif/#error/#pragma):
                // left to the statement parser/driver; emit the tokens
                // of this line through untouched.
                out.push(self.make_expanded(&hash));
            }
        }
        self.pending_attribute = false;
    }

    fn skip_trivia(&mut self) {
        while matches!(self.peek().kind, TokenKind::LineComment | TokenKind::BlockComment) {
            self.bump();
        }
    }

    fn parse_define(&mut self) {
        self.skip_trivia();
        if self.peek().kind != TokenKind::Identifier {
            self.errors.push(SpannedError::preprocessor(
                "malformed #define: expected macro name",
                self.peek().span(),
            ));
            self.skip_to_newline();
            return;
        }
        let name_tok = self.bump();
        let name = self.interner.intern(self.text_of(&name_tok));
        let is_function_like =
            self.peek().kind == TokenKind::LParen && name_tok.span().touches(self.peek().start);

        let mut params = Vec::new();
        let mut variadic = false;
        if is_function_like {
            self.bump(); // (
            loop {
                self.skip_trivia();
                match self.peek().kind {
                    TokenKind::RParen => {
                        self.bump();
                        break;
                    }
                    TokenKind::Ellipsis => {
                        self.bump();
                        variadic = true;
                    }
                    TokenKind::Identifier => {
                        let p = self.bump();
                        params.push(self.interner.intern(self.text_of(&p)));
                    }
                    TokenKind::Comma => {
                        self.bump();
                    }
                    TokenKind::Eof | TokenKind::Newline => {
                        self.errors.push(SpannedError::preprocessor(
                            "malformed #define: unterminated parameter list",
                            self.peek().span(),
                        ));
                        break;
                    }
                    _ => {
                        self.bump();
                    }
                }
            }
        }

        let mut body = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::Newline | TokenKind::Eof => break,
                TokenKind::LineComment | TokenKind::BlockComment => {
                    self.bump();
                }
                _ => {
                    let t = self.bump();
                    body.push(self.make_expanded(&t));
                }
            }
        }

        self.macros.push(Macro {
            name,
            is_function_like,
            params,
            variadic,
            body,
            is_attribute: self.pending_attribute,
        });
    }

    fn skip_to_newline(&mut self) {
        while !matches!(self.peek().kind, TokenKind::Newline | TokenKind::Eof) {
            self.bump();
        }
    }

    fn expand_macro_use(&mut self, macro_idx: usize, name_tok: &Token, out: &mut Vec<ExpandedToken>) {
        let is_function_like = self.macros[macro_idx].is_function_like;
        if !is_function_like {
            let body = self.macros[macro_idx].body.clone();
            out.extend(body);
            return;
        }

        self.skip_trivia();
        if self.peek().kind != TokenKind::LParen || !name_tok.span().touches(self.peek().start) {
            // A function-like macro used without a following `(` is left
            // as a bare reference (matches common preprocessor practice
            // of allowing a function-like macro's name to be taken bare).
            out.push(self.make_expanded(name_tok));
            return;
        }
        self.bump(); // (

        let args = self.split_call_arguments();

        let (params, variadic, body) = {
            let m = &self.macros[macro_idx];
            (m.params.clone(), m.variadic, m.body.clone())
        };

        let required = params.len();
        if variadic {
            if args.len() < required {
                self.errors.push(SpannedError::preprocessor(
                    format!(
                        "macro call arity mismatch: expected at least {} argument(s), got {}",
                        required,
                        args.len()
                    ),
                    name_tok.span(),
                ));
            }
        } else if args.len() != required {
            self.errors.push(SpannedError::preprocessor(
                format!(
                    "macro call arity mismatch: expected {} argument(s), got {}",
                    required,
                    args.len()
                ),
                name_tok.span(),
            ));
        }

        for body_tok in &body {
            if let Some(param_idx) = params.iter().position(|p| *p == body_tok.text) {
                if let Some(arg) = args.get(param_idx) {
                    out.extend(arg.iter().cloned());
                }
            } else {
                out.push(body_tok.clone());
            }
        }
    }

    /// Splits arguments on top-level commas: parenthesis balance is
    /// tracked, but not respected beyond that (matches `spec.md` §4.2).
    fn split_call_arguments(&mut self) -> Vec<Vec<ExpandedToken>> {
        let mut args = Vec::new();
        let mut current = Vec::new();
        let mut depth: i32 = 0;
        loop {
            match self.peek().kind {
                TokenKind::Eof => break,
                TokenKind::RParen if depth == 0 => {
                    self.bump();
                    args.push(current);
                    break;
                }
                TokenKind::Comma if depth == 0 => {
                    self.bump();
                    args.push(std::mem::take(&mut current));
                }
                TokenKind::LParen => {
                    depth += 1;
                    let t = self.bump();
                    current.push(self.make_expanded(&t));
                }
                TokenKind::RParen => {
                    depth -= 1;
                    let t = self.bump();
                    current.push(self.make_expanded(&t));
                }
                TokenKind::LineComment | TokenKind::BlockComment => {
                    self.bump();
                }
                _ => {
                    let t = self.bump();
                    current.push(self.make_expanded(&t));
                }
            }
        }
        // A call with zero arguments and no params yields one empty arg
        // list after the loop above unless the call site was `NAME()`.
        if args.len() == 1 && args[0].is_empty() {
            return Vec::new();
        }
        args
    }
}

pub fn expand(src: &str, tokens: &[Token], interner: &mut Interner) -> (Vec<ExpandedToken>, Vec<Macro>, Vec<SpannedError>) {
    MacroExpander::new(src, tokens, interner).expand()
}
