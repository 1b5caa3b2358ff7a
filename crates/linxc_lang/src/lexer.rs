//! Single-pass DFA lexer: byte buffer to token stream.
//!
//! Implements `spec.md` §4.1. The lexer is a plain iterator-driven scanner
//! (no external lexer-generator crate is used) rather than a literal
//! table-driven state machine, but every state `spec.md` names has a corresponding
//! branch below: start, CR, backslash-continuation, string/char literal
//! (with octal/hex/unicode escape handling), identifier, line/block
//! comment, numeric literal (octal/binary/hex/decimal/float), and
//! multi-character punctuator continuations.
//!
//! Guarantee: `tokenize` terminates on every input, the last token is
//! always `Eof`, and every byte of the source belongs to exactly one
//! token's `[start, end)` span (whitespace excepted) — this underlies the
//! lex round-trip property in `spec.md` §8.

use crate::token::{Keyword, PreprocKeyword, Token, TokenKind};
use linxc_base::{ErrorKind, SpannedError};

pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    /// True until the first non-trivia token on the current line has been
    /// produced; used to decide whether `#` starts a preprocessor line.
    line_start: bool,
    /// Set once a `#` has been seen as the first significant token on the
    /// current line; cleared at the next newline.
    on_preproc_line: bool,
    /// Set for the remainder of a `#include` line so that `<` opens a
    /// `MacroString` instead of being the less-than operator.
    in_include_tail: bool,
    pub errors: Vec<SpannedError>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            src: src.as_bytes(),
            pos: 0,
            line_start: true,
            on_preproc_line: false,
            in_include_tail: false,
            errors: Vec::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    /// Consumes `\<newline>` (and `\r\n` variants) wherever it occurs;
    /// returns true if a continuation was swallowed so the caller can
    /// retry its current decision at the new position.
    fn skip_line_continuation(&mut self) -> bool {
        if self.peek() == Some(b'\\') {
            let mut look = self.pos + 1;
            if self.src.get(look) == Some(&b'\r') {
                look += 1;
            }
            if self.src.get(look) == Some(&b'\n') {
                self.pos = look + 1;
                return true;
            }
        }
        false
    }

    fn skip_continuations(&mut self) {
        while self.skip_line_continuation() {}
    }

    pub fn tokenize(mut self) -> (Vec<Token>, Vec<SpannedError>) {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        (tokens, self.errors)
    }

    fn next_token(&mut self) -> Token {
        self.skip_continuations();
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') => {
                    self.pos += 1;
                    self.skip_continuations();
                }
                Some(b'\r') => {
                    self.pos += 1;
                    self.skip_continuations();
                }
                _ => break,
            }
        }

        let start = self.pos;
        let c = match self.peek() {
            None => return Token::new(TokenKind::Eof, start, start),
            Some(c) => c,
        };

        if c == b'\n' {
            self.pos += 1;
            self.line_start = true;
            self.on_preproc_line = false;
            self.in_include_tail = false;
            return Token::new(TokenKind::Newline, start, self.pos);
        }

        let was_line_start = self.line_start;
        self.line_start = false;

        if c == b'#' {
            self.pos += 1;
            if was_line_start {
                self.on_preproc_line = true;
            }
            return Token::new(TokenKind::Hash, start, self.pos);
        }

        if c == b'/' && self.peek_at(1) == Some(b'/') {
            return self.lex_line_comment(start);
        }
        if c == b'/' && self.peek_at(1) == Some(b'*') {
            return self.lex_block_comment(start);
        }

        if c.is_ascii_digit() {
            return self.lex_number(start);
        }

        if is_ident_start(c) {
            return self.lex_identifier(start);
        }

        if c == b'"' {
            return self.lex_string(start);
        }
        if c == b'\'' {
            return self.lex_char(start);
        }

        if c == b'<' && self.in_include_tail {
            return self.lex_macro_string(start);
        }

        self.lex_punctuation(start)
    }

    fn lex_line_comment(&mut self, start: usize) -> Token {
        self.pos += 2;
        while let Some(c) = self.peek() {
            if c == b'\n' {
                break;
            }
            if self.skip_line_continuation() {
                continue;
            }
            self.pos += 1;
        }
        Token::new(TokenKind::LineComment, start, self.pos)
    }

    fn lex_block_comment(&mut self, start: usize) -> Token {
        self.pos += 2;
        loop {
            match self.peek() {
                None => {
                    self.errors.push(SpannedError::lexical(
                        "unterminated block comment",
                        linxc_base::Span::new(start, self.pos),
                    ));
                    break;
                }
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.pos += 2;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        Token::new(TokenKind::BlockComment, start, self.pos)
    }

    fn lex_identifier(&mut self, start: usize) -> Token {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.pos += 1;
            } else if self.skip_line_continuation() {
                continue;
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or("");

        if self.on_preproc_line && self.is_first_word_on_preproc_line(start) {
            if let Some(pw) = PreprocKeyword::from_name(text) {
                if pw == PreprocKeyword::Include {
                    self.in_include_tail = true;
                }
                return Token::new(TokenKind::PreprocWord(pw), start, self.pos);
            }
        }

        if let Some(kw) = Keyword::from_name(text) {
            return Token::new(TokenKind::Keyword(kw), start, self.pos);
        }
        Token::new(TokenKind::Identifier, start, self.pos)
    }

    /// A preprocessor keyword is only honored as the token immediately
    /// after the line's `#` (ignoring whitespace); approximate this by
    /// checking that nothing but `#`, spaces, and line-continuations sit
    /// between the start of this identifier and the preceding `#`.
    fn is_first_word_on_preproc_line(&self, ident_start: usize) -> bool {
        let mut i = ident_start;
        while i > 0 {
            i -= 1;
            match self.src[i] {
                b' ' | b'\t' | b'\r' => continue,
                b'#' => return true,
                b'\n' => return false,
                _ => return false,
            }
        }
        false
    }

    fn lex_number(&mut self, start: usize) -> Token {
        let mut is_float = false;
        if self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x') | Some(b'X')) {
            self.pos += 2;
            while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            return Token::new(TokenKind::IntLiteral, start, self.pos);
        }
        if self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'b') | Some(b'B')) {
            self.pos += 2;
            while matches!(self.peek(), Some(b'0') | Some(b'1')) {
                self.pos += 1;
            }
            return Token::new(TokenKind::IntLiteral, start, self.pos);
        }
        if self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
            while matches!(self.peek(), Some(c) if (b'0'..=b'7').contains(&c)) {
                self.pos += 1;
            }
            return Token::new(TokenKind::IntLiteral, start, self.pos);
        }

        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(c) if c.is_ascii_digit()) {
            is_float = true;
            self.pos += 1;
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            let save = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            if matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                is_float = true;
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.pos += 1;
                }
            } else {
                self.pos = save;
            }
        }
        // Suffixes: f/F for float, u/U l/L for integers.
        while matches!(self.peek(), Some(b'f') | Some(b'F') | Some(b'u') | Some(b'U') | Some(b'l') | Some(b'L')) {
            if matches!(self.peek(), Some(b'f') | Some(b'F')) {
                is_float = true;
            }
            self.pos += 1;
        }

        Token::new(
            if is_float { TokenKind::FloatLiteral } else { TokenKind::IntLiteral },
            start,
            self.pos,
        )
    }

    fn lex_string(&mut self, start: usize) -> Token {
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    self.errors.push(SpannedError::lexical(
                        "unterminated string literal",
                        linxc_base::Span::new(start, self.pos),
                    ));
                    break;
                }
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    self.lex_escape_sequence();
                }
                _ => self.pos += 1,
            }
        }
        Token::new(TokenKind::StringLiteral, start, self.pos)
    }

    fn lex_char(&mut self, start: usize) -> Token {
        self.pos += 1;
        match self.peek() {
            Some(b'\\') => {
                self.pos += 1;
                self.lex_escape_sequence();
            }
            Some(b'\'') | None => {
                self.errors.push(SpannedError::lexical(
                    "empty character literal",
                    linxc_base::Span::new(start, self.pos),
                ));
            }
            _ => self.pos += 1,
        }
        if self.peek() == Some(b'\'') {
            self.pos += 1;
        } else {
            self.errors.push(SpannedError::lexical(
                "unterminated character literal",
                linxc_base::Span::new(start, self.pos),
            ));
        }
        Token::new(TokenKind::CharLiteral, start, self.pos)
    }

    /// Octal (`\NNN`), hex (`\xHH`), and unicode (`\uHHHH`/`\UHHHHHHHH`)
    /// escape sub-states, plus the single-character escapes.
    fn lex_escape_sequence(&mut self) {
        match self.peek() {
            Some(b'x') => {
                self.pos += 1;
                while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                    self.pos += 1;
                }
            }
            Some(b'u') => {
                self.pos += 1;
                for _ in 0..4 {
                    if matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                        self.pos += 1;
                    }
                }
            }
            Some(b'U') => {
                self.pos += 1;
                for _ in 0..8 {
                    if matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                        self.pos += 1;
                    }
                }
            }
            Some(c) if (b'0'..=b'7').contains(&c) => {
                for _ in 0..3 {
                    if matches!(self.peek(), Some(c) if (b'0'..=b'7').contains(&c)) {
                        self.pos += 1;
                    }
                }
            }
            Some(_) => self.pos += 1,
            None => {}
        }
    }

    fn lex_macro_string(&mut self, start: usize) -> Token {
        self.pos += 1;
        while let Some(c) = self.peek() {
            if c == b'>' || c == b'\n' {
                break;
            }
            self.pos += 1;
        }
        if self.peek() == Some(b'>') {
            self.pos += 1;
        } else {
            self.errors.push(SpannedError::lexical(
                "unterminated include path, expected '>'",
                linxc_base::Span::new(start, self.pos),
            ));
        }
        self.in_include_tail = false;
        Token::new(TokenKind::MacroString, start, self.pos)
    }

    fn lex_punctuation(&mut self, start: usize) -> Token {
        let c = self.bump().unwrap();
        macro_rules! two {
            ($next:expr, $two:expr, $one:expr) => {{
                if self.peek() == Some($next) {
                    self.pos += 1;
                    $two
                } else {
                    $one
                }
            }};
        }
        let kind = match c {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b';' => TokenKind::Semicolon,
            b',' => TokenKind::Comma,
            b':' => two!(b':', TokenKind::ColonColon, TokenKind::Colon),
            b'.' => {
                if self.peek() == Some(b'.') && self.peek_at(1) == Some(b'.') {
                    self.pos += 2;
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Dot
                }
            }
            b'+' => {
                if self.peek() == Some(b'+') {
                    self.pos += 1;
                    TokenKind::PlusPlus
                } else {
                    two!(b'=', TokenKind::PlusEq, TokenKind::Plus)
                }
            }
            b'-' => {
                if self.peek() == Some(b'-') {
                    self.pos += 1;
                    TokenKind::MinusMinus
                } else if self.peek() == Some(b'>') {
                    self.pos += 1;
                    TokenKind::Arrow
                } else {
                    two!(b'=', TokenKind::MinusEq, TokenKind::Minus)
                }
            }
            b'*' => two!(b'=', TokenKind::StarEq, TokenKind::Star),
            b'/' => two!(b'=', TokenKind::SlashEq, TokenKind::Slash),
            b'%' => two!(b'=', TokenKind::PercentEq, TokenKind::Percent),
            b'&' => two!(b'&', TokenKind::AmpAmp, TokenKind::Amp),
            b'|' => two!(b'|', TokenKind::PipePipe, TokenKind::Pipe),
            b'^' => TokenKind::Caret,
            b'~' => TokenKind::Tilde,
            b'!' => two!(b'=', TokenKind::BangEq, TokenKind::Bang),
            b'=' => two!(b'=', TokenKind::EqEq, TokenKind::Eq),
            b'<' => two!(b'=', TokenKind::LtEq, TokenKind::Lt),
            b'>' => two!(b'=', TokenKind::GtEq, TokenKind::Gt),
            other => {
                self.errors.push(SpannedError::lexical(
                    format!("invalid character {:?}", other as char),
                    linxc_base::Span::new(start, start + 1),
                ));
                TokenKind::Identifier
            }
        };
        Token::new(kind, start, self.pos)
    }
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c >= 0x80
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c >= 0x80
}

pub fn tokenize(src: &str) -> (Vec<Token>, Vec<SpannedError>) {
    Lexer::new(src).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_simple_punctuation() {
        assert_eq!(
            kinds("(){};,"),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Semicolon,
                TokenKind::Comma,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_multi_char_operators() {
        assert_eq!(
            kinds("== != <= >= && || -> ::"),
            vec![
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::AmpAmp,
                TokenKind::PipePipe,
                TokenKind::Arrow,
                TokenKind::ColonColon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keyword_vs_identifier() {
        let (toks, _) = tokenize("i32 foo struct");
        assert_eq!(
            toks[0].kind,
            TokenKind::Keyword(Keyword::Primitive(crate::token::PrimitiveKeyword::I32))
        );
        assert_eq!(toks[1].kind, TokenKind::Identifier);
        assert_eq!(toks[2].kind, TokenKind::Keyword(Keyword::Struct));
    }

    #[test]
    fn preproc_keyword_only_after_hash_at_line_start() {
        let (toks, _) = tokenize("#include <stdio.h>\ninclude_thing();");
        assert_eq!(toks[0].kind, TokenKind::Hash);
        assert_eq!(toks[1].kind, TokenKind::PreprocWord(PreprocKeyword::Include));
        assert_eq!(toks[2].kind, TokenKind::MacroString);
        // After the newline, "include_thing" is a plain identifier, not a directive.
        let after_newline = toks.iter().find(|t| t.kind == TokenKind::Identifier).unwrap();
        assert_eq!(after_newline.kind, TokenKind::Identifier);
    }

    #[test]
    fn angle_bracket_outside_include_is_comparison() {
        let (toks, _) = tokenize("a < b > c");
        assert_eq!(toks[1].kind, TokenKind::Lt);
        assert_eq!(toks[3].kind, TokenKind::Gt);
    }

    #[test]
    fn line_continuation_is_silently_consumed_mid_identifier() {
        let (toks, errs) = tokenize("fo\\\no");
        assert!(errs.is_empty());
        assert_eq!(toks[0].kind, TokenKind::Identifier);
        assert_eq!(toks[0].start, 0);
        assert_eq!(toks[0].end, 5);
    }

    #[test]
    fn numeric_literals() {
        assert_eq!(kinds("42")[0], TokenKind::IntLiteral);
        assert_eq!(kinds("0x1F")[0], TokenKind::IntLiteral);
        assert_eq!(kinds("0b101")[0], TokenKind::IntLiteral);
        assert_eq!(kinds("017")[0], TokenKind::IntLiteral);
        assert_eq!(kinds("3.14")[0], TokenKind::FloatLiteral);
        assert_eq!(kinds("1e10")[0], TokenKind::FloatLiteral);
        assert_eq!(kinds("1.5f")[0], TokenKind::FloatLiteral);
    }

    #[test]
    fn string_and_char_literals() {
        assert_eq!(kinds("\"hi\"")[0], TokenKind::StringLiteral);
        assert_eq!(kinds("'a'")[0], TokenKind::CharLiteral);
        assert_eq!(kinds("'\\n'")[0], TokenKind::CharLiteral);
    }

    #[test]
    fn unterminated_string_reports_lexical_error() {
        let (_, errs) = tokenize("\"unterminated");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ErrorKind::Lexical);
    }

    #[test]
    fn comments_are_tokenized_as_trivia() {
        let (toks, _) = tokenize("// line\n/* block */x");
        assert_eq!(toks[0].kind, TokenKind::LineComment);
        assert_eq!(toks[1].kind, TokenKind::Newline);
        assert_eq!(toks[2].kind, TokenKind::BlockComment);
        assert_eq!(toks[3].kind, TokenKind::Identifier);
    }

    #[test]
    fn last_token_is_always_eof() {
        for src in ["", "   ", "foo", "#include <a.h>\n"] {
            let (toks, _) = tokenize(src);
            assert_eq!(toks.last().unwrap().kind, TokenKind::Eof);
        }
    }

    #[test]
    fn lex_round_trip_spans_cover_every_byte() {
        let src = "i32 x = 1 + 2; // comment\n";
        let (toks, _) = tokenize(src);
        let mut cursor = 0usize;
        for t in &toks {
            if t.kind == TokenKind::Eof {
                continue;
            }
            assert!(t.start >= cursor || src[cursor..t.start].trim().is_empty());
            cursor = t.end;
        }
        assert_eq!(cursor, src.len());
    }

    #[test]
    fn no_token_has_end_before_start() {
        let src = "i32 main() { return 0; }";
        let (toks, _) = tokenize(src);
        for t in toks {
            assert!(t.end >= t.start);
        }
    }
}
