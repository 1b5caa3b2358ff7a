//! Tokenizer, macro expander, namespace/type system and parser for the
//! Linxc dialect (`spec.md` §2–§4).
//!
//! ```text
//! source text
//!      │  Lexer::tokenize              (token.rs, lexer.rs)
//!      ▼
//! Vec<Token>
//!      │  MacroExpander::expand         (macros.rs)
//!      ▼
//! Vec<ExpandedToken>
//!      │  StmtParser::parse_file        (parser/stmt_parser.rs)
//!      │    └─ ExprParser::parse_*      (parser/expr_parser.rs)
//!      │       resolving names against  (namespace.rs, types.rs)
//!      ▼
//! Vec<StmtId>  (nodes live in a `World`)
//! ```
//!
//! Everything downstream of this crate — driver, filesystem I/O, the
//! C emitter's textual layout — is out of scope here per `spec.md` §1
//! and lives in `linxc-compile` instead.

pub mod ast;
pub mod lexer;
pub mod macros;
pub mod namespace;
pub mod parser;
pub mod token;
pub mod types;

pub use ast::{Expr, ExprId, ExprKind, Stmt, StmtId, StmtKind};
pub use namespace::{LookupScope, Namespace, PhoneyNamespace, Resolved, World};
pub use parser::{ExprParser, StmtParser};
pub use token::{ExpandedToken, Keyword, PreprocKeyword, PrimitiveKeyword, Token, TokenKind};
pub use types::{BinOp, FuncId, NamespaceId, OperatorImpl, PrimitiveKind, Type, TypeId, TypeReference, VarId, Variable};

/// Runs the lexer, macro expander, and statement parser over one
/// file's source text, starting name resolution in `namespace`.
/// Returns the top-level statements, the macros this file defined, and
/// every diagnostic collected across all three stages.
pub fn parse_source(
    world: &mut World,
    src: &str,
    namespace: NamespaceId,
) -> (Vec<StmtId>, Vec<macros::Macro>, Vec<linxc_base::SpannedError>) {
    let (tokens, mut errors) = lexer::tokenize(src);
    let (expanded, file_macros, macro_errors) = macros::expand(src, &tokens, &mut world.interner);
    errors.extend(macro_errors);

    let mut parser = StmtParser::new(world, &expanded, namespace);
    let stmts = parser.parse_file();
    errors.extend(parser.errors);
    (stmts, file_macros, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_world_style_function_parses_without_errors() {
        let mut world = World::new();
        let ns = world.root;
        let (stmts, _macros, errors) = parse_source(
            &mut world,
            "i32 main() { return 0; }",
            ns,
        );
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn struct_member_and_method_resolve_through_one_pipeline_pass() {
        let mut world = World::new();
        let ns = world.root;
        let (stmts, _macros, errors) = parse_source(
            &mut world,
            "struct Counter { i32 value; i32 get() { return value; } };",
            ns,
        );
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        assert_eq!(stmts.len(), 1);
    }
}
