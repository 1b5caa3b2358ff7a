//! Expression and statement parsers (`spec.md` §4.4, §4.6).

pub mod expr_parser;
pub mod stmt_parser;

pub use expr_parser::ExprParser;
pub use stmt_parser::StmtParser;
