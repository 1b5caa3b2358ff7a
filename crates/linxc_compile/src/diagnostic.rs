//! Diagnostic formatting: turns the accumulated [`SpannedError`]s a
//! [`Session`](crate::session::Session) collects into the text a driver
//! prints to a terminal (`spec.md` §7 — errors are non-fatal and
//! reported in the order they were produced, never interrupting the
//! rest of the run).

use linxc_base::SpannedError;

use crate::style::Style;

/// One error's position translated from a byte offset into 1-based
/// line/column, for display next to its source file.
fn line_col(src: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for ch in src[..offset.min(src.len())].chars() {
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Renders one error as a colorized, single-paragraph diagnostic:
/// `<file>:<line>:<col>: [<kind>] <message>` followed by the offending
/// source line with a caret under the error's start column.
pub fn render(file_name: &str, src: &str, error: &SpannedError) -> String {
    let (line, col) = line_col(src, error.span.start);
    let mut out = format!(
        "{}:{}:{}: {} {}\n",
        file_name,
        line,
        col,
        Style::bold_red(&format!("[{}]", error.kind)),
        error.message
    );
    if let Some(source_line) = src.lines().nth(line - 1) {
        out.push_str(&format!("  {}\n", source_line));
        out.push_str(&format!("  {}{}\n", " ".repeat(col.saturating_sub(1)), Style::yellow("^")));
    }
    out
}

/// Renders every error a file accumulated, in the order they were
/// produced, with a trailing count.
pub fn render_all(file_name: &str, src: &str, errors: &[SpannedError]) -> String {
    let mut out = String::new();
    for error in errors {
        out.push_str(&render(file_name, src, error));
    }
    out.push_str(&format!(
        "{} {}\n",
        Style::dim(&errors.len().to_string()),
        Style::dim(if errors.len() == 1 { "error" } else { "errors" })
    ));
    out
}
