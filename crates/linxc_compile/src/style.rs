//! ANSI terminal styling for diagnostic output.
//!
//! Thin wrappers around the raw escape codes; every helper resets style
//! at the end of the string so callers can freely nest plain text around
//! the result.

pub struct Style;

impl Style {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";
    pub const RED: &'static str = "\x1b[31m";
    pub const YELLOW: &'static str = "\x1b[33m";
    pub const CYAN: &'static str = "\x1b[36m";

    pub fn red(s: &str) -> String {
        format!("{}{}{}", Self::RED, s, Self::RESET)
    }

    pub fn yellow(s: &str) -> String {
        format!("{}{}{}", Self::YELLOW, s, Self::RESET)
    }

    pub fn cyan(s: &str) -> String {
        format!("{}{}{}", Self::CYAN, s, Self::RESET)
    }

    pub fn dim(s: &str) -> String {
        format!("{}{}{}", Self::DIM, s, Self::RESET)
    }

    pub fn bold_red(s: &str) -> String {
        format!("{}{}{}{}", Self::BOLD, Self::RED, s, Self::RESET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn red_wraps_and_resets() {
        let result = Style::red("error");
        assert!(result.starts_with(Style::RED));
        assert!(result.ends_with(Style::RESET));
        assert!(result.contains("error"));
    }

    #[test]
    fn bold_red_combines_both_codes() {
        let result = Style::bold_red("fatal");
        assert!(result.contains(Style::BOLD));
        assert!(result.contains(Style::RED));
    }
}
