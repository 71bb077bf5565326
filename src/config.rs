//! Formatter configuration
//!
//! The options the core engine recognizes. Loading these from a
//! configuration file is a front-end concern and lives outside this crate;
//! the CLI maps its flags onto this struct directly.

use crate::formatter::indent::{Indent, IndentKind};

/// Configuration for a single formatting run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Target column limit. Lines are kept at or under this width unless a
    /// single unbreakable token is already longer.
    pub max_line_length: usize,

    /// The indentation unit added per level.
    pub indent: Indent,

    /// Column width of a tab when measuring lengths.
    pub tab_width: usize,

    /// Preserve single blank lines between declarations (capped at one).
    pub respects_existing_line_breaks: bool,

    /// Force `else` and `catch` onto a new line.
    pub line_break_before_control_flow_keywords: bool,

    /// Force every argument of a wrapped call onto its own line.
    pub line_break_before_each_argument: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            max_line_length: 100,
            indent: Indent {
                kind: IndentKind::Spaces,
                count: 2,
            },
            tab_width: 8,
            respects_existing_line_breaks: true,
            line_break_before_control_flow_keywords: false,
            line_break_before_each_argument: false,
        }
    }
}

impl FormatConfig {
    /// Column width of one indentation level.
    pub fn indent_columns(&self) -> usize {
        self.indent.columns(self.tab_width)
    }
}
