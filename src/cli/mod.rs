//! CLI argument parsing and file discovery

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::FormatConfig;
use crate::formatter::indent::{Indent, IndentKind};

/// swiftflight - An opinionated formatter for Swift-style sources
#[derive(Parser, Debug)]
#[command(name = "swiftflight")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Target line length
    #[arg(long, global = true, default_value_t = 100)]
    pub line_length: usize,

    /// Columns per indentation level
    #[arg(long, global = true, default_value_t = 2)]
    pub indent_width: usize,

    /// Indent with tabs instead of spaces
    #[arg(long, global = true)]
    pub use_tabs: bool,

    /// Column width of a tab when measuring line length
    #[arg(long, global = true, default_value_t = 8)]
    pub tab_width: usize,

    /// Reflow everything, discarding blank lines between declarations
    #[arg(long, global = true)]
    pub ignore_existing_line_breaks: bool,

    /// Put `else` and `catch` on their own line
    #[arg(long, global = true)]
    pub line_break_before_control_flow_keywords: bool,

    /// Put every argument of a wrapped call on its own line
    #[arg(long, global = true)]
    pub line_break_before_each_argument: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Format source files
    Fmt {
        /// Write formatted output back to files
        #[arg(short, long)]
        write: bool,

        /// Files or directories to format (use - for stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Check whether files are formatted
    Check {
        /// Files or directories to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Run the lint rules and report findings
    Lint {
        /// Files or directories to lint
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

impl Cli {
    /// Build the engine configuration from the command line.
    pub fn config(&self) -> FormatConfig {
        FormatConfig {
            max_line_length: self.line_length,
            indent: if self.use_tabs {
                Indent {
                    kind: IndentKind::Tabs,
                    count: 1,
                }
            } else {
                Indent {
                    kind: IndentKind::Spaces,
                    count: self.indent_width,
                }
            },
            tab_width: self.tab_width,
            respects_existing_line_breaks: !self.ignore_existing_line_breaks,
            line_break_before_control_flow_keywords: self.line_break_before_control_flow_keywords,
            line_break_before_each_argument: self.line_break_before_each_argument,
        }
    }
}

/// Expand one CLI path argument into source files: a file is taken as-is, a
/// directory is walked recursively for `.swift` files, anything else is
/// tried as a glob pattern.
pub fn discover_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    if path.is_dir() {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "swift") {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
        return files;
    }

    if let Ok(paths) = glob::glob(path.to_str().unwrap_or("")) {
        return paths
            .filter_map(|p| p.ok())
            .filter(|p| p.is_file())
            .filter(|p| p.extension().is_some_and(|ext| ext == "swift"))
            .collect();
    }

    Vec::new()
}
