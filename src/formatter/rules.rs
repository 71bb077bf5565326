//! Lint and format rule passes
//!
//! Each rule is an independent pass over the parsed tree: it may rewrite
//! trivia or whitespace-level structure and reports diagnostics with source
//! positions. The pretty printer consumes whatever tree the last rule
//! returned. Rules never change code semantics.

use crate::ast::{SourceFile, TriviaPiece};

/// Severity of a reported finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A single finding tied to a source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(
            f,
            "{}:{}: {}: {}",
            self.line, self.column, severity, self.message
        )
    }
}

/// An independent whitespace-safe pass over the tree.
pub trait Rule {
    fn name(&self) -> &'static str;
    fn apply(&self, file: SourceFile) -> (SourceFile, Vec<Diagnostic>);
}

/// The rules every formatting and lint run applies.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![Box::new(CommentSpacing)]
}

/// Run rules in order, threading the tree through and collecting findings.
pub fn apply_rules(
    file: SourceFile,
    rules: &[Box<dyn Rule>],
) -> (SourceFile, Vec<Diagnostic>) {
    let mut file = file;
    let mut diagnostics = Vec::new();
    for rule in rules {
        let (rewritten, mut found) = rule.apply(file);
        file = rewritten;
        diagnostics.append(&mut found);
    }
    (file, diagnostics)
}

/// `//comment` reads badly; require a space after the comment introducer.
pub struct CommentSpacing;

impl Rule for CommentSpacing {
    fn name(&self) -> &'static str {
        "comment-spacing"
    }

    fn apply(&self, mut file: SourceFile) -> (SourceFile, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        file.for_each_leaf_mut(&mut |leaf| {
            let (line, column) = (leaf.pos.line, leaf.pos.column);
            for piece in leaf.leading.iter_mut().chain(leaf.trailing.iter_mut()) {
                let text = match piece {
                    TriviaPiece::Line(text) | TriviaPiece::DocLine(text) => text,
                    _ => continue,
                };
                if let Some(fixed) = respace_line_comment(text) {
                    diagnostics.push(Diagnostic {
                        severity: Severity::Warning,
                        message: format!("add a space after '{}'", slashes(text)),
                        line,
                        column,
                    });
                    *piece = match piece {
                        TriviaPiece::DocLine(_) => TriviaPiece::DocLine(fixed),
                        _ => TriviaPiece::Line(fixed),
                    };
                }
            }
        });
        (file, diagnostics)
    }
}

fn slashes(text: &str) -> &'static str {
    if text.starts_with("///") {
        "///"
    } else {
        "//"
    }
}

/// Rewrite `//x`-style lines to `// x`; `None` when already well formed.
fn respace_line_comment(text: &str) -> Option<String> {
    let mut changed = false;
    let fixed: Vec<String> = text
        .split('\n')
        .map(|line| {
            let slashes = if line.starts_with("///") { 3 } else { 2 };
            let rest = &line[slashes.min(line.len())..];
            if rest.is_empty() || rest.starts_with(' ') || rest.starts_with('/') {
                line.to_string()
            } else {
                changed = true;
                format!("{} {}", &line[..slashes], rest)
            }
        })
        .collect();
    if changed {
        Some(fixed.join("\n"))
    } else {
        None
    }
}
