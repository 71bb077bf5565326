//! swiftflight - A fast, opinionated formatter for Swift-style sources
//!
//! This library provides the core formatting functionality for the
//! swiftflight CLI: a two-phase, width-aware pretty-printing engine fed by a
//! declaration parser that preserves comments, blank lines, and regions it
//! does not model.

pub mod ast;
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod parser;

pub use config::FormatConfig;
pub use error::{Error, Result};
pub use formatter::format_source;
pub use formatter::rules::Diagnostic;

/// Format source text with the default configuration.
pub fn format(input: &str) -> Result<String> {
    format_source(input, &FormatConfig::default())
}

/// Format source text with an explicit configuration.
pub fn format_with_config(input: &str, config: &FormatConfig) -> Result<String> {
    format_source(input, config)
}

/// Check whether source text is already formatted.
pub fn check(input: &str) -> Result<bool> {
    let formatted = format(input)?;
    Ok(formatted == input)
}

/// Check against an explicit configuration.
pub fn check_with_config(input: &str, config: &FormatConfig) -> Result<bool> {
    let formatted = format_source(input, config)?;
    Ok(formatted == input)
}

/// Run the lint rules and return their findings without formatting.
pub fn lint(input: &str) -> Result<Vec<Diagnostic>> {
    let file = parser::parse(input)?;
    let (_, diagnostics) = formatter::rules::apply_rules(file, &formatter::rules::default_rules());
    Ok(diagnostics)
}
