//! Error types for swiftflight

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for swiftflight operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for swiftflight
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Parse error: {message}")]
    #[diagnostic(code(swiftflight::parse_error))]
    ParseError {
        message: String,
        #[label("here")]
        span: Option<(usize, usize)>,
    },

    #[error("IO error: {0}")]
    #[diagnostic(code(swiftflight::io_error))]
    IoError(#[from] std::io::Error),

    /// An unbalanced or otherwise impossible token stream. This always
    /// indicates a bug in the token stream builder, never bad input.
    #[error("Malformed token stream: {message}")]
    #[diagnostic(code(swiftflight::malformed_token_stream))]
    MalformedTokenStream { message: String },
}

/// Format a parse error with a line/column context line
pub fn format_parse_error(source: &str, offset: usize, message: &str) -> String {
    let clamped = offset.min(source.len());
    let before = &source[..clamped];
    let line = before.matches('\n').count() + 1;
    let column = clamped - before.rfind('\n').map_or(0, |i| i + 1) + 1;
    format!("{} at line {}, column {}", message, line, column)
}
