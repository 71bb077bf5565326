//! Source parsing
//!
//! A recursive-descent parser over the lexer's leaf stream. The grammar
//! covers the declaration subset the formatter models; body lines it does
//! not recognize are captured as verbatim regions rather than rejected, so
//! unknown constructs survive formatting untouched.

pub mod decl;
pub mod lexer;
pub mod stmt;

use crate::ast::SourceFile;
use crate::error::Result;

pub use decl::Parser;

/// Parse source text into a [`SourceFile`].
pub fn parse(input: &str) -> Result<SourceFile> {
    let leaves = lexer::tokenize(input)?;
    let mut parser = Parser::new(&leaves, input);
    parser.parse_source_file()
}
