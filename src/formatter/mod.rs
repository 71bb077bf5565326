//! Formatting pipeline
//!
//! Parse, run the whitespace-safe rule passes, lower the tree to formatting
//! tokens, scan token lengths, then print. The token, scanner, and printer
//! layers are public so the engine can be driven directly with hand-built
//! token streams.

pub mod builder;
pub mod indent;
pub mod printer;
pub mod rules;
pub mod scanner;
pub mod token;

use crate::config::FormatConfig;
use crate::error::Result;
use crate::parser;

use builder::TokenStreamBuilder;
use printer::Printer;
use token::Token;

/// Format source text under the given configuration.
pub fn format_source(input: &str, config: &FormatConfig) -> Result<String> {
    let file = parser::parse(input)?;
    let (file, _) = rules::apply_rules(file, &rules::default_rules());
    let tokens = TokenStreamBuilder::new(config).build(&file);
    let output = render(&tokens, config)?;
    Ok(normalize_trailing_newline(output))
}

/// Run the scan and print phases over a prepared token stream.
pub fn render(tokens: &[Token], config: &FormatConfig) -> Result<String> {
    let lengths = scanner::scan(tokens, config)?;
    Printer::new(config, tokens, &lengths).print()
}

/// Formatted files end with exactly one newline.
fn normalize_trailing_newline(mut output: String) -> String {
    while output.ends_with('\n') {
        output.pop();
    }
    if !output.is_empty() {
        output.push('\n');
    }
    output
}
