//! Length scanner
//!
//! First pass of the two-phase engine: computes the effective length of
//! every token so the printer can make fit decisions without lookahead.
//! A `Break` token's length covers its own size plus the content up to the
//! next break or group close; an `Open` token's length is the total width
//! of its group's contents.

use crate::config::FormatConfig;
use crate::error::{Error, Result};
use crate::formatter::token::{text_width, widest_line, Token};

/// Compute the parallel length array for a token stream.
///
/// Returns `Error::MalformedTokenStream` when `open`/`close` tokens are
/// unbalanced; that is a builder bug, not an input condition.
pub fn scan(tokens: &[Token], config: &FormatConfig) -> Result<Vec<isize>> {
    let max_width = config.max_line_length as isize;
    let mut lengths: Vec<isize> = Vec::with_capacity(tokens.len());
    let mut total: isize = 0;
    // Indices of open and break tokens whose lengths are not yet final.
    let mut delim_stack: Vec<usize> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Syntax(text) => {
                let width = text_width(text) as isize;
                lengths.push(width);
                total += width;
            }
            Token::Open { .. } => {
                delim_stack.push(i);
                lengths.push(-total);
            }
            Token::Close => {
                let top = delim_stack.pop().ok_or_else(|| malformed(i, "close without open"))?;
                if matches!(tokens[top], Token::Break { .. }) {
                    lengths[top] += total;
                    let open = delim_stack
                        .pop()
                        .ok_or_else(|| malformed(i, "close without open"))?;
                    debug_assert!(matches!(tokens[open], Token::Open { .. }));
                    lengths[open] += total;
                } else {
                    debug_assert!(matches!(tokens[top], Token::Open { .. }));
                    lengths[top] += total;
                }
                lengths.push(0);
            }
            Token::Break { size, .. } => {
                if let Some(&top) = delim_stack.last() {
                    if matches!(tokens[top], Token::Break { .. }) {
                        lengths[top] += total;
                        delim_stack.pop();
                    }
                }
                delim_stack.push(i);
                lengths.push(-total);
                total += *size as isize;
            }
            Token::Newline { .. } => {
                if let Some(&top) = delim_stack.last() {
                    if matches!(tokens[top], Token::Break { .. }) {
                        lengths[top] += total;
                        delim_stack.pop();
                    }
                }
                lengths.push(max_width);
                total += max_width;
            }
            Token::Space(size) => {
                lengths.push(*size as isize);
                total += *size as isize;
            }
            Token::Reset => {
                if let Some(&top) = delim_stack.last() {
                    if matches!(tokens[top], Token::Break { .. }) {
                        lengths[top] += total;
                        delim_stack.pop();
                    }
                }
                lengths.push(0);
            }
            Token::Comment { text, .. } => {
                let width = widest_line(text) as isize;
                lengths.push(width);
                total += width;
            }
            Token::Verbatim(_) => {
                lengths.push(max_width);
                total += max_width;
            }
        }
    }

    // Any break still pending at the end of the stream spans to the end.
    while let Some(top) = delim_stack.pop() {
        if matches!(tokens[top], Token::Break { .. }) {
            lengths[top] += total;
        } else {
            return Err(malformed(top, "unclosed group"));
        }
    }

    Ok(lengths)
}

fn malformed(index: usize, what: &str) -> Error {
    Error::MalformedTokenStream {
        message: format!("{} at token {}", what, index),
    }
}
