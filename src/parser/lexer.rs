//! Tokenization
//!
//! Breaks source text into [`Leaf`] tokens, attaching newline runs and
//! comments as trivia. A comment that begins on the same line as the token
//! before it becomes that token's trailing trivia; everything else collects
//! on the leading edge of the next token. Consecutive `///` lines join into
//! a single doc-comment trivia piece.

use winnow::combinator::alt;
use winnow::error::{ContextError, ErrMode};
use winnow::token::take_while;
use winnow::{ModalResult, Parser};

use crate::ast::{Leaf, LeafKind, Position, TriviaPiece};
use crate::error::{Error, Result};

/// Tokenize a whole source file. The final leaf is always `LeafKind::Eof`
/// and carries any trivia after the last real token.
pub fn tokenize(source: &str) -> Result<Vec<Leaf>> {
    let mut lexer = Lexer {
        source,
        offset: 0,
        line: 1,
        column: 1,
        pending_newlines: 0,
        leading: Vec::new(),
        leaves: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.leaves)
}

struct Lexer<'s> {
    source: &'s str,
    offset: usize,
    line: usize,
    column: usize,
    pending_newlines: usize,
    leading: Vec<TriviaPiece>,
    leaves: Vec<Leaf>,
}

impl<'s> Lexer<'s> {
    fn run(&mut self) -> Result<()> {
        loop {
            self.skip_blank_and_comments()?;
            if self.rest().is_empty() {
                break;
            }
            self.lex_token()?;
        }
        self.flush_newlines();
        let eof = Leaf {
            id: self.leaves.len() as u32,
            kind: LeafKind::Eof,
            text: String::new(),
            span: (self.offset, self.offset),
            pos: Position {
                line: self.line,
                column: self.column,
            },
            leading: std::mem::take(&mut self.leading),
            trailing: Vec::new(),
        };
        self.leaves.push(eof);
        Ok(())
    }

    fn rest(&self) -> &'s str {
        &self.source[self.offset..]
    }

    fn advance(&mut self, len: usize) {
        let consumed = &self.source[self.offset..self.offset + len];
        for ch in consumed.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset += len;
    }

    fn flush_newlines(&mut self) {
        if self.pending_newlines > 0 {
            self.leading
                .push(TriviaPiece::Newlines(self.pending_newlines));
            self.pending_newlines = 0;
        }
    }

    /// Consume whitespace and comments up to the next token.
    fn skip_blank_and_comments(&mut self) -> Result<()> {
        loop {
            let rest = self.rest();
            let Some(ch) = rest.chars().next() else {
                return Ok(());
            };
            match ch {
                ' ' | '\t' | '\r' => self.advance(1),
                '\n' => {
                    self.pending_newlines += 1;
                    self.advance(1);
                }
                '/' if rest.starts_with("//") => {
                    let piece = self.lex_line_comment();
                    self.place_comment(piece);
                }
                '/' if rest.starts_with("/*") => {
                    let piece = self.lex_block_comment()?;
                    self.place_comment(piece);
                }
                _ => return Ok(()),
            }
        }
    }

    fn lex_line_comment(&mut self) -> TriviaPiece {
        let rest = self.rest();
        let end = rest.find('\n').unwrap_or(rest.len());
        let text = rest[..end].trim_end().to_string();
        self.advance(end);
        if text.starts_with("///") {
            TriviaPiece::DocLine(text)
        } else {
            TriviaPiece::Line(text)
        }
    }

    fn lex_block_comment(&mut self) -> Result<TriviaPiece> {
        let rest = self.rest();
        let doc = rest.starts_with("/**") && !rest.starts_with("/**/");
        // Block comments nest.
        let mut depth = 0usize;
        let mut end = None;
        let bytes = rest.as_bytes();
        let mut i = 0;
        while i + 1 < bytes.len() {
            if &bytes[i..i + 2] == b"/*" {
                depth += 1;
                i += 2;
            } else if &bytes[i..i + 2] == b"*/" {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    end = Some(i);
                    break;
                }
            } else {
                i += 1;
            }
        }
        let Some(end) = end else {
            return Err(Error::ParseError {
                message: crate::error::format_parse_error(
                    self.source,
                    self.offset,
                    "unterminated block comment",
                ),
                span: Some((self.offset, self.source.len())),
            });
        };
        let text = rest[..end].to_string();
        self.advance(end);
        Ok(if doc {
            TriviaPiece::DocBlock(text)
        } else {
            TriviaPiece::Block(text)
        })
    }

    /// Decide where a just-lexed comment belongs.
    fn place_comment(&mut self, piece: TriviaPiece) {
        // Same line as the previous token: it is that token's end-of-line
        // comment.
        if self.pending_newlines == 0 && self.leading.is_empty() {
            if let Some(prev) = self.leaves.last_mut() {
                prev.trailing.push(piece);
                return;
            }
        }
        // A `///` line directly under another joins the same doc comment.
        if self.pending_newlines == 1 {
            if let (TriviaPiece::DocLine(text), Some(TriviaPiece::DocLine(prev))) =
                (&piece, self.leading.last_mut())
            {
                prev.push('\n');
                prev.push_str(text);
                self.pending_newlines = 0;
                return;
            }
        }
        self.flush_newlines();
        self.leading.push(piece);
    }

    fn lex_token(&mut self) -> Result<()> {
        let start = self.offset;
        let pos = Position {
            line: self.line,
            column: self.column,
        };
        let mut input = self.rest();
        let before = input.len();
        let (kind, text) = scan_token(&mut input).map_err(|_| Error::ParseError {
            message: crate::error::format_parse_error(
                self.source,
                self.offset,
                &format!(
                    "unexpected character '{}'",
                    self.rest().chars().next().unwrap_or('\0')
                ),
            ),
            span: Some((self.offset, self.offset + 1)),
        })?;
        let len = before - input.len();
        self.flush_newlines();
        let leaf = Leaf {
            id: self.leaves.len() as u32,
            kind,
            text,
            span: (start, start + len),
            pos,
            leading: std::mem::take(&mut self.leading),
            trailing: Vec::new(),
        };
        self.advance(len);
        self.leaves.push(leaf);
        Ok(())
    }
}

fn scan_token(input: &mut &str) -> ModalResult<(LeafKind, String)> {
    alt((
        scan_directive,
        scan_word,
        scan_backtick_word,
        scan_number,
        scan_string,
        scan_operator,
        scan_punct,
    ))
    .parse_next(input)
}

fn scan_word(input: &mut &str) -> ModalResult<(LeafKind, String)> {
    let first = input.chars().next();
    if !matches!(first, Some(c) if c.is_alphabetic() || c == '_') {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    let word =
        take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)?;
    Ok((LeafKind::Word, word.to_string()))
}

fn scan_backtick_word(input: &mut &str) -> ModalResult<(LeafKind, String)> {
    let _ = "`".parse_next(input)?;
    let name = take_while(1.., |c: char| c != '`' && c != '\n').parse_next(input)?;
    let _ = "`".parse_next(input)?;
    Ok((LeafKind::Word, format!("`{}`", name)))
}

fn scan_directive(input: &mut &str) -> ModalResult<(LeafKind, String)> {
    if !input.starts_with('#') {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    let checkpoint = *input;
    let _ = "#".parse_next(input)?;
    let word = take_while(0.., |c: char| c.is_alphanumeric()).parse_next(input)?;
    match word {
        "if" | "elseif" | "else" | "endif" => Ok((LeafKind::Directive, format!("#{}", word))),
        _ => {
            *input = checkpoint;
            Err(ErrMode::Backtrack(ContextError::new()))
        }
    }
}

fn scan_number(input: &mut &str) -> ModalResult<(LeafKind, String)> {
    if !matches!(input.chars().next(), Some(c) if c.is_ascii_digit()) {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    let start = *input;
    let _ = take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)?;
    // A fractional part only when a digit follows the dot, so member access
    // on a literal still lexes as punctuation.
    if input.starts_with('.')
        && input
            .chars()
            .nth(1)
            .is_some_and(|c| c.is_ascii_digit())
    {
        let _ = ".".parse_next(input)?;
        let _ =
            take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)?;
    }
    let text = &start[..start.len() - input.len()];
    Ok((LeafKind::Number, text.to_string()))
}

fn scan_string(input: &mut &str) -> ModalResult<(LeafKind, String)> {
    if !input.starts_with('"') {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    let mut text = String::from('"');
    let mut chars = input[1..].chars();
    loop {
        let Some(c) = chars.next() else {
            return Err(ErrMode::Cut(ContextError::new()));
        };
        match c {
            '"' => {
                text.push('"');
                break;
            }
            '\\' => {
                text.push('\\');
                let Some(escaped) = chars.next() else {
                    return Err(ErrMode::Cut(ContextError::new()));
                };
                text.push(escaped);
            }
            '\n' => return Err(ErrMode::Cut(ContextError::new())),
            _ => text.push(c),
        }
    }
    *input = &input[text.len()..];
    Ok((LeafKind::Str, text))
}

const MULTI_CHAR_OPS: &[&str] = &[
    "...", "..<", "->", "==", "!=", "<=", ">=", "&&", "||", "+=", "-=", "*=", "/=", "%=", "??",
];

fn scan_operator(input: &mut &str) -> ModalResult<(LeafKind, String)> {
    for op in MULTI_CHAR_OPS {
        if input.starts_with(op) {
            *input = &input[op.len()..];
            return Ok((LeafKind::Op, (*op).to_string()));
        }
    }
    let first = input.chars().next();
    if matches!(
        first,
        Some('+' | '-' | '*' | '/' | '%' | '=' | '<' | '>' | '!' | '&' | '|' | '^' | '~' | '?')
    ) {
        let op = first.unwrap();
        *input = &input[op.len_utf8()..];
        return Ok((LeafKind::Op, op.to_string()));
    }
    Err(ErrMode::Backtrack(ContextError::new()))
}

fn scan_punct(input: &mut &str) -> ModalResult<(LeafKind, String)> {
    let first = input.chars().next();
    if matches!(
        first,
        Some('(' | ')' | '{' | '}' | '[' | ']' | ',' | ':' | ';' | '.' | '@')
    ) {
        let ch = first.unwrap();
        *input = &input[ch.len_utf8()..];
        return Ok((LeafKind::Punct, ch.to_string()));
    }
    Err(ErrMode::Backtrack(ContextError::new()))
}
