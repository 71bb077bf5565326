//! Statement and token-run parsing
//!
//! Statements are flat runs of leaves with nested delimited groups rather
//! than a full expression grammar; the formatter only needs to know where
//! lists begin and end. Lines that do not look like anything the grammar
//! models are swallowed as verbatim regions and reproduced unchanged.

use crate::ast::*;
use crate::error::Result;
use crate::parser::decl::Parser;

/// What a `{` means while scanning a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BraceMode {
    /// The brace ends the run (a body follows).
    Terminate,
    /// The brace starts a trailing closure; capture it raw into the run.
    Tail,
}

/// Termination rules for one run-parsing context.
#[derive(Debug, Clone, Copy)]
pub struct RunCtx {
    pub stop_comma: bool,
    pub stop_colon: bool,
    pub stop_where: bool,
    /// Treat `<...>` as a nested group and a bare `>` as a terminator.
    pub angles: bool,
    pub braces: BraceMode,
    /// Cross statement-ending newlines.
    pub multiline: bool,
}

impl RunCtx {
    /// An expression statement.
    pub fn stmt() -> Self {
        RunCtx {
            stop_comma: false,
            stop_colon: false,
            stop_where: false,
            angles: false,
            braces: BraceMode::Tail,
            multiline: false,
        }
    }

    /// A type annotation or return type.
    pub fn type_run() -> Self {
        RunCtx {
            stop_comma: true,
            stop_colon: false,
            stop_where: true,
            angles: true,
            braces: BraceMode::Terminate,
            multiline: false,
        }
    }

    /// The name of a type declaration, generics included.
    pub fn type_name() -> Self {
        RunCtx {
            stop_colon: true,
            ..Self::type_run()
        }
    }

    /// One entry of an inheritance or `where` clause.
    pub fn clause_entry() -> Self {
        RunCtx {
            multiline: true,
            ..Self::type_run()
        }
    }

    /// One element of a delimited list.
    pub fn item() -> Self {
        RunCtx {
            stop_comma: true,
            stop_colon: false,
            stop_where: false,
            angles: true,
            braces: BraceMode::Tail,
            multiline: true,
        }
    }

    /// The value of an `=` initializer.
    pub fn value() -> Self {
        RunCtx::stmt()
    }

    /// An `if` condition or `catch` pattern; ends at the body brace.
    pub fn condition() -> Self {
        RunCtx {
            braces: BraceMode::Terminate,
            multiline: true,
            ..Self::stmt()
        }
    }

    /// A `#if` compilation condition; ends at the line break.
    pub fn directive_condition() -> Self {
        RunCtx {
            braces: BraceMode::Terminate,
            ..Self::stmt()
        }
    }
}

/// A leaf that may begin a line the parser understands.
fn starts_known_item(leaf: &Leaf) -> bool {
    match leaf.kind {
        LeafKind::Word | LeafKind::Number | LeafKind::Str | LeafKind::Directive => true,
        LeafKind::Punct => matches!(leaf.text.as_str(), "@" | "(" | "["),
        _ => false,
    }
}

/// A leaf that continues the previous line's expression.
fn continues_line(leaf: &Leaf) -> bool {
    leaf.kind == LeafKind::Op || leaf.is_punct('.')
}

fn ends_open(pieces: &[Piece]) -> bool {
    match pieces.last() {
        Some(Piece::Leaf(leaf)) => continues_line(leaf) || leaf.is_punct(','),
        _ => false,
    }
}

impl<'a> Parser<'a> {
    /// Parse a flat token run under the given termination rules.
    pub fn parse_run(&mut self, ctx: RunCtx) -> Result<Run> {
        let mut pieces: Vec<Piece> = Vec::new();
        loop {
            let current = self.current();
            if current.kind == LeafKind::Eof || current.kind == LeafKind::Directive {
                break;
            }
            if !ctx.multiline
                && !pieces.is_empty()
                && current.newlines_before() > 0
                && !continues_line(current)
                && !ends_open(&pieces)
            {
                break;
            }
            if current.is_punct(')') || current.is_punct(']') || current.is_punct('}') {
                break;
            }
            if current.is_punct(';') {
                let semi = self.advance();
                attach_comment_trivia(&mut pieces, semi);
                break;
            }
            if ctx.stop_comma && current.is_punct(',') {
                break;
            }
            if ctx.stop_colon && current.is_punct(':') {
                break;
            }
            if ctx.stop_where && current.is_word("where") {
                break;
            }
            if ctx.angles && current.kind == LeafKind::Op && current.text == ">" {
                break;
            }
            if current.is_punct('{') {
                match ctx.braces {
                    BraceMode::Terminate => break,
                    BraceMode::Tail => {
                        let tail = self.parse_brace_tail()?;
                        pieces.push(Piece::Leaf(tail));
                        continue;
                    }
                }
            }
            if current.is_punct('(') {
                pieces.push(Piece::Group(self.parse_delimited('(', ')')?));
                continue;
            }
            if current.is_punct('[') {
                pieces.push(Piece::Group(self.parse_delimited('[', ']')?));
                continue;
            }
            if ctx.angles && current.kind == LeafKind::Op && current.text == "<" {
                let save = self.position();
                match self.parse_delimited('<', '>') {
                    Ok(group) => {
                        pieces.push(Piece::Group(group));
                        continue;
                    }
                    Err(_) => self.restore(save),
                }
            }
            pieces.push(Piece::Leaf(self.advance()));
        }
        Ok(Run { pieces })
    }

    /// Parse a comma-separated `( ... )`, `[ ... ]`, or `< ... >`.
    pub fn parse_delimited(&mut self, open_ch: char, close_ch: char) -> Result<Delimited> {
        let open = if open_ch == '<' {
            self.expect_op("<")?
        } else {
            self.expect_punct(open_ch)?
        };
        let mut items = Vec::new();
        loop {
            if self.delim_closes(close_ch) {
                break;
            }
            if self.is_eof() {
                return Err(self.error(&format!("expected '{}'", close_ch)));
            }
            let content = self.parse_run(RunCtx::item())?;
            let comma = if self.current().is_punct(',') {
                Some(self.advance())
            } else {
                None
            };
            if content.pieces.is_empty() && comma.is_none() {
                return Err(self.error("unexpected token in a delimited list"));
            }
            items.push(DelimItem { content, comma });
        }
        let close = self.advance();
        Ok(Delimited { open, items, close })
    }

    fn delim_closes(&self, close_ch: char) -> bool {
        let current = self.current();
        if close_ch == '>' {
            current.kind == LeafKind::Op && current.text == ">"
        } else {
            current.is_punct(close_ch)
        }
    }

    fn expect_op(&mut self, text: &str) -> Result<Leaf> {
        let current = self.current();
        if current.kind == LeafKind::Op && current.text == text {
            Ok(self.advance())
        } else {
            Err(self.error(&format!("expected '{}'", text)))
        }
    }

    /// Capture a balanced `{ ... }` trailing a run as raw text.
    fn parse_brace_tail(&mut self) -> Result<Leaf> {
        let first = self.current().clone();
        let mut depth = 0usize;
        let mut last = first.clone();
        loop {
            let current = self.current();
            if current.kind == LeafKind::Eof {
                return Err(self.error("unbalanced '{' in expression"));
            }
            if current.is_punct('{') {
                depth += 1;
            } else if current.is_punct('}') {
                depth -= 1;
                last = self.advance();
                if depth == 0 {
                    break;
                }
                continue;
            }
            last = self.advance();
        }
        Ok(Leaf {
            id: first.id,
            kind: LeafKind::Verbatim,
            text: self.source()[first.span.0..last.span.1].to_string(),
            span: (first.span.0, last.span.1),
            pos: first.pos,
            leading: first.leading,
            trailing: last.trailing,
        })
    }

    /// Statement dispatch, falling back to a verbatim region.
    pub fn parse_statement_or_verbatim(&mut self) -> Result<Decl> {
        let current = self.current();
        if current.is_word("if") {
            return self.parse_if_stmt().map(|s| Decl::Stmt(Stmt::If(s)));
        }
        if current.is_word("do") && self.peek().is_punct('{') {
            return self.parse_do_stmt().map(|s| Decl::Stmt(Stmt::Do(s)));
        }
        if starts_known_item(current) && current.kind != LeafKind::Directive {
            let run = self.parse_run(RunCtx::stmt())?;
            if !run.pieces.is_empty() {
                return Ok(Decl::Stmt(Stmt::Expr(run)));
            }
        }
        self.parse_verbatim().map(Decl::Verbatim)
    }

    fn parse_if_stmt(&mut self) -> Result<IfStmt> {
        let keyword = self.advance();
        let condition = self.parse_run(RunCtx::condition())?;
        if condition.pieces.is_empty() {
            return Err(self.error("expected a condition"));
        }
        let body = self.parse_block()?;
        let (else_kw, else_body) = if self.current().is_word("else") {
            let kw = self.advance();
            if self.current().is_word("if") {
                (Some(kw), Some(ElseBody::If(Box::new(self.parse_if_stmt()?))))
            } else {
                (Some(kw), Some(ElseBody::Block(self.parse_block()?)))
            }
        } else {
            (None, None)
        };
        Ok(IfStmt {
            keyword,
            condition,
            body,
            else_kw,
            else_body,
        })
    }

    fn parse_do_stmt(&mut self) -> Result<DoStmt> {
        let keyword = self.advance();
        let body = self.parse_block()?;
        let mut catches = Vec::new();
        while self.current().is_word("catch") {
            let kw = self.advance();
            let pattern = {
                let run = self.parse_run(RunCtx::condition())?;
                if run.pieces.is_empty() {
                    None
                } else {
                    Some(run)
                }
            };
            let body = self.parse_block()?;
            catches.push(CatchClause {
                keyword: kw,
                pattern,
                body,
            });
        }
        Ok(DoStmt {
            keyword,
            body,
            catches,
        })
    }

    /// Swallow source the grammar does not model: the current line, plus any
    /// directly following lines that are equally unrecognizable, plus
    /// whatever it takes to re-balance brackets opened inside.
    pub fn parse_verbatim(&mut self) -> Result<Leaf> {
        let first = self.current().clone();
        if first.is_punct('}') || first.is_punct(')') || first.is_punct(']') {
            return Err(self.error("unexpected closing delimiter"));
        }
        let mut depth = 0i32;
        let mut last: Option<Leaf> = None;
        loop {
            let current = self.current();
            if current.kind == LeafKind::Eof {
                break;
            }
            if depth == 0 && last.is_some() {
                if current.is_punct('}') || current.is_punct(')') || current.is_punct(']') {
                    break;
                }
                if current.newlines_before() > 0 && starts_known_item(current) {
                    break;
                }
            }
            if current.is_punct('{') || current.is_punct('(') || current.is_punct('[') {
                depth += 1;
            } else if current.is_punct('}') || current.is_punct(')') || current.is_punct(']') {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            last = Some(self.advance());
        }
        let Some(last) = last else {
            return Err(self.error("unexpected token"));
        };
        // Slice from the start of the line so the region keeps its original
        // indentation for relative re-indent.
        let raw_start = if first.newlines_before() > 0 || first.id == 0 {
            self.source()[..first.span.0]
                .rfind('\n')
                .map_or(0, |i| i + 1)
        } else {
            first.span.0
        };
        Ok(Leaf {
            id: first.id,
            kind: LeafKind::Verbatim,
            text: self.source()[raw_start..last.span.1].to_string(),
            span: (raw_start, last.span.1),
            pos: first.pos,
            leading: first.leading,
            trailing: last.trailing,
        })
    }
}

/// Move a dropped semicolon's comments onto the end of the run.
fn attach_comment_trivia(pieces: &mut [Piece], semi: Leaf) {
    let mut trivia: Vec<TriviaPiece> = semi
        .leading
        .into_iter()
        .filter(|t| !matches!(t, TriviaPiece::Newlines(_)))
        .collect();
    trivia.extend(semi.trailing);
    if trivia.is_empty() {
        return;
    }
    if let Some(last) = pieces.last_mut() {
        let leaf = match last {
            Piece::Leaf(leaf) => leaf,
            Piece::Group(group) => &mut group.close,
        };
        leaf.trailing.extend(trivia);
    }
}
