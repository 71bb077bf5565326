//! Width-aware printer
//!
//! Second pass of the two-phase engine. Consumes the token stream together
//! with the scanner's length array and emits text, committing to a line
//! break only when the enclosing group cannot fit in the remaining space.
//!
//! Line starts are deferred: a fired break records that the next printable
//! token must first write the current indentation. This keeps blank lines
//! free of trailing whitespace and lets a `close` between a newline and the
//! next token restore the parent indentation before the line renders.

use crate::config::FormatConfig;
use crate::error::{Error, Result};
use crate::formatter::indent::{Indent, IndentStack};
use crate::formatter::token::{text_width, BreakStyle, CommentKind, Token};

struct GroupFrame {
    style: BreakStyle,
    /// Absolute target column for breaks fired inside this group.
    offset: isize,
    /// One-way latch: once true in a consistent group, every break fires.
    broken: bool,
    /// Indent-stack depth at open; frames above it belong to this group.
    indent_mark: usize,
}

/// Printer state for one run over a scanned token stream.
pub struct Printer<'a> {
    config: &'a FormatConfig,
    tokens: &'a [Token],
    lengths: &'a [isize],
    output: String,
    remaining: isize,
    groups: Vec<GroupFrame>,
    indents: IndentStack,
    /// Size of an unfired break, deferred until the next printable token.
    pending_break: Option<usize>,
    /// Offset of a break that just fired; a group opened by the very next
    /// token folds it into its cumulative offset.
    fired_break_offset: isize,
    /// A line break has been emitted; indentation is written lazily.
    at_line_start: bool,
    /// The current line ends in a line comment; the next break must fire.
    after_line_comment: bool,
}

impl<'a> Printer<'a> {
    pub fn new(config: &'a FormatConfig, tokens: &'a [Token], lengths: &'a [isize]) -> Self {
        Printer {
            config,
            tokens,
            lengths,
            output: String::new(),
            remaining: config.max_line_length as isize,
            groups: Vec::new(),
            indents: IndentStack::new(),
            pending_break: None,
            fired_break_offset: 0,
            at_line_start: false,
            after_line_comment: false,
        }
    }

    /// Run the printer over the whole stream and return the output.
    pub fn print(mut self) -> Result<String> {
        if self.tokens.len() != self.lengths.len() {
            return Err(Error::MalformedTokenStream {
                message: "token and length arrays differ in length".to_string(),
            });
        }
        for i in 0..self.tokens.len() {
            self.process(i)?;
        }
        Ok(self.output)
    }

    fn process(&mut self, i: usize) -> Result<()> {
        let tokens = self.tokens;
        let fired_offset = std::mem::take(&mut self.fired_break_offset);
        match &tokens[i] {
            Token::Syntax(text) => {
                self.flush_line_start();
                self.output.push_str(text);
                self.remaining -= text_width(text) as isize;
            }
            Token::Space(size) => {
                self.flush_line_start();
                for _ in 0..*size {
                    self.output.push(' ');
                }
                self.remaining -= *size as isize;
            }
            Token::Open { style, offset } => {
                let pending = self.pending_break.unwrap_or(0) as isize;
                let fits = self.lengths[i] <= self.remaining - pending;
                // A break that fired directly before this group contributes
                // its offset to the group's cumulative offset.
                let parent_offset = self.enclosing_offset() + fired_offset;
                self.groups.push(GroupFrame {
                    style: *style,
                    offset: parent_offset + offset,
                    broken: *style == BreakStyle::Consistent && !fits,
                    indent_mark: self.indents.len(),
                });
            }
            Token::Close => {
                let frame = self.groups.pop().ok_or_else(|| Error::MalformedTokenStream {
                    message: format!("close without open at token {}", i),
                })?;
                self.indents.truncate(frame.indent_mark);
            }
            Token::Break { size, offset } => {
                let fire = self.after_line_comment
                    || self.enclosing_consistent_broken()
                    || self.lengths[i] > self.remaining;
                if fire {
                    let offset = *offset;
                    self.fire_break(offset);
                    self.fired_break_offset = offset;
                    if let Some(frame) = self.groups.last_mut() {
                        if frame.style == BreakStyle::Consistent {
                            frame.broken = true;
                        }
                    }
                } else {
                    self.pending_break = Some(*size);
                }
            }
            Token::Newline { count, offset } => {
                self.pending_break = None;
                self.after_line_comment = false;
                // A deferred line start would otherwise render as a line of
                // pure indentation; fold it into this newline instead.
                for _ in 0..count.saturating_sub(1) {
                    self.output.push('\n');
                }
                if !self.at_line_start {
                    self.output.push('\n');
                }
                self.set_line_start(*offset);
            }
            Token::Reset => {
                self.pending_break = None;
            }
            Token::Comment { kind, text } => {
                self.flush_line_start();
                match kind {
                    CommentKind::Line => {
                        self.output.push_str(text);
                        self.remaining -= text_width(text) as isize;
                        self.after_line_comment = true;
                    }
                    CommentKind::DocLine => {
                        // Continuation lines are re-indented to the current
                        // indent; the trivia adapter stripped the original.
                        let indent = self.indents.render();
                        for (n, line) in text.lines().enumerate() {
                            if n > 0 {
                                self.output.push('\n');
                                self.output.push_str(&indent);
                            }
                            self.output.push_str(line);
                            self.remaining = self.config.max_line_length as isize
                                - self.indents.columns(self.config.tab_width) as isize
                                - text_width(line) as isize;
                        }
                        self.after_line_comment = true;
                    }
                    CommentKind::Block | CommentKind::DocBlock => {
                        for (n, line) in text.split('\n').enumerate() {
                            if n > 0 {
                                self.output.push('\n');
                                self.remaining = self.config.max_line_length as isize
                                    - text_width(line) as isize;
                            } else {
                                self.remaining -= text_width(line) as isize;
                            }
                            self.output.push_str(line);
                        }
                    }
                }
            }
            Token::Verbatim(text) => {
                self.emit_verbatim(text);
            }
        }
        Ok(())
    }

    /// Emit the deferred line start and any pending break spaces.
    fn flush_line_start(&mut self) {
        if self.after_line_comment {
            // Nothing may share a line with a line comment; force a break.
            self.after_line_comment = false;
            self.pending_break = None;
            if !self.at_line_start {
                self.output.push('\n');
                self.at_line_start = true;
                self.remaining = self.config.max_line_length as isize
                    - self.indents.columns(self.config.tab_width) as isize;
            }
        }
        if self.at_line_start {
            self.at_line_start = false;
            self.output.push_str(&self.indents.render());
        }
        if let Some(size) = self.pending_break.take() {
            for _ in 0..size {
                self.output.push(' ');
            }
            self.remaining -= size as isize;
        }
    }

    fn fire_break(&mut self, offset: isize) {
        self.pending_break = None;
        self.after_line_comment = false;
        if !self.at_line_start {
            self.output.push('\n');
        }
        self.set_line_start(offset);
    }

    /// Establish the indentation for a fresh line: replace any frames this
    /// group's earlier breaks pushed, then push one frame covering the delta
    /// between the enclosing indentation and the target column.
    fn set_line_start(&mut self, offset: isize) {
        let (mark, target) = match self.groups.last() {
            Some(frame) => (frame.indent_mark, frame.offset + offset),
            None => (0, offset),
        };
        self.indents.truncate(mark);
        let base = self.indents.columns(self.config.tab_width) as isize;
        let delta = target - base;
        if delta > 0 {
            self.indents.push(Indent::from_columns(
                delta as usize,
                self.config.indent.kind,
                self.config.tab_width,
            ));
        }
        self.at_line_start = true;
        self.remaining = self.config.max_line_length as isize
            - self.indents.columns(self.config.tab_width) as isize;
    }

    fn enclosing_offset(&self) -> isize {
        self.groups.last().map_or(0, |f| f.offset)
    }

    fn enclosing_consistent_broken(&self) -> bool {
        self.groups
            .last()
            .is_some_and(|f| f.style == BreakStyle::Consistent && f.broken)
    }

    /// Re-indent a verbatim region: the first line is aligned to the current
    /// indentation, deeper lines keep their relative offset, and shallower
    /// lines are raised to match the first.
    fn emit_verbatim(&mut self, text: &str) {
        if self.after_line_comment && !self.at_line_start {
            self.output.push('\n');
            self.at_line_start = true;
        }
        self.after_line_comment = false;
        self.pending_break = None;
        let first_lead = text
            .lines()
            .next()
            .map_or(0, |l| l.len() - l.trim_start_matches([' ', '\t']).len());
        let indent = if self.at_line_start {
            self.indents.render()
        } else {
            String::new()
        };
        self.at_line_start = false;
        for (n, line) in text.split('\n').enumerate() {
            if n > 0 {
                self.output.push('\n');
            }
            if line.trim().is_empty() {
                continue;
            }
            let lead = line.len() - line.trim_start_matches([' ', '\t']).len();
            let keep = lead.saturating_sub(first_lead);
            self.output.push_str(&indent);
            for _ in 0..keep {
                self.output.push(' ');
            }
            let content = &line[lead..];
            self.output.push_str(content);
            self.remaining = self.config.max_line_length as isize
                - text_width(&indent) as isize
                - keep as isize
                - text_width(content) as isize;
        }
    }
}
