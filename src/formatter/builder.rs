//! Token stream construction
//!
//! Walks the AST depth-first and lowers it to the formatting token stream.
//! Grouping decorations attach to individual leaves through two registries:
//! `before[leaf]` flushes in registration order, `after[leaf]` flushes in
//! reverse registration order so closes registered by ancestors nest outside
//! closes registered by descendants. The builder decides where breaks are
//! permitted and how constructs group; whether anything fits is entirely the
//! printer's business.

use crate::ast::*;
use crate::config::FormatConfig;
use crate::formatter::token::{BreakStyle, CommentKind, Token};

/// Words that keep a space before a following `(` or `[`.
const SPACED_BEFORE_PAREN: &[&str] = &[
    "if", "guard", "while", "for", "switch", "return", "throw", "in", "where", "case", "let",
    "var", "else", "catch", "do", "try", "await", "as", "is", "repeat",
];

pub struct TokenStreamBuilder<'a> {
    config: &'a FormatConfig,
    /// Column width of one indent level.
    ind: isize,
    tokens: Vec<Token>,
    before: Vec<Vec<Token>>,
    after: Vec<Vec<Vec<Token>>>,
}

impl<'a> TokenStreamBuilder<'a> {
    pub fn new(config: &'a FormatConfig) -> Self {
        TokenStreamBuilder {
            config,
            ind: config.indent_columns() as isize,
            tokens: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Lower a whole source file to tokens.
    pub fn build(mut self, file: &SourceFile) -> Vec<Token> {
        self.before = vec![Vec::new(); file.leaf_count];
        self.after = vec![Vec::new(); file.leaf_count];
        self.items(&file.items);
        self.leaf(&file.eof);
        self.tokens
    }

    // ----- registries and primitives -------------------------------------

    fn before(&mut self, leaf: &Leaf, tokens: impl IntoIterator<Item = Token>) {
        self.before[leaf.id as usize].extend(tokens);
    }

    fn after(&mut self, leaf: &Leaf, tokens: Vec<Token>) {
        self.after[leaf.id as usize].push(tokens);
    }

    fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    fn space(&mut self, size: usize) {
        self.push(Token::Space(size));
    }

    /// Guarantee at least `count` line breaks at this point, merging with a
    /// newline already at the end of the stream rather than stacking.
    fn ensure_newlines(&mut self, count: usize) {
        if self.tokens.is_empty() {
            return;
        }
        if let Some(Token::Newline { count: c, .. }) = self.tokens.last_mut() {
            *c = (*c).max(count);
            return;
        }
        self.push(Token::newline(count));
    }

    fn ensure_newlines_offset(&mut self, count: usize, offset: isize) {
        if let Some(Token::Newline { count: c, offset: o }) = self.tokens.last_mut() {
            *c = (*c).max(count);
            *o = offset;
            return;
        }
        self.push(Token::Newline { count, offset });
    }

    // ----- leaf emission --------------------------------------------------

    /// Emit one leaf: leading trivia, before-tokens, the text itself,
    /// trailing comments, then after-token groups in reverse registration
    /// order.
    fn leaf(&mut self, leaf: &Leaf) {
        self.leading_trivia(leaf);
        let before = std::mem::take(&mut self.before[leaf.id as usize]);
        for token in before {
            self.push(token);
        }
        match leaf.kind {
            LeafKind::Eof => {}
            LeafKind::Verbatim => self.push(Token::Verbatim(leaf.text.clone())),
            _ => self.push(Token::Syntax(leaf.text.clone())),
        }
        for piece in &leaf.trailing {
            self.space(1);
            self.comment_piece(piece);
        }
        let after = std::mem::take(&mut self.after[leaf.id as usize]);
        for group in after.into_iter().rev() {
            for token in group {
                self.push(token);
            }
        }
    }

    /// Surface leading trivia. The first newline run is owned by the
    /// structural separator already in the stream: blank lines upgrade it,
    /// single line breaks inside reflowable constructs are dropped so the
    /// printer re-decides them by width.
    fn leading_trivia(&mut self, leaf: &Leaf) {
        let pieces = &leaf.leading;
        let mut rest = pieces.as_slice();
        if let Some(TriviaPiece::Newlines(n)) = pieces.first() {
            rest = &pieces[1..];
            let before_comment = !rest.is_empty();
            if self.config.respects_existing_line_breaks && *n >= 2 {
                self.ensure_newlines(2);
            } else if before_comment {
                self.ensure_newlines(1);
            }
        }
        for piece in rest {
            match piece {
                TriviaPiece::Newlines(n) => {
                    let count = if self.config.respects_existing_line_breaks {
                        (*n).min(2)
                    } else {
                        1
                    };
                    self.ensure_newlines(count);
                }
                other => self.comment_piece(other),
            }
        }
        // A block comment glued to the code after it keeps a separating
        // space; line comments end their line in the printer instead.
        if matches!(
            rest.last(),
            Some(TriviaPiece::Block(_) | TriviaPiece::DocBlock(_))
        ) {
            self.space(1);
        }
    }

    fn comment_piece(&mut self, piece: &TriviaPiece) {
        let (kind, text) = match piece {
            TriviaPiece::Line(text) => (CommentKind::Line, text),
            TriviaPiece::DocLine(text) => (CommentKind::DocLine, text),
            TriviaPiece::Block(text) => (CommentKind::Block, text),
            TriviaPiece::DocBlock(text) => (CommentKind::DocBlock, text),
            TriviaPiece::Newlines(_) => return,
        };
        self.push(Token::Comment {
            kind,
            text: text.clone(),
        });
    }

    // ----- items ----------------------------------------------------------

    fn items(&mut self, items: &[Decl]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.ensure_newlines(1);
            }
            self.decl(item);
        }
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Type(d) => self.type_decl(d),
            Decl::Func(d) => self.func_decl(d),
            Decl::Var(d) => self.var_decl(d),
            Decl::IfConfig(d) => self.if_config(d),
            Decl::Stmt(s) => self.statement(s),
            Decl::Verbatim(leaf) => self.leaf(leaf),
        }
    }

    // ----- attributes and modifiers --------------------------------------

    /// Emit attributes and modifiers. Two or more attributes open a
    /// consistent group that stays open through the declaration head, so an
    /// over-long head puts every attribute on its own line; the caller
    /// closes it at the head's last leaf. Returns whether a group was
    /// opened.
    fn prelude(&mut self, attributes: &[Attribute], modifiers: &[Modifier]) -> bool {
        let grouped = attributes.len() >= 2;
        if grouped {
            self.before(&attributes[0].at, [Token::open(BreakStyle::Consistent, 0)]);
        }
        for attr in attributes {
            let last = attr.args.as_ref().map_or(&attr.name, |a| &a.close);
            if grouped {
                self.after(last, vec![Token::brk(1, 0)]);
            }
        }
        for attr in attributes {
            self.attribute(attr);
            if !grouped {
                self.space(1);
            }
        }
        for modifier in modifiers {
            self.leaf(&modifier.name);
            if let Some(detail) = &modifier.detail {
                self.delimited(detail, BreakStyle::Inconsistent);
            }
            self.space(1);
        }
        grouped
    }

    fn attribute(&mut self, attr: &Attribute) {
        self.leaf(&attr.at);
        self.leaf(&attr.name);
        if let Some(args) = &attr.args {
            self.delimited(args, BreakStyle::Inconsistent);
        }
    }

    // ----- declarations ---------------------------------------------------

    fn type_decl(&mut self, d: &TypeDecl) {
        let attr_group = self.prelude(&d.attributes, &d.modifiers);
        self.leaf(&d.keyword);
        self.space(1);
        self.run(&d.name);

        let head_group = d.inheritance.is_some();
        if let Some(inh) = &d.inheritance {
            let style = if inh.entries.len() >= 3 {
                BreakStyle::Consistent
            } else {
                BreakStyle::Inconsistent
            };
            self.before(&inh.colon, [Token::open(style, self.ind)]);
            self.after(&inh.colon, vec![Token::brk(1, 0)]);
            for entry in &inh.entries {
                if let Some(comma) = &entry.comma {
                    self.after(comma, vec![Token::brk(1, 0)]);
                }
            }
            self.leaf(&inh.colon);
            self.clause_entries(&inh.entries);
        }
        if let Some(w) = &d.where_clause {
            self.where_clause(w, head_group);
        }

        let body = &d.body;
        if body.items.is_empty() {
            if head_group {
                self.before(&body.lbrace, [Token::brk(1, -self.ind)]);
            } else {
                self.space(1);
            }
            if attr_group {
                self.after(&body.rbrace, vec![Token::Close]);
            }
            if head_group {
                self.after(&body.rbrace, vec![Token::Close]);
            }
            self.leaf(&body.lbrace);
            self.space(1);
            self.leaf(&body.rbrace);
        } else {
            self.register_block(body);
            if head_group {
                self.before(&body.lbrace, [Token::brk(1, -self.ind)]);
            } else {
                self.space(1);
            }
            if attr_group {
                self.after(&body.lbrace, vec![Token::Close]);
            }
            if head_group {
                self.after(&body.lbrace, vec![Token::Close]);
            }
            self.walk_block(body);
        }
    }

    fn func_decl(&mut self, d: &FuncDecl) {
        let attr_group = self.prelude(&d.attributes, &d.modifiers);
        self.leaf(&d.keyword);
        if let Some(name) = &d.name {
            self.space(1);
            self.leaf(name);
        }

        // The signature is one consistent group from the parameter (or
        // generic) clause through the body's opening brace, so an
        // over-long signature puts every parameter on its own line.
        let sig_start = d.generics.as_ref().map_or(&d.params.open, |g| &g.open);
        self.before(sig_start, [Token::open(BreakStyle::Consistent, self.ind)]);

        if let Some(body) = &d.body {
            if body.items.is_empty() {
                if attr_group {
                    self.after(&body.rbrace, vec![Token::Close]);
                }
                self.after(&body.rbrace, vec![Token::Close]);
            } else {
                self.register_block(body);
                if attr_group {
                    self.after(&body.lbrace, vec![Token::Close]);
                }
                self.after(&body.lbrace, vec![Token::Close]);
            }
        } else {
            let sig_end = self.signature_end(d);
            if attr_group {
                self.after(sig_end, vec![Token::Close]);
            }
            self.after(sig_end, vec![Token::Close]);
        }

        if let Some(generics) = &d.generics {
            self.delimited(generics, BreakStyle::Consistent);
        }
        self.register_delimited_breaks(&d.params);
        self.walk_delimited(&d.params);
        for effect in &d.effects {
            self.space(1);
            self.leaf(effect);
        }
        if let Some((arrow, ty)) = &d.output {
            self.before(arrow, [Token::brk(1, self.ind)]);
            self.leaf(arrow);
            self.space(1);
            self.run(ty);
        }
        if let Some(w) = &d.where_clause {
            self.where_clause(w, true);
        }
        match &d.body {
            Some(body) if body.items.is_empty() => {
                self.space(1);
                self.leaf(&body.lbrace);
                self.space(1);
                self.leaf(&body.rbrace);
            }
            Some(body) => {
                self.space(1);
                self.walk_block(body);
            }
            None => {}
        }
    }

    /// Last leaf of a bodiless signature.
    fn signature_end<'b>(&self, d: &'b FuncDecl) -> &'b Leaf {
        if let Some(w) = &d.where_clause {
            return clause_last_leaf(&w.requirements);
        }
        if let Some((_, ty)) = &d.output {
            return run_last_leaf(ty);
        }
        if let Some(effect) = d.effects.last() {
            return effect;
        }
        &d.params.close
    }

    fn var_decl(&mut self, d: &VarDecl) {
        let attr_group = self.prelude(&d.attributes, &d.modifiers);
        if attr_group {
            self.after(var_last_leaf(d), vec![Token::Close]);
        }
        self.leaf(&d.keyword);
        self.space(1);
        self.leaf(&d.name);
        if let Some((colon, ty)) = &d.annotation {
            self.leaf(colon);
            self.space(1);
            self.run(ty);
        }
        if let Some((eq, value)) = &d.initializer {
            self.space(1);
            // The value hangs in its own group so a long right-hand side
            // wraps onto a continuation line.
            self.after(eq, vec![
                Token::open(BreakStyle::Inconsistent, self.ind),
                Token::brk(1, 0),
            ]);
            self.after(run_last_leaf(value), vec![Token::Close]);
            self.leaf(eq);
            self.run_spaced(value, true);
        }
        match &d.body {
            Some(VarBody::Getter(block)) => {
                self.space(1);
                self.block_body(block);
            }
            Some(VarBody::Accessors(block)) => {
                self.space(1);
                self.accessor_block(block);
            }
            None => {}
        }
    }

    fn accessor_block(&mut self, block: &AccessorBlock) {
        self.after(&block.lbrace, vec![
            Token::open(BreakStyle::Consistent, self.ind),
            Token::brk(1, 0),
        ]);
        self.before(&block.rbrace, [Token::brk(1, -self.ind)]);
        self.after(&block.rbrace, vec![Token::Close]);
        self.leaf(&block.lbrace);
        if !block.accessors.is_empty() {
            // The accessor list itself wraps independently, so a broken
            // block can still keep `get set` together on one line.
            let first = &block.accessors[0];
            self.before(&first.keyword, [Token::open(BreakStyle::Inconsistent, 0)]);
            let last = block.accessors.last().expect("non-empty");
            let last_leaf = last
                .body
                .as_ref()
                .map_or(&last.keyword, |body| &body.rbrace);
            self.after(last_leaf, vec![Token::Close]);
            for (i, accessor) in block.accessors.iter().enumerate() {
                if i > 0 {
                    self.push(Token::brk(1, 0));
                }
                self.leaf(&accessor.keyword);
                if let Some(body) = &accessor.body {
                    self.space(1);
                    self.block_body(body);
                }
            }
        }
        self.leaf(&block.rbrace);
    }

    // ----- blocks ---------------------------------------------------------

    fn block_body(&mut self, block: &Block) {
        if block.items.is_empty() {
            self.leaf(&block.lbrace);
            self.space(1);
            self.leaf(&block.rbrace);
            return;
        }
        self.register_block(block);
        self.walk_block(block);
    }

    fn register_block(&mut self, block: &Block) {
        self.after(&block.lbrace, vec![
            Token::open(BreakStyle::Consistent, self.ind),
            Token::brk(1, 0),
        ]);
        self.before(&block.rbrace, [Token::brk(1, -self.ind)]);
        self.after(&block.rbrace, vec![Token::Close]);
    }

    fn walk_block(&mut self, block: &Block) {
        self.leaf(&block.lbrace);
        self.items(&block.items);
        self.leaf(&block.rbrace);
    }

    // ----- clauses --------------------------------------------------------

    fn clause_entries(&mut self, entries: &[DelimItem]) {
        for entry in entries {
            self.run(&entry.content);
            if let Some(comma) = &entry.comma {
                self.leaf(comma);
            }
        }
    }

    /// `where` wraps independently of the clause around it. `hanging` means
    /// an enclosing head group exists whose break moves the keyword to its
    /// own line when the head wraps.
    fn where_clause(&mut self, w: &WhereClause, hanging: bool) {
        let offset = if hanging { 0 } else { self.ind };
        self.before(&w.keyword, [
            Token::brk(1, offset),
            Token::open(BreakStyle::Inconsistent, self.ind),
        ]);
        for requirement in &w.requirements {
            if let Some(comma) = &requirement.comma {
                self.after(comma, vec![Token::brk(1, 0)]);
            }
        }
        self.after(clause_last_leaf(&w.requirements), vec![Token::Close]);
        self.leaf(&w.keyword);
        self.space(1);
        self.clause_entries(&w.requirements);
    }

    // ----- conditional compilation ---------------------------------------

    fn if_config(&mut self, d: &IfConfigDecl) {
        for clause in &d.clauses {
            self.leaf(&clause.directive);
            if let Some(condition) = &clause.condition {
                self.space(1);
                self.run(condition);
            }
            self.push(Token::open(BreakStyle::Consistent, self.ind));
            self.push(Token::newline(1));
            self.items(&clause.items);
            self.ensure_newlines_offset(1, -self.ind);
            self.push(Token::Close);
        }
        self.leaf(&d.endif);
    }

    // ----- statements -----------------------------------------------------

    fn statement(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(run) => {
                self.before(run_first_leaf(run), [Token::open(BreakStyle::Inconsistent, 0)]);
                self.after(run_last_leaf(run), vec![Token::Close]);
                self.run_spaced(run, true);
            }
            Stmt::If(s) => {
                self.before(&s.keyword, [Token::open(BreakStyle::Inconsistent, 0)]);
                self.after(if_last_leaf(s), vec![Token::Close]);
                self.if_stmt(s);
            }
            Stmt::Do(s) => {
                self.before(&s.keyword, [Token::open(BreakStyle::Inconsistent, 0)]);
                let last = s
                    .catches
                    .last()
                    .map_or(&s.body.rbrace, |clause| &clause.body.rbrace);
                self.after(last, vec![Token::Close]);
                self.do_stmt(s);
            }
        }
    }

    fn if_stmt(&mut self, s: &IfStmt) {
        self.leaf(&s.keyword);
        self.space(1);
        self.before(
            run_first_leaf(&s.condition),
            [Token::open(BreakStyle::Inconsistent, self.ind)],
        );
        self.after(run_last_leaf(&s.condition), vec![Token::Close]);
        self.run_spaced(&s.condition, true);
        self.space(1);
        self.block_body(&s.body);
        if let Some(kw) = &s.else_kw {
            self.control_flow_keyword(kw);
            self.space(1);
            match &s.else_body {
                Some(ElseBody::Block(block)) => self.block_body(block),
                Some(ElseBody::If(nested)) => self.if_stmt(nested),
                None => {}
            }
        }
    }

    fn do_stmt(&mut self, s: &DoStmt) {
        self.leaf(&s.keyword);
        self.space(1);
        self.block_body(&s.body);
        for clause in &s.catches {
            self.control_flow_keyword(&clause.keyword);
            if let Some(pattern) = &clause.pattern {
                self.space(1);
                self.run(pattern);
            }
            self.space(1);
            self.block_body(&clause.body);
        }
    }

    fn control_flow_keyword(&mut self, kw: &Leaf) {
        if self.config.line_break_before_control_flow_keywords {
            self.ensure_newlines(1);
        } else {
            self.push(Token::brk(1, 0));
        }
        self.leaf(kw);
    }

    // ----- runs and delimited lists --------------------------------------

    fn run(&mut self, run: &Run) {
        self.run_spaced(run, false);
    }

    /// Emit a token run with spacing glue. In statement position, top-level
    /// binary operators become break opportunities and the right side of an
    /// `=` may hang.
    fn run_spaced(&mut self, run: &Run, statement: bool) {
        let mut prev: Option<GlueEdge> = None;
        let mut tight = false;
        let mut hang_after_eq = false;
        for (i, piece) in run.pieces.iter().enumerate() {
            let cur = GlueEdge::of(piece);
            let is_op = matches!(piece, Piece::Leaf(l) if l.kind == LeafKind::Op);
            let prefix_op = is_op
                && match run.pieces.get(i.wrapping_sub(1)) {
                    None => true,
                    Some(Piece::Leaf(l)) => l.kind == LeafKind::Op,
                    Some(Piece::Group(_)) => false,
                };
            // Postfix `?`/`!` and `=` never take a break on their left.
            let binary_op =
                statement && is_op && !prefix_op && !matches!(cur.text, "=" | "?" | "!");
            if let Some(p) = prev {
                if hang_after_eq {
                    self.push(Token::brk(1, self.ind));
                } else if binary_op {
                    self.push(Token::brk(1, self.ind));
                } else if !tight && needs_space(p, cur) {
                    self.space(1);
                }
            }
            hang_after_eq = false;
            match piece {
                Piece::Leaf(leaf) => self.leaf(leaf),
                Piece::Group(group) => self.delimited(group, self.group_style(group)),
            }
            if statement && is_op && !prefix_op && cur.text == "=" {
                hang_after_eq = true;
            }
            tight = prefix_op;
            prev = Some(GlueEdge::close_of(piece));
        }
    }

    fn group_style(&self, group: &Delimited) -> BreakStyle {
        if group.open.text == "<" || self.config.line_break_before_each_argument {
            BreakStyle::Consistent
        } else {
            BreakStyle::Inconsistent
        }
    }

    /// A delimited list as its own group, delimiters included.
    fn delimited(&mut self, d: &Delimited, style: BreakStyle) {
        self.before(&d.open, [Token::open(style, self.ind)]);
        self.after(&d.close, vec![Token::Close]);
        self.register_delimited_breaks(d);
        self.walk_delimited(d);
    }

    fn register_delimited_breaks(&mut self, d: &Delimited) {
        if d.items.is_empty() {
            return;
        }
        self.after(&d.open, vec![Token::brk(0, 0)]);
        for item in &d.items {
            if let Some(comma) = &item.comma {
                self.after(comma, vec![Token::brk(1, 0)]);
            }
        }
        self.before(&d.close, [Token::brk(0, -self.ind)]);
    }

    fn walk_delimited(&mut self, d: &Delimited) {
        self.leaf(&d.open);
        for item in &d.items {
            self.run(&item.content);
            if let Some(comma) = &item.comma {
                self.leaf(comma);
            }
        }
        self.leaf(&d.close);
    }
}

// ----- glue ----------------------------------------------------------------

/// The visible edge of a piece, for spacing decisions.
#[derive(Clone, Copy)]
struct GlueEdge<'a> {
    text: &'a str,
    kind: LeafKind,
}

impl<'a> GlueEdge<'a> {
    fn of(piece: &'a Piece) -> Self {
        match piece {
            Piece::Leaf(leaf) => GlueEdge {
                text: &leaf.text,
                kind: leaf.kind,
            },
            Piece::Group(group) => GlueEdge {
                text: &group.open.text,
                kind: LeafKind::Punct,
            },
        }
    }

    fn close_of(piece: &'a Piece) -> Self {
        match piece {
            Piece::Leaf(leaf) => GlueEdge {
                text: &leaf.text,
                kind: leaf.kind,
            },
            Piece::Group(group) => GlueEdge {
                text: &group.close.text,
                kind: LeafKind::Punct,
            },
        }
    }
}

fn needs_space(prev: GlueEdge, cur: GlueEdge) -> bool {
    // Tight on the left of separators and closers.
    if matches!(cur.text, "," | ";" | ":" | "." | ")" | "]") {
        return false;
    }
    // Postfix `?` and `!` hug their operand.
    if cur.kind == LeafKind::Op && matches!(cur.text, "?" | "!") {
        return false;
    }
    // Openers are tight after a callee, spaced after keywords and operators.
    if matches!(cur.text, "(" | "[" | "<") && cur.kind == LeafKind::Punct {
        return match prev.kind {
            LeafKind::Word => SPACED_BEFORE_PAREN.contains(&prev.text),
            LeafKind::Op => true,
            _ => matches!(prev.text, ","),
        };
    }
    // Tight on the right of openers and member access.
    if matches!(prev.text, "(" | "[" | "." | "@") {
        return false;
    }
    if prev.kind == LeafKind::Punct && prev.text == "<" {
        return false;
    }
    true
}

// ----- leaf lookups --------------------------------------------------------

fn run_first_leaf(run: &Run) -> &Leaf {
    match run.pieces.first().expect("runs are non-empty") {
        Piece::Leaf(leaf) => leaf,
        Piece::Group(group) => &group.open,
    }
}

fn run_last_leaf(run: &Run) -> &Leaf {
    match run.pieces.last().expect("runs are non-empty") {
        Piece::Leaf(leaf) => leaf,
        Piece::Group(group) => &group.close,
    }
}

fn clause_last_leaf(entries: &[DelimItem]) -> &Leaf {
    let last = entries.last().expect("clauses are non-empty");
    match &last.comma {
        Some(comma) => comma,
        None => run_last_leaf(&last.content),
    }
}

fn var_last_leaf(d: &VarDecl) -> &Leaf {
    match &d.body {
        Some(VarBody::Accessors(block)) => &block.rbrace,
        Some(VarBody::Getter(block)) => &block.rbrace,
        None => {
            if let Some((_, value)) = &d.initializer {
                run_last_leaf(value)
            } else if let Some((_, ty)) = &d.annotation {
                run_last_leaf(ty)
            } else {
                &d.name
            }
        }
    }
}

fn if_last_leaf(s: &IfStmt) -> &Leaf {
    match &s.else_body {
        Some(ElseBody::Block(block)) => &block.rbrace,
        Some(ElseBody::If(nested)) => if_last_leaf(nested),
        None => &s.body.rbrace,
    }
}
