//! AST node definitions for Swift-style declaration sources
//!
//! The tree is leaf-oriented: every terminal is a [`Leaf`] carrying its text
//! and the trivia (newlines and comments) collected around it, so the
//! formatter can reproduce every comment exactly once. Node kinds are closed
//! enums with exhaustive matching; shared shapes (delimited lists, token
//! runs) are factored into small structs rather than trait objects.

/// Stable identity of a leaf, assigned in lexing order.
pub type LeafId = u32;

/// Line/column of a leaf in the original source (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Whitespace and comments between leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriviaPiece {
    /// A run of `count` line breaks.
    Newlines(usize),
    /// `// ...`
    Line(String),
    /// Consecutive `/// ...` lines joined with embedded newlines.
    DocLine(String),
    /// `/* ... */`
    Block(String),
    /// `/** ... */`
    DocBlock(String),
}

/// Lexical class of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    /// Identifier or keyword.
    Word,
    /// Numeric literal, kept as written.
    Number,
    /// String literal including its quotes.
    Str,
    /// Operator such as `=`, `->`, `==`.
    Op,
    /// Single-character punctuation: delimiters, `,`, `:`, `;`, `.`, `@`.
    Punct,
    /// `#if`, `#elseif`, `#else`, `#endif`.
    Directive,
    /// A raw source region preserved as written.
    Verbatim,
    /// End of input; carries trailing trivia only.
    Eof,
}

/// A terminal of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub id: LeafId,
    pub kind: LeafKind,
    pub text: String,
    /// Byte range in the original source.
    pub span: (usize, usize),
    pub pos: Position,
    /// Trivia on the lines before this leaf.
    pub leading: Vec<TriviaPiece>,
    /// Comments that begin on the same line, after this leaf.
    pub trailing: Vec<TriviaPiece>,
}

impl Leaf {
    pub fn is_word(&self, text: &str) -> bool {
        self.kind == LeafKind::Word && self.text == text
    }

    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == LeafKind::Punct && self.text.len() == ch.len_utf8() && self.text.starts_with(ch)
    }

    /// Number of line breaks directly before this leaf.
    pub fn newlines_before(&self) -> usize {
        match self.leading.first() {
            Some(TriviaPiece::Newlines(n)) => *n,
            _ => 0,
        }
    }
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub items: Vec<Decl>,
    /// Synthetic leaf holding trivia after the last construct.
    pub eof: Leaf,
    /// Total number of leaf ids handed out by the lexer.
    pub leaf_count: usize,
}

/// A flat run of expression or type tokens with nested delimited groups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Run {
    pub pieces: Vec<Piece>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Leaf(Leaf),
    Group(Delimited),
}

/// A balanced `( ... )`, `[ ... ]`, or `< ... >` with comma-separated items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimited {
    pub open: Leaf,
    pub items: Vec<DelimItem>,
    pub close: Leaf,
}

/// One element of a comma-separated list; the comma belongs to the item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimItem {
    pub content: Run,
    pub comma: Option<Leaf>,
}

/// `@name` or `@name(args)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub at: Leaf,
    pub name: Leaf,
    pub args: Option<Delimited>,
}

/// A declaration modifier, possibly detailed: `public`, `private(set)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub name: Leaf,
    pub detail: Option<Delimited>,
}

/// Any item that can appear at the top level or inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Type(TypeDecl),
    Func(FuncDecl),
    Var(VarDecl),
    IfConfig(IfConfigDecl),
    Stmt(Stmt),
    /// Raw source lines the parser does not model; reproduced verbatim.
    Verbatim(Leaf),
}

/// `struct` / `class` / `enum` / `protocol` / `extension`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: Leaf,
    /// Includes any generic parameter clause as a nested angle group.
    pub name: Run,
    pub inheritance: Option<InheritanceClause>,
    pub where_clause: Option<WhereClause>,
    pub body: Block,
}

/// `: A, B, C`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritanceClause {
    pub colon: Leaf,
    pub entries: Vec<DelimItem>,
}

/// `where T == U, V: W`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    pub keyword: Leaf,
    pub requirements: Vec<DelimItem>,
}

/// `func name<T>(params) throws -> T where ... { body }` or `init(...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: Leaf,
    /// Absent for initializers.
    pub name: Option<Leaf>,
    pub generics: Option<Delimited>,
    pub params: Delimited,
    /// `async`, `throws`, `rethrows` in source order.
    pub effects: Vec<Leaf>,
    /// The `->` leaf and the return type.
    pub output: Option<(Leaf, Run)>,
    pub where_clause: Option<WhereClause>,
    /// Absent in protocol requirements.
    pub body: Option<Block>,
}

/// `var` / `let` with optional annotation, initializer, and accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: Leaf,
    pub name: Leaf,
    /// The `:` leaf and the type.
    pub annotation: Option<(Leaf, Run)>,
    /// The `=` leaf and the value expression.
    pub initializer: Option<(Leaf, Run)>,
    pub body: Option<VarBody>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarBody {
    /// `{ get set }` and friends.
    Accessors(AccessorBlock),
    /// `{ statements }`: an implicit getter.
    Getter(Block),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorBlock {
    pub lbrace: Leaf,
    pub accessors: Vec<Accessor>,
    pub rbrace: Leaf,
}

/// `get`, `set`, `willSet`, `didSet`, each with an optional body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    pub keyword: Leaf,
    pub body: Option<Block>,
}

/// `{ items }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub lbrace: Leaf,
    pub items: Vec<Decl>,
    pub rbrace: Leaf,
}

/// A full `#if ... #endif` region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfConfigDecl {
    pub clauses: Vec<IfConfigClause>,
    pub endif: Leaf,
}

/// One `#if` / `#elseif` / `#else` arm and its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfConfigClause {
    pub directive: Leaf,
    pub condition: Option<Run>,
    pub items: Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Expr(Run),
    If(IfStmt),
    Do(DoStmt),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStmt {
    pub keyword: Leaf,
    pub condition: Run,
    pub body: Block,
    pub else_kw: Option<Leaf>,
    pub else_body: Option<ElseBody>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElseBody {
    Block(Block),
    If(Box<IfStmt>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoStmt {
    pub keyword: Leaf,
    pub body: Block,
    pub catches: Vec<CatchClause>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchClause {
    pub keyword: Leaf,
    pub pattern: Option<Run>,
    pub body: Block,
}

impl SourceFile {
    /// Visit every leaf in source order, mutably. Used by lint rules that
    /// rewrite trivia without touching structure.
    pub fn for_each_leaf_mut(&mut self, f: &mut impl FnMut(&mut Leaf)) {
        for item in &mut self.items {
            visit_decl(item, f);
        }
        f(&mut self.eof);
    }
}

/// Visit every leaf of one declaration in source order, mutably.
pub fn for_each_decl_leaf_mut(decl: &mut Decl, f: &mut impl FnMut(&mut Leaf)) {
    visit_decl(decl, f);
}

fn visit_decl(decl: &mut Decl, f: &mut impl FnMut(&mut Leaf)) {
    match decl {
        Decl::Type(d) => {
            visit_prelude(&mut d.attributes, &mut d.modifiers, f);
            f(&mut d.keyword);
            visit_run(&mut d.name, f);
            if let Some(inh) = &mut d.inheritance {
                f(&mut inh.colon);
                for entry in &mut inh.entries {
                    visit_delim_item(entry, f);
                }
            }
            if let Some(w) = &mut d.where_clause {
                visit_where(w, f);
            }
            visit_block(&mut d.body, f);
        }
        Decl::Func(d) => {
            visit_prelude(&mut d.attributes, &mut d.modifiers, f);
            f(&mut d.keyword);
            if let Some(name) = &mut d.name {
                f(name);
            }
            if let Some(g) = &mut d.generics {
                visit_delimited(g, f);
            }
            visit_delimited(&mut d.params, f);
            for effect in &mut d.effects {
                f(effect);
            }
            if let Some((arrow, ty)) = &mut d.output {
                f(arrow);
                visit_run(ty, f);
            }
            if let Some(w) = &mut d.where_clause {
                visit_where(w, f);
            }
            if let Some(body) = &mut d.body {
                visit_block(body, f);
            }
        }
        Decl::Var(d) => {
            visit_prelude(&mut d.attributes, &mut d.modifiers, f);
            f(&mut d.keyword);
            f(&mut d.name);
            if let Some((colon, ty)) = &mut d.annotation {
                f(colon);
                visit_run(ty, f);
            }
            if let Some((eq, value)) = &mut d.initializer {
                f(eq);
                visit_run(value, f);
            }
            match &mut d.body {
                Some(VarBody::Accessors(block)) => {
                    f(&mut block.lbrace);
                    for accessor in &mut block.accessors {
                        f(&mut accessor.keyword);
                        if let Some(body) = &mut accessor.body {
                            visit_block(body, f);
                        }
                    }
                    f(&mut block.rbrace);
                }
                Some(VarBody::Getter(block)) => visit_block(block, f),
                None => {}
            }
        }
        Decl::IfConfig(d) => {
            for clause in &mut d.clauses {
                f(&mut clause.directive);
                if let Some(cond) = &mut clause.condition {
                    visit_run(cond, f);
                }
                for item in &mut clause.items {
                    visit_decl(item, f);
                }
            }
            f(&mut d.endif);
        }
        Decl::Stmt(stmt) => visit_stmt(stmt, f),
        Decl::Verbatim(leaf) => f(leaf),
    }
}

fn visit_stmt(stmt: &mut Stmt, f: &mut impl FnMut(&mut Leaf)) {
    match stmt {
        Stmt::Expr(run) => visit_run(run, f),
        Stmt::If(s) => visit_if(s, f),
        Stmt::Do(s) => {
            f(&mut s.keyword);
            visit_block(&mut s.body, f);
            for clause in &mut s.catches {
                f(&mut clause.keyword);
                if let Some(pattern) = &mut clause.pattern {
                    visit_run(pattern, f);
                }
                visit_block(&mut clause.body, f);
            }
        }
    }
}

fn visit_if(s: &mut IfStmt, f: &mut impl FnMut(&mut Leaf)) {
    f(&mut s.keyword);
    visit_run(&mut s.condition, f);
    visit_block(&mut s.body, f);
    if let Some(kw) = &mut s.else_kw {
        f(kw);
    }
    match &mut s.else_body {
        Some(ElseBody::Block(block)) => visit_block(block, f),
        Some(ElseBody::If(nested)) => visit_if(nested, f),
        None => {}
    }
}

fn visit_prelude(
    attributes: &mut [Attribute],
    modifiers: &mut [Modifier],
    f: &mut impl FnMut(&mut Leaf),
) {
    for attr in attributes {
        f(&mut attr.at);
        f(&mut attr.name);
        if let Some(args) = &mut attr.args {
            visit_delimited(args, f);
        }
    }
    for modifier in modifiers {
        f(&mut modifier.name);
        if let Some(detail) = &mut modifier.detail {
            visit_delimited(detail, f);
        }
    }
}

fn visit_where(w: &mut WhereClause, f: &mut impl FnMut(&mut Leaf)) {
    f(&mut w.keyword);
    for requirement in &mut w.requirements {
        visit_delim_item(requirement, f);
    }
}

fn visit_block(block: &mut Block, f: &mut impl FnMut(&mut Leaf)) {
    f(&mut block.lbrace);
    for item in &mut block.items {
        visit_decl(item, f);
    }
    f(&mut block.rbrace);
}

fn visit_run(run: &mut Run, f: &mut impl FnMut(&mut Leaf)) {
    for piece in &mut run.pieces {
        match piece {
            Piece::Leaf(leaf) => f(leaf),
            Piece::Group(group) => visit_delimited(group, f),
        }
    }
}

fn visit_delimited(group: &mut Delimited, f: &mut impl FnMut(&mut Leaf)) {
    f(&mut group.open);
    for item in &mut group.items {
        visit_delim_item(item, f);
    }
    f(&mut group.close);
}

fn visit_delim_item(item: &mut DelimItem, f: &mut impl FnMut(&mut Leaf)) {
    visit_run(&mut item.content, f);
    if let Some(comma) = &mut item.comma {
        f(comma);
    }
}
