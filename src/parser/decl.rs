//! Declaration parsing
//!
//! Attributes, modifiers, type declarations, functions and initializers,
//! variable bindings with accessor blocks, and conditional-compilation
//! regions. Statement and token-run parsing lives in [`super::stmt`].

use crate::ast::*;
use crate::error::Result;
use crate::parser::stmt::RunCtx;

/// Keywords that introduce a nominal type declaration.
pub const TYPE_KEYWORDS: &[&str] = &["struct", "class", "enum", "protocol", "extension", "actor"];

/// Declaration modifiers, in the positions Swift allows them.
pub const MODIFIER_KEYWORDS: &[&str] = &[
    "public",
    "private",
    "internal",
    "fileprivate",
    "open",
    "package",
    "static",
    "final",
    "override",
    "required",
    "convenience",
    "lazy",
    "weak",
    "unowned",
    "mutating",
    "nonmutating",
    "indirect",
    "dynamic",
];

/// Accessor keywords inside a property block.
pub const ACCESSOR_KEYWORDS: &[&str] = &["get", "set", "willSet", "didSet"];

/// Parser state over the lexed leaf stream
pub struct Parser<'a> {
    leaves: &'a [Leaf],
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(leaves: &'a [Leaf], source: &'a str) -> Self {
        Parser {
            leaves,
            source,
            pos: 0,
        }
    }

    /// Current leaf; the stream always ends with an Eof leaf.
    pub fn current(&self) -> &'a Leaf {
        self.leaves
            .get(self.pos)
            .unwrap_or_else(|| self.leaves.last().expect("lexer emits at least eof"))
    }

    pub fn peek(&self) -> &'a Leaf {
        self.leaves
            .get(self.pos + 1)
            .unwrap_or_else(|| self.leaves.last().expect("lexer emits at least eof"))
    }

    pub fn advance(&mut self) -> Leaf {
        let leaf = self.current().clone();
        if self.pos < self.leaves.len() {
            self.pos += 1;
        }
        leaf
    }

    pub fn is_eof(&self) -> bool {
        self.current().kind == LeafKind::Eof
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn restore(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn expect_punct(&mut self, ch: char) -> Result<Leaf> {
        if self.current().is_punct(ch) {
            Ok(self.advance())
        } else {
            Err(self.error(&format!("expected '{}'", ch)))
        }
    }

    /// Create an error pointing at the current leaf.
    pub fn error(&self, message: &str) -> crate::Error {
        let span = self.current().span;
        crate::Error::ParseError {
            message: crate::error::format_parse_error(self.source, span.0, message),
            span: Some(span),
        }
    }

    pub fn parse_source_file(&mut self) -> Result<SourceFile> {
        let mut items = Vec::new();
        while !self.is_eof() {
            items.push(self.parse_terminated_item()?);
        }
        Ok(SourceFile {
            items,
            eof: self.current().clone(),
            leaf_count: self.leaves.len(),
        })
    }

    /// Parse one item and swallow a redundant trailing semicolon, keeping
    /// any comments the semicolon carried.
    fn parse_terminated_item(&mut self) -> Result<Decl> {
        let mut item = self.parse_item()?;
        if self.current().is_punct(';') && self.current().newlines_before() == 0 {
            let semi = self.advance();
            attach_semi_to_decl(&mut item, semi);
        }
        Ok(item)
    }

    /// Parse one block or top-level item.
    pub fn parse_item(&mut self) -> Result<Decl> {
        let current = self.current();
        if current.kind == LeafKind::Directive && current.text == "#if" {
            return self.parse_if_config().map(Decl::IfConfig);
        }

        // Attributes and modifiers are speculative: they only stick when a
        // declaration keyword follows.
        let start = self.pos;
        let attributes = self.parse_attributes()?;
        let modifiers = self.parse_modifiers();
        let kw = self.current();
        if kw.kind == LeafKind::Word {
            if TYPE_KEYWORDS.contains(&kw.text.as_str()) {
                return self
                    .parse_type_decl(attributes, modifiers)
                    .map(Decl::Type);
            }
            if kw.text == "func" || kw.text == "init" {
                return self
                    .parse_func_decl(attributes, modifiers)
                    .map(Decl::Func);
            }
            if (kw.text == "var" || kw.text == "let") && self.peek().kind == LeafKind::Word {
                return self.parse_var_decl(attributes, modifiers).map(Decl::Var);
            }
        }
        self.restore(start);
        self.parse_statement_or_verbatim()
    }

    fn parse_attributes(&mut self) -> Result<Vec<Attribute>> {
        let mut attributes = Vec::new();
        while self.current().is_punct('@') && self.peek().kind == LeafKind::Word {
            let at = self.advance();
            let name = self.advance();
            let args = if self.current().is_punct('(') && self.current().newlines_before() == 0 {
                Some(self.parse_delimited('(', ')')?)
            } else {
                None
            };
            attributes.push(Attribute { at, name, args });
        }
        Ok(attributes)
    }

    fn parse_modifiers(&mut self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        loop {
            let current = self.current();
            if current.kind != LeafKind::Word
                || !MODIFIER_KEYWORDS.contains(&current.text.as_str())
            {
                break;
            }
            // `static` before `func`/`var` etc.; a modifier followed by
            // something that cannot continue a declaration is an identifier.
            let next = self.peek();
            let continues = next.kind == LeafKind::Word || next.is_punct('@') || next.is_punct('(');
            if !continues {
                break;
            }
            let name = self.advance();
            let detail = if self.current().is_punct('(') {
                let save = self.position();
                match self.parse_delimited('(', ')') {
                    Ok(group) => Some(group),
                    Err(_) => {
                        self.restore(save);
                        None
                    }
                }
            } else {
                None
            };
            modifiers.push(Modifier { name, detail });
        }
        modifiers
    }

    fn parse_type_decl(
        &mut self,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
    ) -> Result<TypeDecl> {
        let keyword = self.advance();
        let name = self.parse_run(RunCtx::type_name())?;
        if name.pieces.is_empty() {
            return Err(self.error("expected a type name"));
        }
        let inheritance = if self.current().is_punct(':') {
            let colon = self.advance();
            let entries = self.parse_clause_entries()?;
            Some(InheritanceClause { colon, entries })
        } else {
            None
        };
        let where_clause = self.parse_where_clause()?;
        let body = self.parse_block()?;
        Ok(TypeDecl {
            attributes,
            modifiers,
            keyword,
            name,
            inheritance,
            where_clause,
            body,
        })
    }

    /// Comma-separated type runs, as in inheritance and where clauses.
    fn parse_clause_entries(&mut self) -> Result<Vec<DelimItem>> {
        let mut entries = Vec::new();
        loop {
            let content = self.parse_run(RunCtx::clause_entry())?;
            if content.pieces.is_empty() {
                return Err(self.error("expected a type"));
            }
            let comma = if self.current().is_punct(',') {
                Some(self.advance())
            } else {
                None
            };
            let done = comma.is_none();
            entries.push(DelimItem { content, comma });
            if done {
                return Ok(entries);
            }
        }
    }

    fn parse_where_clause(&mut self) -> Result<Option<WhereClause>> {
        if !self.current().is_word("where") {
            return Ok(None);
        }
        let keyword = self.advance();
        let requirements = self.parse_clause_entries()?;
        Ok(Some(WhereClause {
            keyword,
            requirements,
        }))
    }

    fn parse_func_decl(
        &mut self,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
    ) -> Result<FuncDecl> {
        let keyword = self.advance();
        let name = if keyword.text == "func" {
            let current = self.current();
            if current.kind == LeafKind::Word || current.kind == LeafKind::Op {
                Some(self.advance())
            } else {
                return Err(self.error("expected a function name"));
            }
        } else {
            None
        };
        let generics = if self.current().kind == LeafKind::Op && self.current().text == "<" {
            Some(self.parse_delimited('<', '>')?)
        } else {
            None
        };
        let params = self.parse_delimited('(', ')')?;
        let mut effects = Vec::new();
        while matches!(
            self.current().text.as_str(),
            "throws" | "rethrows" | "async"
        ) && self.current().kind == LeafKind::Word
        {
            effects.push(self.advance());
        }
        let output = if self.current().kind == LeafKind::Op && self.current().text == "->" {
            let arrow = self.advance();
            let ty = self.parse_run(RunCtx::type_run())?;
            if ty.pieces.is_empty() {
                return Err(self.error("expected a return type"));
            }
            Some((arrow, ty))
        } else {
            None
        };
        let where_clause = self.parse_where_clause()?;
        let body = if self.current().is_punct('{') {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(FuncDecl {
            attributes,
            modifiers,
            keyword,
            name,
            generics,
            params,
            effects,
            output,
            where_clause,
            body,
        })
    }

    fn parse_var_decl(
        &mut self,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
    ) -> Result<VarDecl> {
        let keyword = self.advance();
        let name = self.advance();
        let annotation = if self.current().is_punct(':') {
            let colon = self.advance();
            let ty = self.parse_run(RunCtx::type_run())?;
            if ty.pieces.is_empty() {
                return Err(self.error("expected a type annotation"));
            }
            Some((colon, ty))
        } else {
            None
        };
        let initializer = if self.current().kind == LeafKind::Op && self.current().text == "=" {
            let eq = self.advance();
            let value = self.parse_run(RunCtx::value())?;
            if value.pieces.is_empty() {
                return Err(self.error("expected an initial value"));
            }
            Some((eq, value))
        } else {
            None
        };
        let body = if initializer.is_none()
            && self.current().is_punct('{')
            && self.current().newlines_before() == 0
        {
            Some(self.parse_var_body()?)
        } else {
            None
        };
        Ok(VarDecl {
            attributes,
            modifiers,
            keyword,
            name,
            annotation,
            initializer,
            body,
        })
    }

    fn parse_var_body(&mut self) -> Result<VarBody> {
        // `{ get ... }` is an accessor block; any other block body is an
        // implicit getter.
        let is_accessor = self.peek().kind == LeafKind::Word
            && ACCESSOR_KEYWORDS.contains(&self.peek().text.as_str());
        if !is_accessor {
            return Ok(VarBody::Getter(self.parse_block()?));
        }
        let lbrace = self.expect_punct('{')?;
        let mut accessors = Vec::new();
        while !self.current().is_punct('}') {
            let current = self.current();
            if current.kind != LeafKind::Word
                || !ACCESSOR_KEYWORDS.contains(&current.text.as_str())
            {
                return Err(self.error("expected an accessor"));
            }
            let keyword = self.advance();
            let body = if self.current().is_punct('{') {
                Some(self.parse_block()?)
            } else {
                None
            };
            accessors.push(Accessor { keyword, body });
        }
        let rbrace = self.expect_punct('}')?;
        Ok(VarBody::Accessors(AccessorBlock {
            lbrace,
            accessors,
            rbrace,
        }))
    }

    pub fn parse_block(&mut self) -> Result<Block> {
        let lbrace = self.expect_punct('{')?;
        let mut items = Vec::new();
        while !self.current().is_punct('}') {
            if self.is_eof() {
                return Err(self.error("unexpected end of input inside a block"));
            }
            items.push(self.parse_terminated_item()?);
        }
        let rbrace = self.expect_punct('}')?;
        Ok(Block {
            lbrace,
            items,
            rbrace,
        })
    }

    fn parse_if_config(&mut self) -> Result<IfConfigDecl> {
        let mut clauses = Vec::new();
        loop {
            let directive = self.advance();
            let condition = if directive.text == "#else" {
                None
            } else {
                let run = self.parse_run(RunCtx::directive_condition())?;
                if run.pieces.is_empty() {
                    return Err(self.error("expected a compilation condition"));
                }
                Some(run)
            };
            let mut items = Vec::new();
            loop {
                let current = self.current();
                if current.kind == LeafKind::Directive && current.text != "#if" {
                    break;
                }
                if self.is_eof() {
                    return Err(self.error("unterminated #if; expected #endif"));
                }
                items.push(self.parse_terminated_item()?);
            }
            clauses.push(IfConfigClause {
                directive,
                condition,
                items,
            });
            let next = self.current();
            if next.text == "#endif" {
                let endif = self.advance();
                return Ok(IfConfigDecl { clauses, endif });
            }
            // #elseif or #else begins the next clause.
            if next.text != "#elseif" && next.text != "#else" {
                return Err(self.error("expected #elseif, #else, or #endif"));
            }
        }
    }
}

/// Re-attach a dropped semicolon's comments to the declaration it followed.
fn attach_semi_to_decl(decl: &mut Decl, semi: Leaf) {
    let mut trivia: Vec<TriviaPiece> = semi
        .leading
        .into_iter()
        .filter(|t| !matches!(t, TriviaPiece::Newlines(_)))
        .collect();
    trivia.extend(semi.trailing);
    if trivia.is_empty() {
        return;
    }
    let mut count = 0usize;
    for_each_decl_leaf_mut(decl, &mut |_| count += 1);
    let mut index = 0usize;
    for_each_decl_leaf_mut(decl, &mut |leaf| {
        index += 1;
        if index == count {
            leaf.trailing.extend(trivia.iter().cloned());
        }
    });
}
