//! Declaration indexer.
//!
//! Builds a catalog from source text instead of runtime reflection: every
//! file of a project is tokenized and its top-level declarations are
//! recorded, qualified with the namespace in effect.
//!
//! Recognized forms:
//!
//! ```text
//! namespace App\Models;            namespace App\Models { ... }
//! class|interface|trait|enum NAME
//! function NAME(                   (not inside a type body)
//! const NAME = ..., OTHER = ...;   (not inside a type body)
//! ```

use smol_str::SmolStr;

use super::{SymbolCatalog, SymbolCatalogProvider, SymbolKind, SymbolName};
use crate::project::FileSet;
use crate::syntax::{Token, TokenKind, strip_comments, tokenize};

const TYPE_DECLARATIONS: &[&str] = &["class", "interface", "trait", "enum"];

/// Accumulates declared symbols over any number of sources.
#[derive(Clone, Debug, Default)]
pub struct DeclarationIndexer {
    catalog: SymbolCatalog,
    sources: usize,
}

impl DeclarationIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index one source text. Returns how many new symbols it contributed.
    pub fn index_source(&mut self, text: &str) -> usize {
        let before = self.catalog.len();
        for symbol in index_declarations(text) {
            self.catalog.insert(symbol);
        }
        self.sources += 1;

        let added = self.catalog.len() - before;
        tracing::trace!(added, total = self.catalog.len(), "indexed source");
        added
    }

    /// Index every document buffered in `files`, in registration order.
    pub fn index_files(&mut self, files: &FileSet) -> usize {
        let mut added = 0;
        for file in files.files() {
            if let Some(text) = files.contents(file) {
                added += self.index_source(&text);
            }
        }
        tracing::debug!(files = files.len(), added, "indexed file set");
        added
    }

    /// Number of sources indexed so far.
    pub fn sources(&self) -> usize {
        self.sources
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn into_catalog(self) -> SymbolCatalog {
        self.catalog
    }
}

impl SymbolCatalogProvider for DeclarationIndexer {
    fn list_types(&self) -> Vec<SmolStr> {
        self.catalog.list_types()
    }

    fn list_functions(&self) -> Vec<SmolStr> {
        self.catalog.list_functions()
    }

    fn list_constants(&self) -> Vec<SmolStr> {
        self.catalog.list_constants()
    }

    fn is_defined_constant(&self, name: &str) -> bool {
        self.catalog.is_defined_constant(name)
    }
}

/// The top-level declarations of one source text, in source order.
pub fn index_declarations(text: &str) -> Vec<SymbolName> {
    let cleaned = strip_comments(text);
    let tokens: Vec<Token<'_>> = tokenize(&cleaned)
        .into_iter()
        .filter(|t| t.kind != TokenKind::Whitespace)
        .collect();

    let mut found = Vec::new();
    let mut namespace = String::new();
    let mut depth = 0usize;
    // Brace depth of code directly inside the current namespace.
    let mut top = 0usize;

    let qualify = |namespace: &str, name: &str| -> SmolStr {
        if namespace.is_empty() {
            SmolStr::new(name)
        } else {
            SmolStr::from(format!("{}\\{}", namespace, name))
        }
    };

    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        let prev = i.checked_sub(1).map(|p| &tokens[p]);
        let next = tokens.get(i + 1);

        match token.kind {
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => {
                depth = depth.saturating_sub(1);
                if depth < top {
                    top = 0;
                    namespace.clear();
                }
            }
            TokenKind::Name if depth == top && !is_member_context(prev) => {
                if token.is_keyword("namespace") {
                    if let Some(name) = next.filter(|n| n.kind == TokenKind::Name) {
                        namespace = name.unqualified().to_string();
                        if tokens.get(i + 2).is_some_and(|t| t.kind == TokenKind::LBrace) {
                            top = depth + 1;
                        }
                        i += 1;
                    } else if next.is_some_and(|n| n.kind == TokenKind::LBrace) {
                        // Global namespace block.
                        namespace.clear();
                        top = depth + 1;
                    }
                } else if TYPE_DECLARATIONS.iter().any(|kw| token.is_keyword(kw)) {
                    if let Some(name) = next.filter(|n| n.kind == TokenKind::Name) {
                        found.push(SymbolName::new(
                            SymbolKind::Type,
                            qualify(&namespace, name.unqualified()),
                        ));
                        i += 1;
                    }
                } else if token.is_keyword("function") {
                    let mut j = i + 1;
                    if tokens.get(j).is_some_and(|t| t.kind == TokenKind::Amp) {
                        j += 1;
                    }
                    let name = tokens.get(j).filter(|t| t.kind == TokenKind::Name);
                    let opens_call = tokens.get(j + 1).is_some_and(|t| t.kind == TokenKind::LParen);
                    if let (Some(name), true) = (name, opens_call) {
                        found.push(SymbolName::new(
                            SymbolKind::Function,
                            qualify(&namespace, name.unqualified()),
                        ));
                        i = j;
                    }
                } else if token.is_keyword("const") {
                    let (names, end) = const_names(&tokens, i + 1);
                    found.extend(names.into_iter().map(|name| {
                        SymbolName::new(SymbolKind::Constant, qualify(&namespace, name))
                    }));
                    i = end;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }

    found
}

/// Whether a keyword-looking name is really a member or class constant
/// access (`Foo::class`, `$a->function`).
fn is_member_context(prev: Option<&Token<'_>>) -> bool {
    prev.is_some_and(|p| {
        matches!(
            p.kind,
            TokenKind::DoubleColon | TokenKind::Arrow | TokenKind::NullsafeArrow
        )
    })
}

/// Names of a `const A = ..., B = ...;` list starting at `start`.
///
/// Returns the names and the index just past the terminating `;`.
fn const_names<'t>(tokens: &[Token<'t>], start: usize) -> (Vec<&'t str>, usize) {
    let mut names = Vec::new();
    let mut nesting = 0usize;
    let mut expect_name = true;
    let mut i = start;

    while let Some(token) = tokens.get(i) {
        match token.kind {
            TokenKind::Semicolon if nesting == 0 => return (names, i + 1),
            TokenKind::LParen | TokenKind::LBracket => nesting += 1,
            TokenKind::RParen => nesting = nesting.saturating_sub(1),
            // `{` would mean this is not a constant list after all.
            TokenKind::LBrace | TokenKind::RBrace => return (names, i),
            TokenKind::Comma if nesting == 0 => expect_name = true,
            TokenKind::Name if expect_name => {
                if tokens.get(i + 1).is_some_and(|t| t.kind == TokenKind::Eq) {
                    names.push(token.unqualified());
                    expect_name = false;
                }
            }
            TokenKind::Other if token.text == "]" => nesting = nesting.saturating_sub(1),
            _ => {}
        }
        i += 1;
    }

    (names, i)
}
