//! Symbol catalog: the names an analyzed document may import.
//!
//! The catalog partitions known symbols into three disjoint kinds (types,
//! free functions, constants). How the names are discovered is up to the
//! caller: anything implementing [`SymbolCatalogProvider`] can feed the
//! pipeline. Two providers ship with the crate:
//!
//! - [`Manifest`] - an explicit, line-oriented list of names
//! - [`DeclarationIndexer`] - a pre-pass that indexes declared symbols from
//!   source text
//!
//! A [`CatalogCache`] snapshots a provider once and serves the snapshot for
//! the rest of the process until it is explicitly reset.

mod cache;
mod indexer;
mod manifest;

pub use cache::CatalogCache;
pub use indexer::{DeclarationIndexer, index_declarations};
pub use manifest::Manifest;

use std::fmt;

use indexmap::IndexSet;
use smol_str::SmolStr;

// ============================================================================
// SYMBOL KINDS
// ============================================================================

/// The kind of an importable symbol.
///
/// The declaration order is the order in which kinds are reported and
/// rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(rename_all = "lowercase"))]
pub enum SymbolKind {
    /// Classes, interfaces, traits and enums.
    Type,
    /// Free (non-member) functions.
    Function,
    /// Global constants.
    Constant,
}

impl SymbolKind {
    /// All kinds, in reporting order.
    pub const ALL: [SymbolKind; 3] = [SymbolKind::Type, SymbolKind::Function, SymbolKind::Constant];

    /// Label used in report headers.
    pub fn label(self) -> &'static str {
        match self {
            SymbolKind::Type => "class",
            SymbolKind::Function => "function",
            SymbolKind::Constant => "constant",
        }
    }

    /// Keyword inserted between `use` and the name in an import statement.
    pub fn import_keyword(self) -> Option<&'static str> {
        match self {
            SymbolKind::Type => None,
            SymbolKind::Function => Some("function"),
            SymbolKind::Constant => Some("const"),
        }
    }

    /// Render the import statement for `name`.
    pub fn render_import(self, name: &str) -> String {
        match self.import_keyword() {
            Some(keyword) => format!("use {} {};", keyword, name),
            None => format!("use {};", name),
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named symbol of a given kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolName {
    pub kind: SymbolKind,
    pub name: SmolStr,
}

impl SymbolName {
    pub fn new(kind: SymbolKind, name: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for SymbolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

// ============================================================================
// PROVIDER CONTRACT
// ============================================================================

/// Supplies candidate symbol names to the pipeline.
///
/// Implementations must return each name at most once per kind. The order
/// of the returned names is preserved by the snapshot taken in
/// [`SymbolCatalog::from_provider`].
pub trait SymbolCatalogProvider {
    /// Known class, interface, trait and enum names.
    fn list_types(&self) -> Vec<SmolStr>;
    /// Known free function names.
    fn list_functions(&self) -> Vec<SmolStr>;
    /// Known constant names.
    fn list_constants(&self) -> Vec<SmolStr>;
    /// Whether `name` is a defined constant.
    fn is_defined_constant(&self, name: &str) -> bool;
}

// ============================================================================
// SYMBOL CATALOG
// ============================================================================

/// An immutable, ordered set of known names per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolCatalog {
    types: IndexSet<SmolStr>,
    functions: IndexSet<SmolStr>,
    constants: IndexSet<SmolStr>,
}

impl SymbolCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from name lists. Repeated names are kept once.
    pub fn from_names<T, F, C>(types: T, functions: F, constants: C) -> Self
    where
        T: IntoIterator,
        T::Item: Into<SmolStr>,
        F: IntoIterator,
        F::Item: Into<SmolStr>,
        C: IntoIterator,
        C::Item: Into<SmolStr>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
            functions: functions.into_iter().map(Into::into).collect(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    /// Snapshot a provider.
    ///
    /// Listed constants the provider does not confirm as defined are dropped
    /// here, so the snapshot answers `is_defined_constant` on its own.
    pub fn from_provider(provider: &dyn SymbolCatalogProvider) -> Self {
        let constants = provider
            .list_constants()
            .into_iter()
            .filter(|name| provider.is_defined_constant(name))
            .collect();

        Self {
            types: provider.list_types().into_iter().collect(),
            functions: provider.list_functions().into_iter().collect(),
            constants,
        }
    }

    /// Collect symbols of mixed kinds, keeping first-seen order per kind.
    pub fn from_symbols(symbols: impl IntoIterator<Item = SymbolName>) -> Self {
        let mut catalog = Self::new();
        for symbol in symbols {
            catalog.insert(symbol);
        }
        catalog
    }

    fn insert(&mut self, symbol: SymbolName) -> bool {
        self.names_mut(symbol.kind).insert(symbol.name)
    }

    /// Merge another catalog into this one, keeping existing order first.
    pub fn extend(&mut self, other: SymbolCatalog) {
        self.types.extend(other.types);
        self.functions.extend(other.functions);
        self.constants.extend(other.constants);
    }

    /// Names of one kind, in catalog order.
    pub fn names(&self, kind: SymbolKind) -> &IndexSet<SmolStr> {
        match kind {
            SymbolKind::Type => &self.types,
            SymbolKind::Function => &self.functions,
            SymbolKind::Constant => &self.constants,
        }
    }

    fn names_mut(&mut self, kind: SymbolKind) -> &mut IndexSet<SmolStr> {
        match kind {
            SymbolKind::Type => &mut self.types,
            SymbolKind::Function => &mut self.functions,
            SymbolKind::Constant => &mut self.constants,
        }
    }

    /// Whether the catalog knows `name` as a symbol of `kind`.
    pub fn contains(&self, kind: SymbolKind, name: &str) -> bool {
        self.names(kind).contains(name)
    }

    /// Iterate over all symbols, kind by kind.
    pub fn iter(&self) -> impl Iterator<Item = SymbolName> + '_ {
        SymbolKind::ALL.into_iter().flat_map(move |kind| {
            self.names(kind)
                .iter()
                .map(move |name| SymbolName::new(kind, name.clone()))
        })
    }

    /// Total number of names across all kinds.
    pub fn len(&self) -> usize {
        self.types.len() + self.functions.len() + self.constants.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SymbolCatalogProvider for SymbolCatalog {
    fn list_types(&self) -> Vec<SmolStr> {
        self.types.iter().cloned().collect()
    }

    fn list_functions(&self) -> Vec<SmolStr> {
        self.functions.iter().cloned().collect()
    }

    fn list_constants(&self) -> Vec<SmolStr> {
        self.constants.iter().cloned().collect()
    }

    fn is_defined_constant(&self, name: &str) -> bool {
        self.constants.contains(name)
    }
}
