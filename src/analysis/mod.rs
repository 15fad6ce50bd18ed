//! The analysis stages: Detect → Scan → Reconcile → Format.
//!
//! ## Module Structure (pipeline order)
//!
//! ```text
//! detect     → which catalog symbols the cleaned text references
//!   ↓
//! scan       → import lines the document already declares
//!   ↓
//! reconcile  → New / AlreadyPresent / PossibleDuplicate / Missed
//!   ↓
//! format     → annotated text block
//! ```
//!
//! Every stage takes its inputs by reference and returns fresh collections;
//! nothing is mutated in place between stages.

pub mod detect;
pub mod format;
pub mod reconcile;
pub mod scan;

pub use detect::{UsageDetector, UsageRecord};
pub use format::{COMMENT_MARKER, FormatOptions, USE_IS_COMPLETE, render};
pub use reconcile::{ImportState, Reconciliation, ReconciledImport, reconcile};
pub use scan::{ExistingImportLine, ExistingImports, scan_existing_imports};

use std::cmp::Ordering;
use std::fmt;

use rustc_hash::FxHashSet;

use crate::base::natural_cmp;
use crate::catalog::{SymbolKind, SymbolName};

/// A rendered import statement for one symbol.
///
/// Equality and hashing follow the rendered text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportStatement {
    symbol: SymbolName,
    text: String,
}

impl ImportStatement {
    pub fn new(symbol: SymbolName) -> Self {
        let text = symbol.kind.render_import(&symbol.name);
        Self { symbol, text }
    }

    /// Build the sorted, duplicate-free statements for matched usages.
    pub fn from_usages<'a>(usages: impl IntoIterator<Item = &'a UsageRecord>) -> Vec<Self> {
        let mut seen = FxHashSet::default();
        let mut statements: Vec<Self> = usages
            .into_iter()
            .filter(|usage| usage.matched)
            .filter(|usage| seen.insert(usage.symbol.clone()))
            .map(|usage| Self::new(usage.symbol.clone()))
            .collect();
        sort_statements(&mut statements);
        statements
    }

    pub fn symbol(&self) -> &SymbolName {
        &self.symbol
    }

    pub fn kind(&self) -> SymbolKind {
        self.symbol.kind
    }

    /// The imported name without keyword prefix or terminator.
    pub fn bare_name(&self) -> &str {
        &self.symbol.name
    }

    /// The statement as it appears in source, e.g. `use function trim;`.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ImportStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Order statements by kind, then naturally by name.
pub fn compare_statements(a: &ImportStatement, b: &ImportStatement) -> Ordering {
    a.kind()
        .cmp(&b.kind())
        .then_with(|| natural_cmp(a.bare_name(), b.bare_name()))
}

/// Stable sort by [`compare_statements`].
pub fn sort_statements(statements: &mut [ImportStatement]) {
    statements.sort_by(compare_statements);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(kind: SymbolKind, name: &str) -> UsageRecord {
        UsageRecord {
            symbol: SymbolName::new(kind, name),
            matched: true,
            first_seen: None,
        }
    }

    #[test]
    fn test_statement_text() {
        let st = ImportStatement::new(SymbolName::new(SymbolKind::Function, "array_map"));
        assert_eq!(st.text(), "use function array_map;");
        assert_eq!(st.bare_name(), "array_map");
    }

    #[test]
    fn test_from_usages_sorts_and_deduplicates() {
        let usages = vec![
            usage(SymbolKind::Constant, "E_ALL"),
            usage(SymbolKind::Type, "Item10"),
            usage(SymbolKind::Function, "trim"),
            usage(SymbolKind::Type, "Item2"),
            usage(SymbolKind::Type, "Item2"),
            UsageRecord {
                matched: false,
                ..usage(SymbolKind::Type, "Unused")
            },
        ];

        let texts: Vec<String> = ImportStatement::from_usages(&usages)
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(
            texts,
            vec![
                "use Item2;",
                "use Item10;",
                "use function trim;",
                "use const E_ALL;",
            ]
        );
    }
}
