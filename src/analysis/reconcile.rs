//! Reconciliation of generated imports with the ones already declared.
//!
//! The engine never drops an import silently and never fails:
//!
//! 1. Declared lines that the generator did not reproduce verbatim are
//!    *missed* and kept as they are, ahead of the generated block.
//! 2. A generated statement whose name is the tail of a missed line of the
//!    same kind (`Bar` vs `use Foo\Bar;`) is a *possible duplicate*; the
//!    declared line wins and the statement becomes a warning.
//! 3. A generated statement found verbatim in the raw text is *already
//!    present*; it is still emitted (optionally commented out).
//! 4. Everything else is *new*.

use rustc_hash::FxHashSet;

use super::ImportStatement;
use super::scan::{ExistingImportLine, ExistingImports};
use crate::catalog::SymbolKind;
use crate::config::Exclusions;

/// Classification of a generated statement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub enum ImportState {
    New,
    AlreadyPresent,
    PossibleDuplicate {
        /// The declared line that already covers this symbol.
        conflict: ExistingImportLine,
    },
}

/// A generated statement with its classification.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct ReconciledImport {
    pub statement: ImportStatement,
    pub state: ImportState,
}

impl ReconciledImport {
    /// Whether the statement belongs in the generated block.
    pub fn is_emitted(&self) -> bool {
        !matches!(self.state, ImportState::PossibleDuplicate { .. })
    }
}

/// The outcome of reconciling one document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Reconciliation {
    /// Every generated statement, in generated order.
    pub imports: Vec<ReconciledImport>,
    /// Declared lines the generator did not reproduce, in file order.
    pub missed: Vec<ExistingImportLine>,
    /// Declared lines importing an excluded name.
    pub excluded: Vec<ExistingImportLine>,
    /// Number of distinct declared lines taken into account (excluded ones
    /// are not).
    pub declared: usize,
    /// Emitted statements whose text is one of the declared lines.
    pub covered: usize,
}

impl Reconciliation {
    /// Statements of the generated block, in order.
    pub fn emitted(&self) -> impl Iterator<Item = &ReconciledImport> {
        self.imports.iter().filter(|import| import.is_emitted())
    }

    /// Statements withdrawn in favour of a declared line.
    pub fn duplicates(&self) -> impl Iterator<Item = &ReconciledImport> {
        self.imports.iter().filter(|import| !import.is_emitted())
    }

    pub fn new_count(&self) -> usize {
        self.count(|state| matches!(state, ImportState::New))
    }

    /// Generated statements already in the document.
    pub fn defined(&self) -> usize {
        self.count(|state| matches!(state, ImportState::AlreadyPresent))
    }

    pub fn duplicate_count(&self) -> usize {
        self.count(|state| matches!(state, ImportState::PossibleDuplicate { .. }))
    }

    fn count(&self, predicate: impl Fn(&ImportState) -> bool) -> usize {
        self.imports.iter().filter(|i| predicate(&i.state)).count()
    }

    /// Declared lines carried over as they are.
    pub fn taken(&self) -> usize {
        self.missed.len()
    }

    /// New plus already-present statements.
    pub fn total(&self) -> usize {
        self.new_count() + self.defined()
    }

    /// Emitted statements of one kind.
    pub fn kind_count(&self, kind: SymbolKind) -> usize {
        self.emitted()
            .filter(|import| import.statement.kind() == kind)
            .count()
    }

    /// Whether every import the document needs is already declared.
    ///
    /// Never true while a statement is still new, or while a statement is
    /// only present outside the declared lines (inside a comment, say).
    pub fn is_complete(&self) -> bool {
        self.declared > 0
            && self.new_count() == 0
            && self.covered == self.total()
            && self.taken() + self.total() == self.declared
    }
}

/// Classify generated statements against the declared imports.
///
/// `generated` is expected in final output order (see
/// [`sort_statements`](super::sort_statements)); the order is preserved.
pub fn reconcile(
    generated: &[ImportStatement],
    existing: &ExistingImports,
    raw: &str,
    exclusions: &Exclusions,
) -> Reconciliation {
    let (excluded, declared): (Vec<_>, Vec<_>) = existing
        .iter()
        .cloned()
        .partition(|line| exclusions.contains(line.kind, &line.qualified_name));

    // A line repeated verbatim counts once, at its first occurrence.
    let mut seen_lines: FxHashSet<String> = FxHashSet::default();
    let declared: Vec<ExistingImportLine> = declared
        .into_iter()
        .filter(|line| seen_lines.insert(line.text.clone()))
        .collect();

    let generated_texts: FxHashSet<&str> = generated.iter().map(|st| st.text()).collect();
    let missed: Vec<ExistingImportLine> = declared
        .iter()
        .filter(|line| !generated_texts.contains(line.text.as_str()))
        .cloned()
        .collect();

    let imports: Vec<ReconciledImport> = generated
        .iter()
        .map(|statement| {
            let conflict = missed.iter().find(|line| {
                line.kind == statement.kind() && line.tail_matches(statement.bare_name())
            });

            let state = match conflict {
                Some(line) => {
                    tracing::warn!(
                        statement = statement.text(),
                        existing = line.text.as_str(),
                        line = line.line,
                        "possible duplicate import"
                    );
                    ImportState::PossibleDuplicate {
                        conflict: line.clone(),
                    }
                }
                None if raw.contains(statement.text()) => ImportState::AlreadyPresent,
                None => ImportState::New,
            };

            ReconciledImport {
                statement: statement.clone(),
                state,
            }
        })
        .collect();

    let covered = imports
        .iter()
        .filter(|import| import.is_emitted() && seen_lines.contains(import.statement.text()))
        .count();

    let reconciliation = Reconciliation {
        imports,
        missed,
        excluded,
        declared: declared.len(),
        covered,
    };

    tracing::debug!(
        new = reconciliation.new_count(),
        defined = reconciliation.defined(),
        duplicates = reconciliation.duplicate_count(),
        taken = reconciliation.taken(),
        "reconciled imports"
    );
    reconciliation
}
