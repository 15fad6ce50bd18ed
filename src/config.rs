//! Pipeline configuration.
//!
//! ```
//! use getused::{SymbolKind, UsedConfig};
//!
//! let config = UsedConfig::default()
//!     .with_comment_out_existing(false)
//!     .exclude(SymbolKind::Function, "dump");
//! assert!(config.exclusions().contains(SymbolKind::Function, "__construct"));
//! ```

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::catalog::SymbolKind;

/// Method name that is never reported as a free function.
pub const CONSTRUCTOR_NAME: &str = "__construct";

/// Names that must never be generated, per kind.
///
/// Matching is exact and case-sensitive.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Exclusions {
    types: FxHashSet<SmolStr>,
    functions: FxHashSet<SmolStr>,
    constants: FxHashSet<SmolStr>,
}

impl Default for Exclusions {
    /// The built-in set: only the constructor method name.
    fn default() -> Self {
        let mut exclusions = Self::none();
        exclusions.insert(SymbolKind::Function, CONSTRUCTOR_NAME);
        exclusions
    }
}

impl Exclusions {
    /// An empty set, without the built-in constructor exclusion.
    pub fn none() -> Self {
        Self {
            types: FxHashSet::default(),
            functions: FxHashSet::default(),
            constants: FxHashSet::default(),
        }
    }

    fn set(&self, kind: SymbolKind) -> &FxHashSet<SmolStr> {
        match kind {
            SymbolKind::Type => &self.types,
            SymbolKind::Function => &self.functions,
            SymbolKind::Constant => &self.constants,
        }
    }

    fn set_mut(&mut self, kind: SymbolKind) -> &mut FxHashSet<SmolStr> {
        match kind {
            SymbolKind::Type => &mut self.types,
            SymbolKind::Function => &mut self.functions,
            SymbolKind::Constant => &mut self.constants,
        }
    }

    /// Add a name. Returns false if it was already excluded.
    pub fn insert(&mut self, kind: SymbolKind, name: impl Into<SmolStr>) -> bool {
        self.set_mut(kind).insert(name.into())
    }

    pub fn contains(&self, kind: SymbolKind, name: &str) -> bool {
        self.set(kind).contains(name)
    }

    /// Merge another set into this one.
    pub fn extend(&mut self, other: &Exclusions) {
        for kind in SymbolKind::ALL {
            self.set_mut(kind).extend(other.set(kind).iter().cloned());
        }
    }

    pub fn len(&self) -> usize {
        self.types.len() + self.functions.len() + self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which form of the document the existing-import scanner reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub enum ScanSource {
    /// The comment-stripped text; commented-out imports are invisible.
    #[default]
    Cleaned,
    /// The text as supplied.
    Raw,
}

/// Options recognized by the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct UsedConfig {
    /// Names never generated.
    pub exclude: Exclusions,
    /// Prefix already-present imports with a comment marker.
    pub comment_out_existing: bool,
    /// Strip block and line comments before detection.
    pub strip_doc_comments: bool,
    /// Text the existing-import scanner reads.
    pub scan_source: ScanSource,
}

impl Default for UsedConfig {
    fn default() -> Self {
        Self {
            exclude: Exclusions::default(),
            comment_out_existing: true,
            strip_doc_comments: true,
            scan_source: ScanSource::Cleaned,
        }
    }
}

impl UsedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude one more name.
    pub fn exclude(mut self, kind: SymbolKind, name: impl Into<SmolStr>) -> Self {
        self.exclude.insert(kind, name);
        self
    }

    /// Merge additional exclusions into the configured ones.
    pub fn with_exclusions(mut self, exclusions: &Exclusions) -> Self {
        self.exclude.extend(exclusions);
        self
    }

    pub fn with_comment_out_existing(mut self, enabled: bool) -> Self {
        self.comment_out_existing = enabled;
        self
    }

    pub fn with_strip_doc_comments(mut self, enabled: bool) -> Self {
        self.strip_doc_comments = enabled;
        self
    }

    pub fn with_scan_source(mut self, source: ScanSource) -> Self {
        self.scan_source = source;
        self
    }

    pub fn exclusions(&self) -> &Exclusions {
        &self.exclude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UsedConfig::default();
        assert!(config.comment_out_existing);
        assert!(config.strip_doc_comments);
        assert_eq!(config.scan_source, ScanSource::Cleaned);
        assert!(config.exclusions().contains(SymbolKind::Function, "__construct"));
        assert_eq!(config.exclusions().len(), 1);
    }

    #[test]
    fn test_exclusions_are_per_kind() {
        let config = UsedConfig::default().exclude(SymbolKind::Type, "Closure");
        assert!(config.exclusions().contains(SymbolKind::Type, "Closure"));
        assert!(!config.exclusions().contains(SymbolKind::Function, "Closure"));
        assert!(!config.exclusions().contains(SymbolKind::Type, "closure"));
    }

    #[test]
    fn test_with_exclusions_merges() {
        let mut extra = Exclusions::none();
        extra.insert(SymbolKind::Constant, "E_ALL");

        let config = UsedConfig::default().with_exclusions(&extra);
        assert!(config.exclusions().contains(SymbolKind::Constant, "E_ALL"));
        assert!(config.exclusions().contains(SymbolKind::Function, "__construct"));
    }
}
