//! Namespace/classmap mode: import blocks for a whole namespace.
//!
//! Given a namespace prefix and a flat list of fully qualified class names,
//! the [`UseBuilder`] selects the classes under that prefix and renders them
//! one statement per line and as a single grouped statement.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::{natural_cmp, natural_sort};
use crate::catalog::{SymbolCatalog, SymbolKind};
use crate::config::Exclusions;
use crate::error::{Result, UsedError};

const GROUP_INDENT: &str = "    ";

/// Trim leading and trailing namespace separators.
pub fn normalize_namespace(namespace: &str) -> &str {
    namespace.trim_matches('\\')
}

// ============================================================================
// CLASS MAP
// ============================================================================

/// Fully qualified class name → backing file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassMap {
    entries: IndexMap<SmolStr, PathBuf>,
}

impl ClassMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<N, P>(entries: impl IntoIterator<Item = (N, P)>) -> Self
    where
        N: Into<SmolStr>,
        P: Into<PathBuf>,
    {
        let mut map = Self::new();
        for (class, path) in entries {
            map.insert(class, path);
        }
        map
    }

    /// Add or replace an entry. A leading `\` on the class is dropped.
    pub fn insert(&mut self, class: impl Into<SmolStr>, path: impl Into<PathBuf>) {
        let class: SmolStr = class.into();
        self.entries
            .insert(SmolStr::new(class.trim_start_matches('\\')), path.into());
    }

    /// The file backing `class`.
    pub fn resolve(&self, class: &str) -> Result<&Path> {
        let key = class.trim_start_matches('\\');
        if key.is_empty() {
            return Err(UsedError::unresolvable(class, "empty class name"));
        }
        self.entries
            .get(key)
            .map(PathBuf::as_path)
            .ok_or_else(|| UsedError::unresolvable(class, "not in classmap"))
    }

    /// Class names, in insertion order.
    pub fn classes(&self) -> impl Iterator<Item = &SmolStr> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &PathBuf)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// NAMESPACE TREE
// ============================================================================

/// Top-level namespace segment → qualified names below it.
///
/// Both levels are naturally sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(transparent))]
pub struct NamespaceTree {
    groups: IndexMap<SmolStr, Vec<SmolStr>>,
}

impl NamespaceTree {
    pub fn from_classmap(map: &ClassMap) -> Self {
        Self::from_names(map.classes().cloned())
    }

    pub fn from_names(names: impl IntoIterator<Item = SmolStr>) -> Self {
        let mut groups: IndexMap<SmolStr, Vec<SmolStr>> = IndexMap::new();
        for name in names {
            let top = name.split('\\').next().unwrap_or_default();
            if top.is_empty() {
                continue;
            }
            groups.entry(SmolStr::new(top)).or_default().push(name);
        }

        groups.sort_by(|a, _, b, _| natural_cmp(a, b));
        for members in groups.values_mut() {
            natural_sort(members);
            members.dedup();
        }
        Self { groups }
    }

    /// Top-level segments, naturally sorted.
    pub fn top_level(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(SmolStr::as_str)
    }

    /// Members under one top-level segment.
    pub fn members(&self, top: &str) -> &[SmolStr] {
        self.groups.get(top).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

// ============================================================================
// RENDERING
// ============================================================================

/// One `use` statement per class, newline separated.
pub fn render_use_lines(classes: &[SmolStr]) -> String {
    classes
        .iter()
        .map(|class| SymbolKind::Type.render_import(class))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A single grouped statement for classes under `namespace`:
///
/// ```text
/// use App\Models\{
///     Order,
///     User
/// }; // 2
/// ```
///
/// Without a namespace there is nothing to factor out and the classes are
/// rendered one per line.
pub fn render_grouped(namespace: &str, classes: &[SmolStr]) -> String {
    let namespace = normalize_namespace(namespace);
    if namespace.is_empty() {
        return render_use_lines(classes);
    }
    if classes.is_empty() {
        return String::new();
    }

    let members: Vec<String> = classes
        .iter()
        .map(|class| {
            let member = class
                .strip_prefix(namespace)
                .and_then(|rest| rest.strip_prefix('\\'))
                .unwrap_or(class.as_str());
            format!("{}{}", GROUP_INDENT, member)
        })
        .collect();

    format!(
        "use {}\\{{\n{}\n}}; // {}",
        namespace,
        members.join(",\n"),
        classes.len()
    )
}

// ============================================================================
// USE BUILDER
// ============================================================================

/// Result of namespace mode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct UseBlock {
    /// The normalized namespace prefix.
    pub namespace: String,
    /// Picker data derived from the whole classmap.
    pub namespace_tree: NamespaceTree,
    /// Classes selected under the namespace, naturally sorted.
    pub class_map: Vec<SmolStr>,
    #[cfg_attr(feature = "interchange", serde(rename = "use"))]
    pub use_lines: String,
    pub use_nested: String,
    /// One statement per non-excluded class of the whole classmap.
    pub classmap_use: String,
}

/// Selects and renders the classes under one namespace.
#[derive(Clone, Debug)]
pub struct UseBuilder<'a> {
    namespace: String,
    exclusions: &'a Exclusions,
}

impl<'a> UseBuilder<'a> {
    pub fn new(namespace: &str, exclusions: &'a Exclusions) -> Self {
        Self {
            namespace: normalize_namespace(namespace).to_string(),
            exclusions,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn is_excluded(&self, class: &str) -> bool {
        self.exclusions.contains(SymbolKind::Type, class)
    }

    /// Classes below the namespace that are not excluded, naturally sorted.
    ///
    /// An empty namespace selects every class.
    pub fn select<'n>(&self, classes: impl IntoIterator<Item = &'n SmolStr>) -> Vec<SmolStr> {
        let prefix = format!("{}\\", self.namespace);
        let mut selected: Vec<SmolStr> = classes
            .into_iter()
            .map(|class| SmolStr::new(class.trim_start_matches('\\')))
            .filter(|class| self.namespace.is_empty() || class.starts_with(prefix.as_str()))
            .filter(|class| !self.is_excluded(class))
            .collect();

        natural_sort(&mut selected);
        selected.dedup();
        selected
    }

    /// Build the block from a classmap.
    pub fn build(&self, map: &ClassMap) -> UseBlock {
        let selected = self.select(map.classes());

        let mut all: Vec<SmolStr> = map
            .classes()
            .filter(|class| !self.is_excluded(class))
            .cloned()
            .collect();
        natural_sort(&mut all);

        let block = UseBlock {
            namespace: self.namespace.clone(),
            namespace_tree: NamespaceTree::from_classmap(map),
            use_lines: render_use_lines(&selected),
            use_nested: render_grouped(&self.namespace, &selected),
            classmap_use: render_use_lines(&all),
            class_map: selected,
        };

        tracing::debug!(
            namespace = %block.namespace,
            selected = block.class_map.len(),
            classes = map.len(),
            "built use block"
        );
        block
    }

    /// Build the block from the type names of a catalog.
    ///
    /// Catalog names carry no backing file, so every entry maps to an empty
    /// path.
    pub fn build_from_catalog(&self, catalog: &SymbolCatalog) -> UseBlock {
        let map = ClassMap::from_entries(
            catalog
                .names(SymbolKind::Type)
                .iter()
                .map(|name| (name.clone(), PathBuf::new())),
        );
        self.build(&map)
    }
}
