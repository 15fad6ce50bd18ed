//! Process-wide catalog snapshot.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{SymbolCatalog, SymbolCatalogProvider};

/// Holds the catalog snapshot for repeated pipeline runs.
///
/// The first [`get_or_populate`](Self::get_or_populate) call snapshots the
/// provider; every later call returns the same `Arc` without consulting the
/// provider again. The snapshot goes stale if the provider's world changes,
/// so callers that need fresh names must call [`reset`](Self::reset).
///
/// Thread-safe via internal locking.
#[derive(Default)]
pub struct CatalogCache {
    slot: RwLock<Option<Arc<SymbolCatalog>>>,
}

impl CatalogCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache that is already populated.
    pub fn with_catalog(catalog: SymbolCatalog) -> Self {
        Self {
            slot: RwLock::new(Some(Arc::new(catalog))),
        }
    }

    /// Return the cached catalog, snapshotting `provider` on first use.
    pub fn get_or_populate(&self, provider: &dyn SymbolCatalogProvider) -> Arc<SymbolCatalog> {
        // Fast path: already populated (read lock)
        if let Some(catalog) = self.slot.read().as_ref() {
            return Arc::clone(catalog);
        }

        let mut slot = self.slot.write();

        // Another caller may have populated it while we waited
        if let Some(catalog) = slot.as_ref() {
            return Arc::clone(catalog);
        }

        let catalog = Arc::new(SymbolCatalog::from_provider(provider));
        tracing::debug!(
            types = catalog.names(super::SymbolKind::Type).len(),
            functions = catalog.names(super::SymbolKind::Function).len(),
            constants = catalog.names(super::SymbolKind::Constant).len(),
            "populated symbol catalog cache"
        );
        *slot = Some(Arc::clone(&catalog));
        catalog
    }

    /// The cached catalog, if populated.
    pub fn get(&self) -> Option<Arc<SymbolCatalog>> {
        self.slot.read().clone()
    }

    /// Check if a snapshot is held.
    pub fn is_populated(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Drop the snapshot; the next access repopulates it.
    pub fn reset(&self) {
        if self.slot.write().take().is_some() {
            tracing::debug!("symbol catalog cache reset");
        }
    }
}

impl fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.read();
        f.debug_struct("CatalogCache")
            .field("populated", &slot.is_some())
            .field("symbols", &slot.as_ref().map(|c| c.len()).unwrap_or(0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use smol_str::SmolStr;

    use super::*;

    /// Counts how often the cache consults it.
    #[derive(Default)]
    struct CountingProvider {
        calls: Cell<usize>,
        types: Vec<&'static str>,
    }

    impl SymbolCatalogProvider for CountingProvider {
        fn list_types(&self) -> Vec<SmolStr> {
            self.calls.set(self.calls.get() + 1);
            self.types.iter().map(|t| SmolStr::new(t)).collect()
        }

        fn list_functions(&self) -> Vec<SmolStr> {
            Vec::new()
        }

        fn list_constants(&self) -> Vec<SmolStr> {
            Vec::new()
        }

        fn is_defined_constant(&self, _name: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_populates_once() {
        let cache = CatalogCache::new();
        let provider = CountingProvider {
            types: vec!["Exception"],
            ..Default::default()
        };

        let first = cache.get_or_populate(&provider);
        let second = cache.get_or_populate(&provider);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.calls.get(), 1);
        assert!(cache.is_populated());
    }

    #[test]
    fn test_reset_repopulates() {
        let cache = CatalogCache::new();
        let provider = CountingProvider::default();

        cache.get_or_populate(&provider);
        cache.reset();
        assert!(cache.get().is_none());

        cache.get_or_populate(&provider);
        assert_eq!(provider.calls.get(), 2);
    }

    #[test]
    fn test_with_catalog_skips_provider() {
        let cache = CatalogCache::with_catalog(SymbolCatalog::from_names(["Foo"], ["bar"], ["BAZ"]));
        let provider = CountingProvider::default();

        let catalog = cache.get_or_populate(&provider);
        assert_eq!(catalog.len(), 3);
        assert_eq!(provider.calls.get(), 0);
    }
}
