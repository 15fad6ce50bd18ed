//! The top-level pipeline: Detect → Scan → Reconcile → Format.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use crate::analysis::{
    ExistingImports, FormatOptions, ImportStatement, Reconciliation, UsageDetector, UsageRecord,
    reconcile, render, scan_existing_imports,
};
use crate::base::FileId;
use crate::catalog::{CatalogCache, SymbolCatalog, SymbolCatalogProvider};
use crate::config::{ScanSource, UsedConfig};
use crate::error::Result;
use crate::project::{ClassMap, DocumentLoader, FileSet, UseBlock, UseBuilder};
use crate::syntax::SourceDocument;

/// Everything one analysis run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct UsedReport {
    /// The formatted import block.
    pub print: String,
    /// Matched usages, kind by kind in catalog order.
    pub usages: Vec<UsageRecord>,
    /// Import lines the document already declared.
    pub existing: ExistingImports,
    pub reconciliation: Reconciliation,
}

impl UsedReport {
    /// Whether the document already declares every import it needs.
    pub fn is_complete(&self) -> bool {
        self.reconciliation.is_complete()
    }

    /// Statements of the generated block.
    pub fn imports(&self) -> impl Iterator<Item = &ImportStatement> {
        self.reconciliation.emitted().map(|import| &import.statement)
    }
}

/// Runs analyses against one symbol catalog.
///
/// The catalog is snapshotted from the provider on first use and reused by
/// every later run, including parallel batch runs, until
/// [`reset_catalog`](Self::reset_catalog) is called.
pub struct Pipeline {
    provider: Box<dyn SymbolCatalogProvider + Send + Sync>,
    cache: CatalogCache,
    config: UsedConfig,
}

impl Pipeline {
    pub fn new(provider: impl SymbolCatalogProvider + Send + Sync + 'static, config: UsedConfig) -> Self {
        Self {
            provider: Box::new(provider),
            cache: CatalogCache::new(),
            config,
        }
    }

    /// A pipeline over a ready catalog; the cache starts populated.
    pub fn with_catalog(catalog: SymbolCatalog, config: UsedConfig) -> Self {
        Self {
            provider: Box::new(catalog.clone()),
            cache: CatalogCache::with_catalog(catalog),
            config,
        }
    }

    pub fn config(&self) -> &UsedConfig {
        &self.config
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// The catalog snapshot, taken from the provider on first call.
    pub fn catalog(&self) -> Arc<SymbolCatalog> {
        self.cache.get_or_populate(self.provider.as_ref())
    }

    /// Forget the snapshot so the next run asks the provider again.
    pub fn reset_catalog(&self) {
        self.cache.reset();
    }

    /// Analyze source text.
    pub fn analyze(&self, text: &str) -> UsedReport {
        let document = SourceDocument::new(text, self.config.strip_doc_comments);
        self.analyze_document(&document)
    }

    /// Analyze a prepared document.
    pub fn analyze_document(&self, document: &SourceDocument) -> UsedReport {
        let catalog = self.catalog();
        let exclusions = self.config.exclusions();

        let usages = UsageDetector::new(&catalog, exclusions).detect(document.cleaned());
        let generated = ImportStatement::from_usages(&usages);
        tracing::debug!(usages = usages.len(), generated = generated.len(), "detect stage done");

        let existing = match self.config.scan_source {
            ScanSource::Cleaned => scan_existing_imports(document.cleaned_lines()),
            ScanSource::Raw => scan_existing_imports(document.raw_lines()),
        };

        let reconciliation = reconcile(&generated, &existing, document.raw(), exclusions);

        let options = FormatOptions::new(self.config.comment_out_existing, document.line_separator());
        let print = render(&reconciliation, &options);
        tracing::debug!(
            complete = reconciliation.is_complete(),
            bytes = print.len(),
            "format stage done"
        );

        UsedReport {
            print,
            usages,
            existing,
            reconciliation,
        }
    }

    /// Analyze a document buffered in a file set.
    pub fn analyze_file(&self, files: &FileSet, file: FileId) -> Result<UsedReport> {
        let text = files.require_contents(file)?;
        tracing::debug!(%file, "analyzing document");
        let document = SourceDocument::new(text, self.config.strip_doc_comments);
        Ok(self.analyze_document(&document))
    }

    /// Read a document from disk and analyze it.
    pub fn analyze_path(&self, path: impl AsRef<Path>) -> Result<UsedReport> {
        let files = FileSet::new();
        let file = DocumentLoader::new().load_file(path.as_ref(), &files)?;
        self.analyze_file(&files, file)
    }

    /// Analyze the file backing `class` in a classmap.
    pub fn analyze_class(&self, map: &ClassMap, class: &str) -> Result<UsedReport> {
        let path = map.resolve(class)?;
        tracing::debug!(class, path = %path.display(), "resolved class");
        self.analyze_path(path)
    }

    /// Analyze many buffered documents in parallel.
    ///
    /// The catalog is populated once up front and shared by all runs.
    /// Results are returned in input order.
    pub fn analyze_batch(&self, files: &FileSet, ids: &[FileId]) -> Vec<Result<UsedReport>> {
        let catalog = self.catalog();
        tracing::debug!(documents = ids.len(), symbols = catalog.len(), "batch analysis");

        ids.par_iter()
            .map(|&file| self.analyze_file(files, file))
            .collect()
    }

    /// Namespace mode over a classmap.
    pub fn use_block(&self, namespace: &str, map: &ClassMap) -> UseBlock {
        UseBuilder::new(namespace, self.config.exclusions()).build(map)
    }

    /// Namespace mode over the catalog's type names.
    pub fn use_block_from_catalog(&self, namespace: &str) -> UseBlock {
        let catalog = self.catalog();
        UseBuilder::new(namespace, self.config.exclusions()).build_from_catalog(&catalog)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SymbolKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn catalog() -> SymbolCatalog {
        SymbolCatalog::from_names(["Exception", "DateTime"], ["trim", "count"], ["PHP_EOL"])
    }

    #[test]
    fn test_analyze_text() {
        let pipeline = Pipeline::with_catalog(catalog(), UsedConfig::default());
        let report = pipeline.analyze("<?php\n\necho trim($a) . PHP_EOL;\nthrow new Exception();\n");

        assert_eq!(
            report.print,
            "/** defined(0), taken(0), class(1), function(1), constant(1), total(3) */\n\n\
             use Exception;\n\
             use function trim;\n\
             use const PHP_EOL;"
        );
        assert_eq!(report.usages.len(), 3);
        assert!(report.existing.is_empty());
        assert!(!report.is_complete());
    }

    #[test]
    fn test_comments_are_not_usages() {
        let pipeline = Pipeline::with_catalog(catalog(), UsedConfig::default());
        let report = pipeline.analyze("<?php\n/** @throws Exception */\n// new DateTime();\n");
        assert_eq!(report.imports().count(), 0);
    }

    #[test]
    fn test_scan_source_raw_sees_commented_imports() {
        let text = "<?php\n/*\nuse Old\\Thing;\n*/\nuse Exception;\nnew Exception();";

        let cleaned = Pipeline::with_catalog(catalog(), UsedConfig::default()).analyze(text);
        assert_eq!(cleaned.existing.len(), 1);
        assert_eq!(cleaned.existing.first_line(), Some(5));

        let raw = Pipeline::with_catalog(
            catalog(),
            UsedConfig::default().with_scan_source(ScanSource::Raw),
        )
        .analyze(text);
        assert_eq!(raw.existing.len(), 2);
        assert_eq!(raw.reconciliation.taken(), 1);
    }

    #[test]
    fn test_crlf_document() {
        let pipeline = Pipeline::with_catalog(catalog(), UsedConfig::default());
        let report = pipeline.analyze("<?php\r\nuse Exception;\r\n\r\nnew Exception(count($a));\r\n");

        assert_eq!(
            report.print,
            "/** defined(1), taken(0), class(1), function(1), total(2) */\r\n\r\n\
             // use Exception;\r\n\
             use function count;"
        );
    }

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    impl SymbolCatalogProvider for CountingProvider {
        fn list_types(&self) -> Vec<smol_str::SmolStr> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            vec!["Exception".into()]
        }

        fn list_functions(&self) -> Vec<smol_str::SmolStr> {
            Vec::new()
        }

        fn list_constants(&self) -> Vec<smol_str::SmolStr> {
            Vec::new()
        }

        fn is_defined_constant(&self, _name: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_catalog_snapshot_reused_until_reset() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new(
            CountingProvider {
                calls: Arc::clone(&calls),
            },
            UsedConfig::default(),
        );
        assert!(!pipeline.cache().is_populated());

        pipeline.analyze("<?php new Exception();");
        pipeline.analyze("<?php new Exception();");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(pipeline.catalog().contains(SymbolKind::Type, "Exception"));

        pipeline.reset_catalog();
        assert!(!pipeline.cache().is_populated());
        pipeline.analyze("<?php");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_batch_in_input_order() {
        let files = FileSet::new();
        let a = files.insert("a.php", "<?php new Exception();");
        let missing = files.file_id(Path::new("missing.php"));
        let b = files.insert("b.php", "<?php new DateTime();");

        let pipeline = Pipeline::with_catalog(catalog(), UsedConfig::default());
        let results = pipeline.analyze_batch(&files, &[a, missing, b]);

        assert!(results[0].as_ref().unwrap().print.ends_with("use Exception;"));
        assert!(results[1].is_err());
        assert!(results[2].as_ref().unwrap().print.ends_with("use DateTime;"));
    }

    #[test]
    fn test_analyze_class_unresolvable() {
        let pipeline = Pipeline::with_catalog(catalog(), UsedConfig::default());
        let err = pipeline
            .analyze_class(&ClassMap::new(), "App\\Missing")
            .unwrap_err();
        assert!(matches!(err, crate::error::UsedError::SymbolNotResolvable { .. }));
    }
}
