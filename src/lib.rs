//! # getused
//!
//! Synthesizes the `use` statements a PHP-style source file needs.
//!
//! Given a document and a catalog of known symbols (types, free functions,
//! constants), the pipeline finds the symbols the document references,
//! renders one import statement per symbol and reconciles them with the
//! imports the document already declares, so nothing is duplicated or
//! silently dropped.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! pipeline  → Detect → Scan → Reconcile → Format, catalog cache, batch mode
//!   ↓
//! analysis  → usage detection, import scanning, reconciliation, output
//!   ↓
//! project   → file set, loader, classmap / namespace mode
//!   ↓
//! catalog   → symbol kinds and names, providers, manifest, indexer, cache
//!   ↓
//! syntax    → token stream, comment stripping, documents
//!   ↓
//! base      → primitives (FileId, positions, natural ordering)
//! ```
//!
//! ## Example
//!
//! ```
//! use getused::{Pipeline, SymbolCatalog, UsedConfig};
//!
//! let catalog = SymbolCatalog::from_names(["Exception"], ["trim"], ["PHP_EOL"]);
//! let pipeline = Pipeline::with_catalog(catalog, UsedConfig::default());
//!
//! let report = pipeline.analyze("<?php\nthrow new Exception(trim($m) . PHP_EOL);\n");
//! assert!(report.print.ends_with("use Exception;\nuse function trim;\nuse const PHP_EOL;"));
//! ```

// ============================================================================
// FOUNDATION
// ============================================================================

/// Foundation types: FileId, positions, natural ordering
pub mod base;

/// Token stream, comment stripping and documents
pub mod syntax;

/// Symbol catalog and its providers
pub mod catalog;

// ============================================================================
// PIPELINE
// ============================================================================

/// Detect, scan, reconcile and format stages
pub mod analysis;

/// File set, loader and classmap
pub mod project;

pub mod config;
pub mod error;
pub mod pipeline;

pub use analysis::{ImportState, ImportStatement, Reconciliation, USE_IS_COMPLETE, UsageRecord};
pub use base::{FileId, LineCol, LineIndex, TextRange, TextSize};
pub use catalog::{
    CatalogCache, DeclarationIndexer, Manifest, SymbolCatalog, SymbolCatalogProvider, SymbolKind,
    SymbolName,
};
pub use config::{Exclusions, ScanSource, UsedConfig};
pub use error::{Result, UsedError};
pub use pipeline::{Pipeline, UsedReport};
pub use project::{ClassMap, DocumentLoader, FileSet, NamespaceTree, UseBlock, UseBuilder};
pub use syntax::SourceDocument;
