//! Property-based tests for the pipeline invariants.
//!
//! Documents are assembled from a pool of import lines and code fragments,
//! so every generated case mixes declared, missing, duplicate and
//! already-present imports.
#![cfg(feature = "proptest")]

use std::cmp::Ordering;

use getused::analysis::COMMENT_MARKER;
use getused::base::natural_cmp;
use getused::{ImportState, Pipeline, SymbolCatalog, SymbolKind, UsedConfig};
use proptest::prelude::*;

// ============================================================================
// PROPTEST STRATEGIES
// ============================================================================

const IMPORT_LINES: &[&str] = &[
    "use Exception;",
    "use function trim;",
    "use const PHP_EOL;",
    "use Foo\\Bar;",
    "use Vendor\\DateTime;",
    "use function Str\\count;",
];

const CODE_LINES: &[&str] = &[
    "throw new Exception('x');",
    "$a = trim($b);",
    "echo $a . PHP_EOL;",
    "$d = new DateTime();",
    "$n = count($list);",
    "$m = $list->count();",
    "return new Bar();",
    "error_reporting(E_ALL);",
    "/* new Item2(); */",
    "// use function trim;",
    "$i = [Item10::make(), new Item2()];",
];

const CATALOG_NAMES: &[(SymbolKind, &str)] = &[
    (SymbolKind::Type, "Exception"),
    (SymbolKind::Type, "DateTime"),
    (SymbolKind::Type, "Bar"),
    (SymbolKind::Type, "Item2"),
    (SymbolKind::Type, "Item10"),
    (SymbolKind::Function, "trim"),
    (SymbolKind::Function, "count"),
    (SymbolKind::Constant, "PHP_EOL"),
    (SymbolKind::Constant, "E_ALL"),
];

fn catalog() -> SymbolCatalog {
    SymbolCatalog::from_symbols(
        CATALOG_NAMES
            .iter()
            .map(|&(kind, name)| getused::SymbolName::new(kind, name)),
    )
}

/// Strategy for PHP documents: imports first, then code.
///
/// Import lines are drawn with replacement, so a line may be declared twice.
fn arb_document() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(prop::sample::select(IMPORT_LINES), 0..8),
        prop::sample::subsequence(CODE_LINES.to_vec(), 0..=CODE_LINES.len()),
        any::<bool>(),
    )
        .prop_map(|(imports, code, crlf)| {
            let separator = if crlf { "\r\n" } else { "\n" };
            let mut lines = vec!["<?php", ""];
            lines.extend(imports);
            lines.push("");
            lines.push("final class Subject");
            lines.push("{");
            lines.extend(code);
            lines.push("}");
            lines.join(separator)
        })
}

fn arb_exclusions() -> impl Strategy<Value = Vec<(SymbolKind, &'static str)>> {
    prop::sample::subsequence(CATALOG_NAMES.to_vec(), 0..=CATALOG_NAMES.len())
}

/// Statement text of a rendered line, without the comment marker.
fn statement_of(line: &str) -> Option<&str> {
    let line = line.strip_prefix(COMMENT_MARKER).unwrap_or(line);
    line.starts_with("use ").then_some(line)
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn test_idempotent(document in arb_document()) {
        let pipeline = Pipeline::with_catalog(catalog(), UsedConfig::default());
        let first = pipeline.analyze(&document);
        let second = pipeline.analyze(&document);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_no_duplicate_in_generated_block(document in arb_document()) {
        let report = Pipeline::with_catalog(catalog(), UsedConfig::default()).analyze(&document);

        let mut seen = std::collections::HashSet::new();
        for import in report.imports() {
            prop_assert!(seen.insert(import.symbol().clone()), "{} twice", import);
        }

        let mut printed = std::collections::HashSet::new();
        for line in report.print.lines().filter_map(statement_of) {
            prop_assert!(printed.insert(line), "{} printed twice", line);
        }
    }

    #[test]
    fn test_excluded_never_generated(
        document in arb_document(),
        excluded in arb_exclusions(),
    ) {
        let mut config = UsedConfig::default();
        for &(kind, name) in &excluded {
            config = config.exclude(kind, name);
        }
        let report = Pipeline::with_catalog(catalog(), config).analyze(&document);

        for &(kind, name) in &excluded {
            prop_assert!(!report.usages.iter().any(|u| u.symbol.kind == kind && u.symbol.name == name));
            prop_assert!(!report.imports().any(|i| i.kind() == kind && i.bare_name() == name));
            prop_assert!(!report
                .reconciliation
                .missed
                .iter()
                .any(|l| l.kind == kind && l.qualified_name == name));
        }
    }

    #[test]
    fn test_comment_marking(document in arb_document(), comment_out in any::<bool>()) {
        let config = UsedConfig::default().with_comment_out_existing(comment_out);
        let report = Pipeline::with_catalog(catalog(), config).analyze(&document);

        for import in report.reconciliation.emitted() {
            let text = import.statement.text();
            let marked = format!("{}{}", COMMENT_MARKER, text);
            let plain_count = report.print.lines().filter(|l| *l == text).count();
            let marked_count = report.print.lines().filter(|l| *l == marked).count();

            prop_assert_eq!(plain_count + marked_count, 1);
            let expect_marked = comment_out && import.state == ImportState::AlreadyPresent;
            prop_assert_eq!(marked_count == 1, expect_marked);
            if import.state == ImportState::AlreadyPresent {
                prop_assert!(document.contains(text));
            }
        }
    }

    #[test]
    fn test_sentinel_only_when_covered(document in arb_document()) {
        let report = Pipeline::with_catalog(catalog(), UsedConfig::default()).analyze(&document);
        if report.print.lines().next() != Some(getused::USE_IS_COMPLETE) {
            return Ok(());
        }

        let declared: Vec<&str> = report.existing.iter().map(|l| l.text.as_str()).collect();
        for import in report.reconciliation.emitted() {
            prop_assert_ne!(&import.state, &ImportState::New, "{} still needed", import.statement);
            prop_assert!(
                declared.contains(&import.statement.text()),
                "{} is not a declared line",
                import.statement
            );
        }
    }

    #[test]
    fn test_natural_cmp_is_antisymmetric(a in "[a-zA-Z0-9_]{0,12}", b in "[a-zA-Z0-9_]{0,12}") {
        prop_assert_eq!(natural_cmp(&a, &b), natural_cmp(&b, &a).reverse());
        prop_assert_eq!(natural_cmp(&a, &b) == Ordering::Equal, a == b);
    }
}
