//! Usage detection: which catalog symbols a document references.
//!
//! The cleaned text is tokenized once and every name occurrence is
//! classified by the tokens around it. Each catalog entry is then a hash
//! lookup, so a run costs O(text + catalog) rather than one pattern scan of
//! the text per catalog entry.
//!
//! The rules are structural heuristics, not name resolution:
//!
//! | kind     | an occurrence counts when                                          |
//! |----------|--------------------------------------------------------------------|
//! | type     | `\Name`, `(Name`, `[Name`, `!Name`, `new Name`, `Name::`            |
//! | function | `Name(` preceded by whitespace, `(`, `[`, `!`, `=`, `/`, `\`, `&`, `@`, `...` |
//! | constant | preceded by whitespace, `(`, `[`, `!`, `/`, `\`; and defined        |
//!
//! A function is never reported if the text declares it (`function name(`),
//! declares a type of that name, or calls a method of that name
//! (`->name(`). Names are compared whole, so `Foo` never matches `FooBar`,
//! `_Foo`, `$Foo` or `Ns\Foo`.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::base::{LineCol, LineIndex, TextSize};
use crate::catalog::{SymbolCatalog, SymbolCatalogProvider, SymbolKind, SymbolName};
use crate::config::Exclusions;
use crate::syntax::{Token, TokenKind, tokenize};

/// Keywords after which a name is a type: `new Foo`, `extends Foo`, ...
const TYPE_KEYWORDS: &[&str] = &["new", "extends", "implements", "instanceof"];

/// Keywords that declare a type: `class Foo`, ...
const TYPE_DECLARATION_KEYWORDS: &[&str] = &["class", "interface", "trait", "enum"];

/// The outcome of testing one catalog entry against a document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct UsageRecord {
    pub symbol: SymbolName,
    pub matched: bool,
    /// Position of the first matching occurrence.
    pub first_seen: Option<LineCol>,
}

// ============================================================================
// REFERENCE COLLECTION
// ============================================================================

/// Name occurrences of a document, classified by context.
///
/// Maps hold the offset of the first qualifying occurrence.
#[derive(Debug, Default)]
struct References<'t> {
    types: FxHashMap<&'t str, TextSize>,
    calls: FxHashMap<&'t str, TextSize>,
    constants: FxHashMap<&'t str, TextSize>,
    declared_functions: FxHashSet<&'t str>,
    declared_types: FxHashSet<&'t str>,
    member_calls: FxHashSet<&'t str>,
    namespace: Option<&'t str>,
}

impl<'t> References<'t> {
    fn collect(tokens: &[Token<'t>]) -> Self {
        let mut refs = Self::default();

        for (i, token) in tokens.iter().enumerate() {
            if token.kind != TokenKind::Name {
                continue;
            }

            let prev = i.checked_sub(1).map(|j| &tokens[j]);
            let prev2 = i.checked_sub(2).map(|j| &tokens[j]);
            let next = tokens.get(i + 1);

            let name = token.unqualified();
            let offset = token.range.start();
            let qualified = token.is_fully_qualified();
            let prev_kind = prev.map(|t| t.kind);
            let next_kind = next.map(|t| t.kind);

            // Declarations
            if follows_keyword(prev, prev2, &["function"]) && next_kind == Some(TokenKind::LParen) {
                refs.declared_functions.insert(name);
            }
            if follows_keyword(prev, prev2, TYPE_DECLARATION_KEYWORDS) {
                refs.declared_types.insert(name);
            }
            if follows_keyword(prev, prev2, &["namespace"]) && refs.namespace.is_none() {
                refs.namespace = Some(name);
            }
            if matches!(prev_kind, Some(TokenKind::Arrow | TokenKind::NullsafeArrow))
                && next_kind == Some(TokenKind::LParen)
            {
                refs.member_calls.insert(name);
            }

            // Types
            let static_access = next_kind == Some(TokenKind::DoubleColon)
                && !matches!(
                    prev_kind,
                    Some(TokenKind::Arrow | TokenKind::NullsafeArrow | TokenKind::DoubleColon)
                );
            if qualified
                || matches!(
                    prev_kind,
                    Some(TokenKind::LParen | TokenKind::LBracket | TokenKind::Bang)
                )
                || follows_keyword(prev, prev2, TYPE_KEYWORDS)
                || static_access
            {
                refs.types.entry(name).or_insert(offset);
            }

            // Functions
            let call_context = match prev_kind {
                None => true,
                Some(kind) => matches!(
                    kind,
                    TokenKind::Whitespace
                        | TokenKind::LBracket
                        | TokenKind::LParen
                        | TokenKind::Bang
                        | TokenKind::Eq
                        | TokenKind::Slash
                        | TokenKind::Amp
                        | TokenKind::At
                        | TokenKind::Ellipsis
                ),
            };
            if next_kind == Some(TokenKind::LParen) && (qualified || call_context) {
                refs.calls.entry(name).or_insert(offset);
            }

            // Constants
            if qualified
                || matches!(
                    prev_kind,
                    Some(
                        TokenKind::Whitespace
                            | TokenKind::LBracket
                            | TokenKind::LParen
                            | TokenKind::Bang
                            | TokenKind::Slash
                    )
                )
            {
                refs.constants.entry(name).or_insert(offset);
            }
        }

        refs
    }

    /// Names of the types this document declares, bare and qualified with
    /// the document's namespace.
    fn own_types(&self) -> FxHashSet<String> {
        let mut own: FxHashSet<String> = self.declared_types.iter().map(|name| name.to_string()).collect();
        if let Some(ns) = self.namespace {
            own.extend(self.declared_types.iter().map(|name| format!("{}\\{}", ns, name)));
        }
        own
    }

    /// Whether `name` is only ever used as something other than a free
    /// function in this text.
    fn shadows_function(&self, name: &str) -> bool {
        self.declared_functions.contains(name)
            || self.declared_types.contains(name)
            || self.member_calls.contains(name)
    }
}

/// `keyword <whitespace> name`
fn follows_keyword(prev: Option<&Token<'_>>, prev2: Option<&Token<'_>>, keywords: &[&str]) -> bool {
    prev.is_some_and(|t| t.kind == TokenKind::Whitespace)
        && prev2.is_some_and(|t| keywords.iter().any(|keyword| t.is_keyword(keyword)))
}

// ============================================================================
// DETECTOR
// ============================================================================

/// Tests catalog entries against document text.
#[derive(Clone, Copy, Debug)]
pub struct UsageDetector<'a> {
    catalog: &'a SymbolCatalog,
    exclusions: &'a Exclusions,
}

impl<'a> UsageDetector<'a> {
    pub fn new(catalog: &'a SymbolCatalog, exclusions: &'a Exclusions) -> Self {
        Self {
            catalog,
            exclusions,
        }
    }

    /// Matched usages, kind by kind in catalog order.
    pub fn detect(&self, text: &str) -> Vec<UsageRecord> {
        self.evaluate(text)
            .into_iter()
            .filter(|record| record.matched)
            .collect()
    }

    /// A record for every catalog entry that is not excluded.
    ///
    /// Excluded names and the document's own declared types are skipped
    /// before any matching happens.
    pub fn evaluate(&self, text: &str) -> Vec<UsageRecord> {
        let tokens = tokenize(text);
        let refs = References::collect(&tokens);
        let own_types = refs.own_types();
        let lines = LineIndex::new(text);

        let mut records = Vec::with_capacity(self.catalog.len());

        for kind in SymbolKind::ALL {
            for name in self.catalog.names(kind) {
                if self.exclusions.contains(kind, name) {
                    continue;
                }

                let hit = match kind {
                    SymbolKind::Type if own_types.contains(name.as_str()) => {
                        tracing::trace!(%name, "skipping the document's own type");
                        continue;
                    }
                    SymbolKind::Type => refs.types.get(name.as_str()),
                    SymbolKind::Function if refs.shadows_function(name) => None,
                    SymbolKind::Function => refs.calls.get(name.as_str()),
                    SymbolKind::Constant if !self.catalog.is_defined_constant(name) => None,
                    SymbolKind::Constant => refs.constants.get(name.as_str()),
                };

                records.push(UsageRecord {
                    symbol: SymbolName::new(kind, name.clone()),
                    matched: hit.is_some(),
                    first_seen: hit.map(|&offset| lines.line_col(offset)),
                });
            }
        }

        tracing::debug!(
            candidates = records.len(),
            matched = records.iter().filter(|r| r.matched).count(),
            "usage detection finished"
        );
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SymbolCatalog {
        SymbolCatalog::from_names(
            ["Exception", "Foo", "FooBar", "DateTime", "Countable", "App\\Models\\User"],
            ["trim", "count", "strlen", "array_map", "dump", "__construct"],
            ["PHP_EOL", "E_ALL", "SORT_STRING"],
        )
    }

    fn detected(text: &str) -> Vec<String> {
        let catalog = catalog();
        let exclusions = Exclusions::default();
        UsageDetector::new(&catalog, &exclusions)
            .detect(text)
            .into_iter()
            .map(|r| r.symbol.to_string())
            .collect()
    }

    #[test]
    fn test_type_contexts() {
        assert_eq!(detected("throw new Exception('x');"), vec!["class Exception"]);
        assert_eq!(detected("function f(Foo $foo) {}"), vec!["class Foo"]);
        assert_eq!(detected("$x = [Foo::class];"), vec!["class Foo"]);
        assert_eq!(detected("return Foo::create();"), vec!["class Foo"]);
        assert_eq!(detected("$d = \\DateTime::createFromFormat();"), vec!["class DateTime"]);
        assert_eq!(detected("class A implements Countable {}"), vec!["class Countable"]);
        assert_eq!(detected("$u = new App\\Models\\User;"), vec!["class App\\Models\\User"]);
    }

    #[test]
    fn test_type_is_fenced() {
        assert_eq!(detected("new FooBar();"), vec!["class FooBar"]);
        assert!(detected("new _Foo();").is_empty());
        assert!(detected("$Foo::bar();").is_empty());
        assert!(detected("$this->Foo::bar();").is_empty());
        assert!(detected("new Models\\User();").is_empty());
        assert!(detected("echo Foo;").is_empty());
    }

    #[test]
    fn test_function_calls() {
        assert_eq!(detected("$a = trim($b);"), vec!["function trim"]);
        assert_eq!(detected("if (!strlen($b)) {}"), vec!["function strlen"]);
        assert_eq!(detected("$a=array_map(null, ...$b);"), vec!["function array_map"]);
        assert_eq!(detected("@\\trim($x);"), vec!["function trim"]);
        assert_eq!(detected("f(...trim($x));"), vec!["function trim"]);
    }

    #[test]
    fn test_function_requires_call_and_context() {
        assert!(detected("use function trim;").is_empty());
        assert!(detected("$a = 'x'.trim($b);").is_empty());
        assert!(detected("$a = $obj::trim($b);").is_empty());
    }

    #[test]
    fn test_function_shadowed_by_method_or_declaration() {
        assert!(detected("$n = count($a); $m = $list->count();").is_empty());
        assert!(detected("function dump($x) {} dump(1);").is_empty());
        assert!(detected("$n = strlen($a); $b?->strlen();").is_empty());
    }

    #[test]
    fn test_constructor_excluded_by_default() {
        assert!(detected("parent::__construct(); \\__construct();").is_empty());
    }

    #[test]
    fn test_constants() {
        assert_eq!(detected("echo PHP_EOL;"), vec!["constant PHP_EOL"]);
        assert_eq!(detected("error_reporting(E_ALL);"), vec!["constant E_ALL"]);
        assert_eq!(detected("$f = [SORT_STRING];"), vec!["constant SORT_STRING"]);
        assert!(detected("echo self::PHP_EOL;").is_empty());
        assert!(detected("echo PHP_EOL_X;").is_empty());
    }

    #[test]
    fn test_undefined_constant_is_not_reported() {
        let catalog = SymbolCatalog::from_names(Vec::<&str>::new(), Vec::<&str>::new(), ["A"]);

        struct Nothing;
        impl SymbolCatalogProvider for Nothing {
            fn list_types(&self) -> Vec<smol_str::SmolStr> {
                Vec::new()
            }
            fn list_functions(&self) -> Vec<smol_str::SmolStr> {
                Vec::new()
            }
            fn list_constants(&self) -> Vec<smol_str::SmolStr> {
                vec!["A".into()]
            }
            fn is_defined_constant(&self, _name: &str) -> bool {
                false
            }
        }

        let exclusions = Exclusions::default();
        assert_eq!(UsageDetector::new(&catalog, &exclusions).detect("echo A;").len(), 1);

        let snapshot = SymbolCatalog::from_provider(&Nothing);
        assert!(UsageDetector::new(&snapshot, &exclusions).detect("echo A;").is_empty());
    }

    #[test]
    fn test_exclusions_skip_candidates() {
        let catalog = catalog();
        let mut exclusions = Exclusions::default();
        exclusions.insert(SymbolKind::Type, "Exception");

        let detector = UsageDetector::new(&catalog, &exclusions);
        let records = detector.evaluate("throw new Exception();");

        assert!(records.iter().all(|r| r.symbol.name != "Exception"));
        assert!(detector.detect("throw new Exception();").is_empty());
    }

    #[test]
    fn test_own_type_is_not_imported() {
        let text = "<?php\nnamespace App\\Models;\n\nclass User {\n  public static function make() { return new \\App\\Models\\User(); }\n}";
        assert!(detected(text).is_empty());
    }

    #[test]
    fn test_first_seen_position() {
        let catalog = catalog();
        let exclusions = Exclusions::default();
        let records = UsageDetector::new(&catalog, &exclusions).detect("<?php\n\n$x = trim($y);");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].first_seen, Some(LineCol::new(2, 5)));
    }

    #[test]
    fn test_evaluate_reports_unmatched() {
        let catalog = catalog();
        let exclusions = Exclusions::default();
        let records = UsageDetector::new(&catalog, &exclusions).evaluate("");

        // everything but the excluded constructor
        assert_eq!(records.len(), catalog.len() - 1);
        assert!(records.iter().all(|r| !r.matched && r.first_seen.is_none()));
    }
}
