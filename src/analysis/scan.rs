//! Existing-import scanning.
//!
//! Only the file header is scanned: the first line that opens a type
//! definition ends the scan for good, so `use Trait;` statements inside a
//! class body are never mistaken for imports.

use crate::catalog::SymbolKind;

/// First words that open a type definition.
const TYPE_DEFINITION_INDICATORS: &[&str] = &[
    "class", "final", "abstract", "interface", "trait", "enum", "readonly",
];

/// An import line already present in the document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct ExistingImportLine {
    /// 1-based line number.
    pub line: u32,
    /// The trimmed line text.
    pub text: String,
    pub kind: SymbolKind,
    /// The imported name without `use`, kind keyword, alias or terminator.
    pub qualified_name: String,
}

impl ExistingImportLine {
    /// Parse a trimmed `use ...;` line.
    ///
    /// Returns `None` if the line is not an import statement.
    pub fn parse(line: u32, text: &str) -> Option<Self> {
        let body = text.strip_prefix("use ")?.strip_suffix(';')?.trim();

        let (kind, name) = if let Some(rest) = body.strip_prefix("function ") {
            (SymbolKind::Function, rest)
        } else if let Some(rest) = body.strip_prefix("const ") {
            (SymbolKind::Constant, rest)
        } else {
            (SymbolKind::Type, body)
        };

        let name = match name.find(" as ") {
            Some(pos) => &name[..pos],
            None => name,
        };

        Some(Self {
            line,
            text: text.to_string(),
            kind,
            qualified_name: name.trim().trim_start_matches('\\').to_string(),
        })
    }

    /// Whether this import ends in `\` + `leaf`, or is exactly `leaf`.
    pub fn tail_matches(&self, leaf: &str) -> bool {
        match self.qualified_name.strip_suffix(leaf) {
            Some("") => true,
            Some(prefix) => prefix.ends_with('\\'),
            None => false,
        }
    }
}

/// Import lines found in a document header, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct ExistingImports {
    lines: Vec<ExistingImportLine>,
}

impl ExistingImports {
    pub fn new(lines: Vec<ExistingImportLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[ExistingImportLine] {
        &self.lines
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExistingImportLine> {
        self.lines.iter()
    }

    /// Line number of the first import.
    pub fn first_line(&self) -> Option<u32> {
        self.lines.first().map(|l| l.line)
    }

    /// Line number of the last import.
    pub fn last_line(&self) -> Option<u32> {
        self.lines.last().map(|l| l.line)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Collect the `use ...;` lines that precede the first type definition.
pub fn scan_existing_imports<'a>(lines: impl IntoIterator<Item = &'a str>) -> ExistingImports {
    let mut found = Vec::new();

    for (index, raw) in lines.into_iter().enumerate() {
        let line = raw.trim();
        let first_word = line.split(' ').next().unwrap_or_default();

        if TYPE_DEFINITION_INDICATORS.contains(&first_word) {
            break;
        }
        if let Some(import) = ExistingImportLine::parse(index as u32 + 1, line) {
            found.push(import);
        }
    }

    let imports = ExistingImports::new(found);
    tracing::debug!(
        count = imports.len(),
        first = imports.first_line(),
        last = imports.last_line(),
        "scanned existing imports"
    );
    imports
}
