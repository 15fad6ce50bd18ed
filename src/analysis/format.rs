//! Output formatting.
//!
//! The rendered block reads top to bottom:
//!
//! ```text
//! USE_IS_COMPLETE                        (only on full coverage)
//!
//! /** defined(1), taken(1), class(2), total(2) */
//!
//! // ## possible duplicate detected      (only on duplicates)
//! // ## use Bar;
//!
//! use Foo\Bar;                           (missed, verbatim)
//! // use Exception;                      (already present)
//! use Qux;                               (new)
//! ```

use super::reconcile::{ImportState, Reconciliation};
use crate::catalog::SymbolKind;
use crate::syntax::LineSeparator;

/// First line of the output when every needed import is already declared.
pub const USE_IS_COMPLETE: &str = "USE_IS_COMPLETE";

/// Prefix of commented-out statements.
pub const COMMENT_MARKER: &str = "// ";

const DUPLICATE_WARNING: &str = "// ## possible duplicate detected";
const DUPLICATE_PREFIX: &str = "// ## ";

/// Rendering switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    /// Prefix already-present statements with [`COMMENT_MARKER`].
    pub comment_out_existing: bool,
    pub separator: LineSeparator,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            comment_out_existing: true,
            separator: LineSeparator::Lf,
        }
    }
}

impl FormatOptions {
    pub fn new(comment_out_existing: bool, separator: LineSeparator) -> Self {
        Self {
            comment_out_existing,
            separator,
        }
    }
}

/// The summary comment, e.g. `/** defined(0), taken(0), class(1), total(1) */`.
///
/// Kinds without emitted statements are left out.
pub fn header(reconciliation: &Reconciliation) -> String {
    let mut labels = vec![
        format!("defined({})", reconciliation.defined()),
        format!("taken({})", reconciliation.taken()),
    ];
    for kind in SymbolKind::ALL {
        let count = reconciliation.kind_count(kind);
        if count > 0 {
            labels.push(format!("{}({})", kind.label(), count));
        }
    }
    labels.push(format!("total({})", reconciliation.total()));

    format!("/** {} */", labels.join(", "))
}

/// Render the final text block.
pub fn render(reconciliation: &Reconciliation, options: &FormatOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    if reconciliation.is_complete() {
        lines.push(USE_IS_COMPLETE.to_string());
        lines.push(String::new());
    }

    lines.push(header(reconciliation));
    lines.push(String::new());

    let mut duplicates = reconciliation.duplicates().peekable();
    if duplicates.peek().is_some() {
        for import in duplicates {
            lines.push(DUPLICATE_WARNING.to_string());
            lines.push(format!("{}{}", DUPLICATE_PREFIX, import.statement));
        }
        lines.push(String::new());
    }

    lines.extend(reconciliation.missed.iter().map(|line| line.text.clone()));

    for import in reconciliation.emitted() {
        let text = import.statement.text();
        match import.state {
            ImportState::AlreadyPresent if options.comment_out_existing => {
                lines.push(format!("{}{}", COMMENT_MARKER, text));
            }
            _ => lines.push(text.to_string()),
        }
    }

    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);

    lines[start..end].join(options.separator.as_str())
}
