//! Error types for the getused pipeline.
//!
//! Only genuine failures are errors. A document without any detectable usage
//! is not one: it yields a well-formed "nothing to import" report.

use std::path::PathBuf;

/// Failure of a pipeline or classmap operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsedError {
    /// The document could not be read or has no content.
    #[error("failed to get content of {}: {reason}", .path.display())]
    ContentUnreadable {
        /// Path that was requested.
        path: PathBuf,
        /// Why the content is unavailable.
        reason: String,
    },
    /// A requested class has no backing file in the classmap.
    #[error("cannot resolve class '{class}': {reason}")]
    SymbolNotResolvable {
        /// The class that was requested.
        class: String,
        /// Why the lookup failed.
        reason: String,
    },
    /// A catalog manifest line could not be parsed.
    #[error("invalid manifest entry on line {line}: {message}")]
    InvalidManifest {
        /// 1-based line number in the manifest.
        line: usize,
        /// Description of the problem.
        message: String,
    },
}

impl UsedError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ContentUnreadable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unresolvable(class: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SymbolNotResolvable {
            class: class.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for getused operations.
pub type Result<T> = std::result::Result<T, UsedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_message() {
        let err = UsedError::unreadable("/tmp/missing.php", "no such file");
        assert_eq!(
            err.to_string(),
            "failed to get content of /tmp/missing.php: no such file"
        );
    }

    #[test]
    fn test_unresolvable_message() {
        let err = UsedError::unresolvable("App\\Models\\User", "not in classmap");
        assert_eq!(
            err.to_string(),
            "cannot resolve class 'App\\Models\\User': not in classmap"
        );
    }
}
