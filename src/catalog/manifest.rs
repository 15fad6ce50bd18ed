//! Explicit catalog manifests.
//!
//! A manifest lists one symbol per line, prefixed by its kind:
//!
//! ```text
//! # runtime classes
//! class Exception
//! class App\Models\User
//! function array_map
//! const PHP_EOL
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. `interface`,
//! `trait` and `enum` are accepted as aliases of `class`, `constant` as an
//! alias of `const`.

use std::str::FromStr;

use smol_str::SmolStr;

use super::{SymbolCatalog, SymbolCatalogProvider, SymbolKind, SymbolName};
use crate::error::{Result, UsedError};

/// A parsed manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    catalog: SymbolCatalog,
}

impl Manifest {
    /// Parse manifest text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut symbols = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let invalid = |message: String| UsedError::InvalidManifest {
                line: index + 1,
                message,
            };

            let mut parts = line.split_whitespace();
            let (Some(keyword), Some(name)) = (parts.next(), parts.next()) else {
                return Err(invalid(format!("expected '<kind> <name>', found '{}'", line)));
            };
            if let Some(extra) = parts.next() {
                return Err(invalid(format!("unexpected trailing '{}'", extra)));
            }

            let kind = match keyword {
                "class" | "interface" | "trait" | "enum" => SymbolKind::Type,
                "function" => SymbolKind::Function,
                "const" | "constant" => SymbolKind::Constant,
                other => return Err(invalid(format!("unknown symbol kind '{}'", other))),
            };

            symbols.push(SymbolName::new(kind, name.trim_start_matches('\\')));
        }

        Ok(Self {
            catalog: SymbolCatalog::from_symbols(symbols),
        })
    }

    /// The catalog described by this manifest.
    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn into_catalog(self) -> SymbolCatalog {
        self.catalog
    }
}

impl FromStr for Manifest {
    type Err = UsedError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl SymbolCatalogProvider for Manifest {
    fn list_types(&self) -> Vec<SmolStr> {
        self.catalog.list_types()
    }

    fn list_functions(&self) -> Vec<SmolStr> {
        self.catalog.list_functions()
    }

    fn list_constants(&self) -> Vec<SmolStr> {
        self.catalog.list_constants()
    }

    fn is_defined_constant(&self, name: &str) -> bool {
        self.catalog.is_defined_constant(name)
    }
}
