//! Project-level collaborators: buffered documents, the filesystem loader
//! and the classmap used by namespace mode.

mod classmap;
mod loader;
mod source;

pub use classmap::{
    ClassMap, NamespaceTree, UseBlock, UseBuilder, normalize_namespace, render_grouped,
    render_use_lines,
};
pub use loader::{DocumentLoader, read_document};
pub use source::FileSet;
