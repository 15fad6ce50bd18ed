//! Foundation types for the getused pipeline.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileId`] - Handles for loaded documents
//! - [`TextRange`], [`TextSize`] - Source positions
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`natural_cmp`], [`natural_sort`] - Natural string ordering
//!
//! This module has NO dependencies on other getused modules.

mod file_id;
mod natural;
mod span;

pub use file_id::FileId;
pub use natural::{natural_cmp, natural_sort};
pub use span::{LineCol, LineIndex, TextRange, TextSize};
