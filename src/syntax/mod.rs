//! Source text handling: tokens, comment stripping and documents.

pub mod document;
pub mod lexer;
pub mod prepare;

pub use document::{LineSeparator, SourceDocument};
pub use lexer::{Token, TokenKind, tokenize};
pub use prepare::strip_comments;
