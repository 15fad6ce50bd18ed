//! Lightweight token stream over PHP-style source text.
//!
//! This is deliberately not a PHP lexer: strings, heredocs and comments are
//! not recognized, so their contents tokenize like code. The usage detector
//! only needs to know, for every (possibly qualified) name, which token sits
//! immediately before and after it.

use logos::Logos;

use crate::base::{TextRange, TextSize};

/// Token kinds recognized by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A name, optionally fully qualified: `Foo`, `Foo\Bar`, `\strlen`.
    #[regex(
        r"\\?[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*(\\[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*)*",
        priority = 3
    )]
    Name,
    /// `$name`
    #[regex(r"\$[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\x{80}-\x{10FFFF}]*")]
    Variable,
    #[regex(r"[ \t\r\n\x0B\x0C]+")]
    Whitespace,
    #[token("::")]
    DoubleColon,
    #[token("->")]
    Arrow,
    #[token("?->")]
    NullsafeArrow,
    #[token("...")]
    Ellipsis,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("!")]
    Bang,
    #[token("=")]
    Eq,
    #[token("/")]
    Slash,
    #[token("\\")]
    Backslash,
    #[token("@")]
    At,
    #[token("&")]
    Amp,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    /// Any other single character.
    #[regex(r"[^ \t\r\n\x0B\x0C]", priority = 1)]
    Other,
}

/// A token with its text and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

impl<'a> Token<'a> {
    /// Check for a name token with exactly this text.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Name && self.text.eq_ignore_ascii_case(keyword)
    }

    /// For a name token, whether it starts with a namespace separator.
    pub fn is_fully_qualified(&self) -> bool {
        self.kind == TokenKind::Name && self.text.starts_with('\\')
    }

    /// For a name token, the name without a leading namespace separator.
    pub fn unqualified(&self) -> &'a str {
        self.text.strip_prefix('\\').unwrap_or(self.text)
    }
}

/// Tokenize source text.
///
/// Every byte of the input is covered by exactly one token; input the
/// lexer cannot classify becomes [`TokenKind::Other`].
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    TokenKind::lexer(text)
        .spanned()
        .map(|(kind, span)| Token {
            kind: kind.unwrap_or(TokenKind::Other),
            text: &text[span.clone()],
            range: TextRange::new(
                TextSize::from(span.start as u32),
                TextSize::from(span.end as u32),
            ),
        })
        .collect()
}
