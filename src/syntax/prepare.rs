//! Content preparation: removing comments before usage detection.
//!
//! Block comments (`/* */` and `/** */` doc blocks) are blanked out and line
//! comments introduced by `// ` are cut off. Every removed region keeps its
//! newlines, so line numbers in the cleaned text match the raw text.
//!
//! Like the detector this is a heuristic: a `// ` or `/*` inside a string
//! literal is treated as a comment.

/// Remove block and line comments, preserving line structure.
pub fn strip_comments(text: &str) -> String {
    strip_line_comments(&strip_block_comments(text))
}

/// Replace each `/* ... */` region by the line breaks it contained.
///
/// An unterminated block comment is left untouched.
pub fn strip_block_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("/*") {
        let Some(len) = rest[start + 2..].find("*/") else {
            break;
        };
        let end = start + 2 + len + 2;

        out.push_str(&rest[..start]);
        out.extend(rest[start..end].chars().filter(|&c| c == '\n'));
        rest = &rest[end..];
    }

    out.push_str(rest);
    out
}

/// Cut every line at its first `// `.
///
/// A line that holds nothing but the comment becomes empty. Carriage returns
/// of CRLF line endings survive the cut.
pub fn strip_line_comments(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let (body, cr) = match line.strip_suffix('\r') {
                Some(body) => (body, "\r"),
                None => (line, ""),
            };
            match body.find("// ") {
                Some(pos) if body[..pos].trim().is_empty() => cr.to_string(),
                Some(pos) => format!("{}{}", &body[..pos], cr),
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
