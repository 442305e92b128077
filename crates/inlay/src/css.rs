//! Stylesheet helpers.

use std::sync::LazyLock;

use regex::Regex;

static STYLE_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(style)").expect("valid close tag regex"));

/// Remove `/* ... */` comments outside string literals.
///
/// An unterminated comment runs to the end of the input.
pub fn strip_comments(css: &str) -> String {
    let bytes = css.as_bytes();
    let mut out = String::with_capacity(css.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                out.push_str(&css[copied..i]);
                i = match css[i + 2..].find("*/") {
                    Some(end) => i + 2 + end + 2,
                    None => bytes.len(),
                };
                copied = i;
            }
            _ => i += 1,
        }
    }

    if copied < css.len() {
        out.push_str(&css[copied..]);
    }
    out
}

/// Wrap `css` in a `<style>` element.
pub fn style_tag(css: &str) -> String {
    let escaped = STYLE_CLOSE_RE.replace_all(css, "<\\/$1");
    format!("<style>{escaped}</style>")
}
