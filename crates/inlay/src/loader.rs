//! Removal of the module-preload polyfill bundlers prepend to entry chunks.
//!
//! The polyfill is an immediately invoked function whose body starts by
//! feature-testing `document.createElement("link").relList`. Once every chunk
//! is inlined there is nothing left to preload, so the whole call goes.

use std::sync::LazyLock;

use regex::Regex;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"document\.createElement\(\s*["']link["']\s*\)\.relList"#)
        .expect("valid loader marker regex")
});

static OPENER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*(?:function\b[^(]*\([^)]*\)|\(\s*\)\s*=>)\s*\{").expect("valid opener regex")
});

/// Strip the polyfill from `code`.
///
/// Returns `None` when no polyfill is found.
pub fn strip_module_loader(code: &str) -> Option<String> {
    let marker = MARKER_RE.find(code)?;

    // Last opener before the marker: the polyfill's own wrapper.
    let opener = OPENER_RE
        .find_iter(&code[..marker.start()])
        .last()?;
    let body_open = opener.end() - 1;
    let body_close = matching_brace(code, body_open)?;
    if body_close < marker.end() {
        return None;
    }

    let end = invocation_end(code, body_close + 1)?;
    let mut out = String::with_capacity(code.len());
    out.push_str(&code[..opener.start()]);
    out.push_str(code[end..].strip_prefix('\n').unwrap_or(&code[end..]));

    tracing::debug!(removed = end - opener.start(), "stripped module preload polyfill");
    Some(out)
}

/// Index of the `}` closing the `{` at `open`, skipping string literals and comments.
fn matching_brace(code: &str, open: usize) -> Option<usize> {
    let bytes = code.as_bytes();
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            quote @ (b'"' | b'\'' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = code[i + 2..].find("*/").map(|p| i + 2 + p + 1)?;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// End of `)()` or `)();` following the function body at `from`.
fn invocation_end(code: &str, from: usize) -> Option<usize> {
    let rest = &code[from..];
    let after_paren = rest.trim_start().strip_prefix(')')?;
    let after_call = after_paren.trim_start().strip_prefix('(')?;
    let after_call = after_call.trim_start().strip_prefix(')')?;
    let tail = after_call.trim_start_matches([' ', '\t']);
    let tail = tail.strip_prefix(';').unwrap_or(tail);
    Some(code.len() - tail.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_minified_polyfill() {
        let code = r#"(function(){const t=document.createElement("link").relList;if(t&&t.supports&&t.supports("modulepreload"))return;for(const e of document.querySelectorAll('link[rel="modulepreload"]'))r(e);function r(e){if(e.ep)return;e.ep=!0;fetch(e.href,{})}})();console.log("app");"#;
        assert_eq!(strip_module_loader(code).unwrap(), r#"console.log("app");"#);
    }

    #[test]
    fn strips_arrow_polyfill_with_newline() {
        let code = "import{a}from\"./a.js\";\n(() => {\n  const relList = document.createElement('link').relList;\n  const s = \"}\";\n})();\na();\n";
        assert_eq!(
            strip_module_loader(code).unwrap(),
            "import{a}from\"./a.js\";\na();\n"
        );
    }

    #[test]
    fn leaves_code_without_polyfill() {
        assert_eq!(strip_module_loader("(function(){run()})();"), None);
    }

    #[test]
    fn function_expression_without_own_call_parens_is_kept() {
        let code = r#"const r=function(){return document.createElement("link").relList}();export{r};"#;
        assert_eq!(strip_module_loader(code), None);
    }

    #[test]
    fn unbalanced_body_is_left_alone() {
        let code = r#"(function(){document.createElement("link").relList;"#;
        assert_eq!(strip_module_loader(code), None);
    }
}
