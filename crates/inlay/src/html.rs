//! Script and stylesheet tag scanning.
//!
//! Bundler HTML is regular enough that a tag-level scan suffices: only
//! `<script>` elements and `<link>` tags are located, with their byte ranges
//! and attributes, so they can be replaced in place.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").expect("valid script regex")
});

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<link\b([^>]*)>").expect("valid link regex"));

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("valid attribute regex")
});

static SCRIPT_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(script)").expect("valid close tag regex"));

const DROPPED_SCRIPT_ATTRS: [&str; 3] = ["src", "crossorigin", "integrity"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Script,
    Link,
}

/// One attribute; `value` is `None` for bare attributes such as `defer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased name.
    pub name: String,
    pub value: Option<String>,
}

/// A located `<script>` element or `<link>` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub kind: TagKind,
    /// Byte range of the whole element in the document.
    pub range: Range<usize>,
    pub attrs: Vec<Attribute>,
    /// Text between `<script>` and `</script>`; empty for links.
    pub body: String,
}

impl Tag {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_deref().unwrap_or_default())
    }

    fn rel_contains(&self, token: &str) -> bool {
        self.attr("rel").is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|t| t.eq_ignore_ascii_case(token))
        })
    }

    /// `src` of a script element, if present and non-empty.
    pub fn script_src(&self) -> Option<&str> {
        match self.kind {
            TagKind::Script => self.attr("src").filter(|s| !s.trim().is_empty()),
            TagKind::Link => None,
        }
    }

    /// `href` of a `<link rel="stylesheet">`.
    pub fn stylesheet_href(&self) -> Option<&str> {
        match self.kind {
            TagKind::Link if self.rel_contains("stylesheet") => {
                self.attr("href").filter(|s| !s.trim().is_empty())
            }
            _ => None,
        }
    }

    /// `href` of a `<link rel="modulepreload">`.
    pub fn modulepreload_href(&self) -> Option<&str> {
        match self.kind {
            TagKind::Link if self.rel_contains("modulepreload") => {
                self.attr("href").filter(|s| !s.trim().is_empty())
            }
            _ => None,
        }
    }
}

/// Locate script elements and link tags in document order.
///
/// `<link` text inside a script body is not reported.
pub fn scan_tags(html: &str) -> Vec<Tag> {
    let mut tags: Vec<Tag> = SCRIPT_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Tag {
                kind: TagKind::Script,
                range: whole.range(),
                attrs: parse_attributes(caps.get(1).map_or("", |m| m.as_str())),
                body: caps.get(2).map_or("", |m| m.as_str()).to_string(),
            })
        })
        .collect();

    let links: Vec<Tag> = LINK_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inside_script = tags
                .iter()
                .any(|t| t.range.start <= whole.start() && whole.end() <= t.range.end);
            if inside_script {
                return None;
            }
            Some(Tag {
                kind: TagKind::Link,
                range: whole.range(),
                attrs: parse_attributes(caps.get(1).map_or("", |m| m.as_str())),
                body: String::new(),
            })
        })
        .collect();

    tags.extend(links);
    tags.sort_by_key(|t| t.range.start);
    tags
}

fn parse_attributes(source: &str) -> Vec<Attribute> {
    ATTR_RE
        .captures_iter(source)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string());
            Some(Attribute { name, value })
        })
        .collect()
}

/// True for references that point outside the build (`https:`, `data:`, `//host`).
pub fn is_external_url(reference: &str) -> bool {
    inlay_link::is_non_local(reference.trim())
}

/// Render an inline `<script>` replacing `tag`.
///
/// Loading attributes are dropped; the rest are kept in order.
pub fn render_script(tag: &Tag, code: &str, cdata: bool) -> String {
    let mut out = String::with_capacity(code.len() + 64);
    out.push_str("<script");
    for attr in tag
        .attrs
        .iter()
        .filter(|a| !DROPPED_SCRIPT_ATTRS.contains(&a.name.as_str()))
    {
        push_attribute(&mut out, attr);
    }
    out.push('>');

    let escaped = escape_script(code);
    if cdata {
        out.push_str("//<![CDATA[\n");
        out.push_str(&escaped);
        out.push_str("\n//]]>");
    } else {
        out.push_str(&escaped);
    }
    out.push_str("</script>");
    out
}

fn push_attribute(out: &mut String, attr: &Attribute) {
    out.push(' ');
    out.push_str(&attr.name);
    if let Some(value) = &attr.value {
        out.push_str("=\"");
        out.push_str(&value.replace('"', "&quot;"));
        out.push('"');
    }
}

/// Escape closing script tags so inlined code cannot end its element early.
pub fn escape_script(code: &str) -> String {
    SCRIPT_CLOSE_RE.replace_all(code, "<\\/$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html>
<head>
  <script type="module" crossorigin src="/assets/index-4f2a1c9b.js"></script>
  <link rel="modulepreload" crossorigin href="/assets/vendor-9d8e7f6a.js">
  <link rel="stylesheet" href="/assets/index-aa11bb22.css" />
  <script>const s = "<link rel=stylesheet href=x.css>";</script>
</head>
<body></body>
</html>"#;

    #[test]
    fn scans_scripts_and_links_in_order() {
        let tags = scan_tags(PAGE);
        assert_eq!(tags.len(), 4);
        assert_eq!(tags[0].script_src(), Some("/assets/index-4f2a1c9b.js"));
        assert_eq!(tags[1].modulepreload_href(), Some("/assets/vendor-9d8e7f6a.js"));
        assert_eq!(tags[2].stylesheet_href(), Some("/assets/index-aa11bb22.css"));
        assert_eq!(tags[3].script_src(), None);
        assert!(tags[3].body.contains("<link"));
        assert_eq!(&PAGE[tags[0].range.clone()], r#"<script type="module" crossorigin src="/assets/index-4f2a1c9b.js"></script>"#);
    }

    #[test]
    fn parses_quoted_unquoted_and_bare_attributes() {
        let attrs = parse_attributes(r#" type=module defer data-x='a b' SRC="x.js" /"#);
        let pairs: Vec<(&str, Option<&str>)> = attrs
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_deref()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("type", Some("module")),
                ("defer", None),
                ("data-x", Some("a b")),
                ("src", Some("x.js")),
            ]
        );
    }

    #[test]
    fn render_drops_loading_attributes() {
        let tag = &scan_tags(PAGE)[0];
        assert_eq!(
            render_script(tag, "run();", false),
            r#"<script type="module">run();</script>"#
        );
    }

    #[test]
    fn render_escapes_closing_tags_and_wraps_cdata() {
        let tag = &scan_tags(r#"<script defer src="a.js"></script>"#)[0];
        assert_eq!(
            render_script(tag, r#"s="</SCRIPT>";"#, true),
            "<script defer>//<![CDATA[\ns=\"<\\/SCRIPT>\";\n//]]></script>"
        );
    }

    #[test]
    fn external_urls() {
        assert!(is_external_url("https://cdn.example.com/x.js"));
        assert!(is_external_url("//cdn.example.com/x.js"));
        assert!(is_external_url("data:text/javascript,1"));
        assert!(!is_external_url("./assets/x.js"));
        assert!(!is_external_url("/assets/x.js"));
    }
}
