//! Import / export statement extraction.
//!
//! Chunks handed to the linker are machine-generated module code, so statement
//! shapes are recognized with one pattern instead of a full parser. Scanning
//! splits a chunk into [`Segment`]s: statement segments carry the parsed
//! [`Statement`], everything in between stays opaque [`SegmentKind::Code`].
//!
//! Recognized shapes:
//!
//! ```text
//! import { a as b, c } from "./x.js";   NamedImport
//! import "./x.js";                      BareImport
//! export { a as b } from "./x.js";      ReExport
//! export { a as b, c };                 ExportClause
//! ```
//!
//! Statements inside string literals or comments are not distinguished from
//! real ones; arbitrary hand-written source is not a supported input.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?x)
        \bimport\s*\{(?P<import_list>[^}]*)\}\s*from\s*(?:"(?P<import_dq>[^"]*)"|'(?P<import_sq>[^']*)')(?:\s*;)?
        | \bimport\s*(?:"(?P<bare_dq>[^"]*)"|'(?P<bare_sq>[^']*)')(?:\s*;)?
        | \bexport\s*\{(?P<reexport_list>[^}]*)\}\s*from\s*(?:"(?P<reexport_dq>[^"]*)"|'(?P<reexport_sq>[^']*)')(?:\s*;)?
        | \bexport\s*\{(?P<export_list>[^}]*)\}(?:\s*;)?
        "#,
    )
    .expect("statement pattern is valid")
});

/// One `name` or `name as alias` entry of a braced specifier list.
///
/// For imports `name` is the imported name and `alias` the local binding; for
/// exports `name` is the local binding and `alias` the exported name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    pub name: String,
    pub alias: String,
}

impl Binding {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }

    pub fn is_aliased(&self) -> bool {
        self.name != self.alias
    }
}

/// A recognized module statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    NamedImport { bindings: Vec<Binding>, source: String },
    BareImport { source: String },
    ReExport { bindings: Vec<Binding>, source: String },
    ExportClause { bindings: Vec<Binding> },
}

impl Statement {
    /// Module reference of import and re-export statements.
    pub fn source(&self) -> Option<&str> {
        match self {
            Statement::NamedImport { source, .. }
            | Statement::BareImport { source }
            | Statement::ReExport { source, .. } => Some(source),
            Statement::ExportClause { .. } => None,
        }
    }

    pub fn is_import(&self) -> bool {
        matches!(
            self,
            Statement::NamedImport { .. } | Statement::BareImport { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Text that is not a recognized statement.
    Code,
    Statement(Statement),
}

/// A slice of chunk text together with what it was recognized as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

impl Segment {
    pub fn code(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Code,
            text: text.into(),
        }
    }

    pub fn statement(&self) -> Option<&Statement> {
        match &self.kind {
            SegmentKind::Statement(statement) => Some(statement),
            SegmentKind::Code => None,
        }
    }
}

/// Split chunk text into code and statement segments.
///
/// Concatenating the `text` of every returned segment reproduces `code`.
pub fn scan(code: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in STATEMENT.captures_iter(code) {
        let Some(whole) = caps.get(0) else { continue };
        let Some(statement) = statement_from(&caps) else {
            continue;
        };

        if whole.start() > cursor {
            segments.push(Segment::code(&code[cursor..whole.start()]));
        }
        segments.push(Segment {
            kind: SegmentKind::Statement(statement),
            text: whole.as_str().to_string(),
        });
        cursor = whole.end();
    }

    if cursor < code.len() {
        segments.push(Segment::code(&code[cursor..]));
    }

    segments
}

/// Classify a single statement.
///
/// Returns `None` (no match) unless the whole of `text`, ignoring surrounding
/// whitespace, is one recognized statement.
pub fn match_statement(text: &str) -> Option<Statement> {
    let text = text.trim();
    let caps = STATEMENT.captures(text)?;
    let whole = caps.get(0)?;
    if whole.start() != 0 || whole.end() != text.len() {
        return None;
    }
    statement_from(&caps)
}

fn statement_from(caps: &Captures<'_>) -> Option<Statement> {
    let quoted = |dq: &str, sq: &str| {
        caps.name(dq)
            .or_else(|| caps.name(sq))
            .map(|m| m.as_str().to_string())
    };

    if let Some(list) = caps.name("import_list") {
        let source = quoted("import_dq", "import_sq")?;
        return Some(Statement::NamedImport {
            bindings: parse_bindings(list.as_str()),
            source,
        });
    }
    if let Some(source) = quoted("bare_dq", "bare_sq") {
        return Some(Statement::BareImport { source });
    }
    if let Some(list) = caps.name("reexport_list") {
        let source = quoted("reexport_dq", "reexport_sq")?;
        return Some(Statement::ReExport {
            bindings: parse_bindings(list.as_str()),
            source,
        });
    }
    caps.name("export_list")
        .map(|list| Statement::ExportClause {
            bindings: parse_bindings(list.as_str()),
        })
}

/// Parse the inside of `{ ... }`. Entries that are not `name` or
/// `name as alias` (string names, stray tokens) are dropped.
pub fn parse_bindings(list: &str) -> Vec<Binding> {
    list.split(',')
        .filter_map(|entry| {
            let tokens: Vec<&str> = entry.split_whitespace().collect();
            match tokens.as_slice() {
                [name] if is_identifier(name) => Some(Binding::new(*name, *name)),
                [name, "as", alias] if is_identifier(name) && is_identifier(alias) => {
                    Some(Binding::new(*name, *alias))
                }
                _ => None,
            }
        })
        .collect()
}

pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first == '_' || first == '$' || first.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_minified_named_import() {
        let statement = match_statement(r#"import{a as b,c}from"./x.js";"#).unwrap();
        assert_eq!(
            statement,
            Statement::NamedImport {
                bindings: vec![Binding::new("a", "b"), Binding::new("c", "c")],
                source: "./x.js".to_string(),
            }
        );
    }

    #[test]
    fn matches_spaced_single_quoted_import() {
        let statement = match_statement("import { a as b } from './x.js'").unwrap();
        assert_eq!(statement.source(), Some("./x.js"));
    }

    #[test]
    fn matches_multiline_import() {
        let text = "import {\n  alpha,\n  beta as gamma,\n} from \"./x.js\";";
        let Some(Statement::NamedImport { bindings, .. }) = match_statement(text) else {
            panic!("expected named import");
        };
        assert_eq!(
            bindings,
            vec![Binding::new("alpha", "alpha"), Binding::new("beta", "gamma")]
        );
    }

    #[test]
    fn matches_bare_import() {
        assert_eq!(
            match_statement(r#"import"./side.js";"#),
            Some(Statement::BareImport {
                source: "./side.js".to_string()
            })
        );
    }

    #[test]
    fn matches_export_clause_and_reexport() {
        assert_eq!(
            match_statement("export { a as b, c };"),
            Some(Statement::ExportClause {
                bindings: vec![Binding::new("a", "b"), Binding::new("c", "c")],
            })
        );
        assert_eq!(
            match_statement(r#"export{x as y}from"./dep.js""#),
            Some(Statement::ReExport {
                bindings: vec![Binding::new("x", "y")],
                source: "./dep.js".to_string(),
            })
        );
    }

    #[test]
    fn rejects_other_shapes() {
        assert_eq!(match_statement("import x from './x.js'"), None);
        assert_eq!(match_statement("import * as ns from './x.js'"), None);
        assert_eq!(match_statement("import('./lazy.js')"), None);
        assert_eq!(match_statement("export default foo"), None);
        assert_eq!(match_statement("const a = 1"), None);
        assert_eq!(match_statement("import './a.js'; foo()"), None);
    }

    #[test]
    fn dynamic_import_and_import_meta_are_code() {
        let segments = scan("const m = import('./lazy.js'); console.log(import.meta.url);");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Code);
    }

    #[test]
    fn scan_preserves_text() {
        let code = "import{a}from\"./a.js\";\nimport \"./b.js\";\nconst x = a + 1;\nexport { x };\n";
        let segments = scan(code);
        let rebuilt: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(rebuilt, code);

        let statements: Vec<_> = segments.iter().filter_map(Segment::statement).collect();
        assert_eq!(statements.len(), 3);
        assert!(statements[0].is_import());
        assert!(statements[1].is_import());
        assert!(matches!(statements[2], Statement::ExportClause { .. }));
    }

    #[test]
    fn identifier_prefix_does_not_match() {
        let segments = scan("reimport{a}from\"./a.js\";_export{b};");
        assert!(segments.iter().all(|s| s.kind == SegmentKind::Code));
    }

    #[test]
    fn bindings_drop_malformed_entries() {
        let bindings = parse_bindings(r#" a , "weird name" as b, c as, d as e f, $g as _h "#);
        assert_eq!(
            bindings,
            vec![Binding::new("a", "a"), Binding::new("$g", "_h")]
        );
    }

    #[test]
    fn empty_braces_parse_to_no_bindings() {
        let Some(Statement::NamedImport { bindings, .. }) = match_statement("import {} from './x.js'")
        else {
            panic!("expected named import");
        };
        assert!(bindings.is_empty());
    }

    #[test]
    fn identifier_rules() {
        assert!(is_identifier("_a1"));
        assert!(is_identifier("$"));
        assert!(!is_identifier("1a"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }
}
