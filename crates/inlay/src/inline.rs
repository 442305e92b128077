//! Inlining of scripts and stylesheets into the HTML documents of a build.
//!
//! Every document is planned on its own against a read-only view of the
//! bundle, so planning runs in parallel. Plans are then applied in document
//! name order, and files that no longer have a referrer are deleted.

use std::collections::BTreeSet;
use std::ops::Range;
use std::path::Path;

use inlay_config::{InlayConfig, InlineMatcher, InlineOptions};
use inlay_link::{
    Chunk, ChunkMap, Diagnostic, DiagnosticKind, Diagnostics, LinkOptions, Linker, Resolver,
};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::bundle::OutputBundle;
use crate::css::{strip_comments, style_tag};
use crate::html::{Tag, is_external_url, render_script, scan_tags};
use crate::loader::strip_module_loader;
use crate::{Error, Result};

/// What was inlined into one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub name: String,
    /// Entry chunks inlined as scripts, in document order.
    pub scripts: Vec<String>,
    /// Stylesheets inlined as `<style>` elements, in document order.
    pub styles: Vec<String>,
}

/// Outcome of an inline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InlineReport {
    pub documents: Vec<DocumentReport>,
    /// Files removed from the bundle, in name order.
    pub deleted: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl InlineReport {
    pub fn inlined_scripts(&self) -> usize {
        self.documents.iter().map(|d| d.scripts.len()).sum()
    }

    pub fn inlined_styles(&self) -> usize {
        self.documents.iter().map(|d| d.styles.len()).sum()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }
}

#[derive(Debug, Default)]
struct DocumentPlan {
    name: String,
    html: String,
    replacements: Vec<(Range<usize>, String)>,
    /// Chunks and stylesheets whose content now lives in the document.
    consumed: Vec<String>,
    /// Files still referenced by tags that stay in the document.
    referenced: Vec<String>,
    diagnostics: Diagnostics,
    report: DocumentReport,
}

/// Read-only state shared by all document plans of one run.
struct PlanContext<'a> {
    bundle: &'a OutputBundle,
    linker: Linker<'a>,
    styles: Resolver<'a>,
}

/// Inlines the scripts and stylesheets of a build into its HTML documents.
///
/// # Example
///
/// ```
/// use inlay::{InlineOptions, Inliner, OutputBundle};
///
/// let mut bundle = OutputBundle::new();
/// bundle.insert_asset("index.html", r#"<script type="module" src="/app.js"></script>"#);
/// bundle.insert_chunk("app.js", r#"import{m as msg}from"./msg.js";alert(msg);"#);
/// bundle.insert_chunk("msg.js", r#"const m="hi";export{m};"#);
///
/// let report = Inliner::new(InlineOptions::default())?.run(&mut bundle)?;
/// assert_eq!(report.deleted, ["app.js", "msg.js"]);
///
/// let html = bundle.asset_text("index.html").unwrap();
/// assert!(html.starts_with(r#"<script type="module">const __ns_msg = "#));
/// # Ok::<(), inlay::Error>(())
/// ```
#[derive(Debug)]
pub struct Inliner {
    options: InlineOptions,
    matcher: InlineMatcher,
    pool: Option<rayon::ThreadPool>,
}

impl Inliner {
    /// Create an inliner that plans documents on the global rayon pool.
    pub fn new(options: InlineOptions) -> Result<Self> {
        let matcher = options.matcher()?;
        Ok(Self {
            options,
            matcher,
            pool: None,
        })
    }

    /// Create an inliner from a loaded configuration, honoring `parallel_jobs`.
    pub fn from_config(config: &InlayConfig) -> Result<Self> {
        Self::new(config.inline.clone())?.with_parallel_jobs(config.settings.parallel_jobs)
    }

    /// Plan documents on a dedicated pool of `jobs` threads.
    pub fn with_parallel_jobs(mut self, jobs: Option<usize>) -> Result<Self> {
        self.pool = match jobs {
            Some(jobs) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .map_err(|e| Error::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };
        Ok(self)
    }

    pub fn options(&self) -> &InlineOptions {
        &self.options
    }

    /// Inline every HTML document of `bundle` in place.
    pub fn run(&self, bundle: &mut OutputBundle) -> Result<InlineReport> {
        let documents = bundle.html_documents();
        let chunks = bundle.chunk_map();

        let plans = {
            let ctx = PlanContext {
                bundle: &*bundle,
                linker: Linker::new(
                    &chunks,
                    LinkOptions::default().with_namespace_prefix(&self.options.namespace_prefix),
                ),
                styles: Resolver::new(bundle.stylesheets()),
            };
            let plan_all = || {
                documents
                    .par_iter()
                    .map(|name| self.plan_document(&ctx, name))
                    .collect::<Vec<_>>()
            };
            match &self.pool {
                Some(pool) => pool.install(plan_all),
                None => plan_all(),
            }
        };

        let mut report = InlineReport::default();
        let mut consumed = BTreeSet::new();
        let mut referenced = FxHashSet::default();

        for plan in plans {
            let DocumentPlan {
                name,
                mut html,
                mut replacements,
                consumed: plan_consumed,
                referenced: plan_referenced,
                diagnostics,
                report: document,
            } = plan;

            if !replacements.is_empty() {
                replacements.sort_by_key(|(range, _)| std::cmp::Reverse(range.start));
                for (range, text) in replacements {
                    html.replace_range(range, &text);
                }
                bundle.set_asset_text(&name, html);
            }

            consumed.extend(plan_consumed);
            referenced.extend(plan_referenced);
            for diagnostic in diagnostics {
                forward(&name, &diagnostic);
                report.diagnostics.push(diagnostic);
            }

            tracing::debug!(
                document = %name,
                scripts = document.scripts.len(),
                styles = document.styles.len(),
                "inlined document"
            );
            report.documents.push(document);
        }

        if self.options.delete_inlined_files {
            report.deleted = deletable(&chunks, consumed, referenced);
            for name in &report.deleted {
                bundle.remove(name);
            }
        }

        Ok(report)
    }

    /// Inline the build in `dir`.
    ///
    /// With `out_dir` the result is written there and `dir` is left alone.
    /// Without it the build is rewritten in place and deleted files are
    /// removed from disk.
    pub fn run_dir(&self, dir: &Path, out_dir: Option<&Path>) -> Result<InlineReport> {
        let mut bundle = OutputBundle::read_dir(dir)?;
        let report = self.run(&mut bundle)?;

        match out_dir {
            Some(out_dir) => bundle.write_to(out_dir)?,
            None => {
                bundle.write_to(dir)?;
                OutputBundle::prune(dir, &report.deleted)?;
            }
        }
        Ok(report)
    }

    fn plan_document(&self, ctx: &PlanContext<'_>, name: &str) -> DocumentPlan {
        let mut plan = DocumentPlan {
            name: name.to_string(),
            report: DocumentReport {
                name: name.to_string(),
                ..DocumentReport::default()
            },
            ..DocumentPlan::default()
        };

        let Some(html) = ctx.bundle.asset_text(name) else {
            plan.diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::UnsupportedAsset,
                    format!("document '{name}' is not valid UTF-8, skipped"),
                )
                .in_chunk(name),
            );
            return plan;
        };
        plan.html = html.to_string();

        let tags = scan_tags(html);
        let mut replaced = vec![false; tags.len()];

        for (index, tag) in tags.iter().enumerate() {
            let replacement = if let Some(src) = tag.script_src() {
                self.plan_script(ctx, &mut plan, tag, src)
            } else if let Some(href) = tag.stylesheet_href() {
                self.plan_style(ctx, &mut plan, href)
            } else {
                None
            };

            if let Some(text) = replacement {
                plan.replacements.push((tag.range.clone(), text));
                replaced[index] = true;
            }
        }

        // Preload hints for chunks that now live in the document go too.
        for (index, tag) in tags.iter().enumerate() {
            let Some(href) = tag.modulepreload_href() else {
                continue;
            };
            let Ok(target) = ctx.linker.resolver().resolve(href, Some(name)) else {
                continue;
            };
            if plan.consumed.iter().any(|id| id == target.id) {
                plan.replacements.push((tag.range.clone(), String::new()));
                replaced[index] = true;
            }
        }

        for (tag, _) in tags.iter().zip(&replaced).filter(|(_, replaced)| !**replaced) {
            for reference in [tag.attr("src"), tag.attr("href")].into_iter().flatten() {
                let target = ctx
                    .linker
                    .resolver()
                    .resolve(reference, Some(name))
                    .or_else(|_| ctx.styles.resolve(reference, Some(name)));
                if let Ok(target) = target {
                    plan.referenced.push(target.id.to_string());
                }
            }
        }

        plan
    }

    fn plan_script(
        &self,
        ctx: &PlanContext<'_>,
        plan: &mut DocumentPlan,
        tag: &Tag,
        src: &str,
    ) -> Option<String> {
        if is_external_url(src) {
            return None;
        }

        let entry = match ctx.linker.resolve_entry(src, Some(&plan.name)) {
            Ok(entry) => entry,
            Err(err) => {
                plan.diagnostics.push(
                    Diagnostic::warning(DiagnosticKind::UnresolvedEntry, err.to_string())
                        .in_chunk(plan.name.clone())
                        .with_reference(src)
                        .with_help("the script tag is left unchanged"),
                );
                return None;
            }
        };

        if !self.matcher.is_match(entry.id) {
            tracing::debug!(chunk = entry.id, "script does not match inline pattern");
            return None;
        }

        let output = ctx.linker.link_resolved(entry.id);
        if entry.is_ambiguous() {
            plan.diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::AmbiguousImport,
                    format!(
                        "script '{src}' matches {} chunks by file name, using {}",
                        entry.candidates, entry.id
                    ),
                )
                .in_chunk(plan.name.clone())
                .with_reference(src),
            );
        }

        // Only the entry chunk carries the polyfill.
        let stripped = if self.options.remove_module_loader {
            strip_module_loader(output.entry_body())
                .map(|body| format!("{}{body}", output.wrappers()))
        } else {
            None
        };
        let script = stripped.unwrap_or(output.script);

        plan.report.scripts.push(entry.id.to_string());
        plan.consumed.extend(output.consumed);
        plan.diagnostics.extend(output.diagnostics);
        Some(render_script(tag, &script, self.options.cdata))
    }

    fn plan_style(
        &self,
        ctx: &PlanContext<'_>,
        plan: &mut DocumentPlan,
        href: &str,
    ) -> Option<String> {
        if is_external_url(href) {
            return None;
        }

        let Ok(target) = ctx.styles.resolve(href, Some(&plan.name)) else {
            plan.diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::UnresolvedEntry,
                    format!("stylesheet '{href}' is not part of the build"),
                )
                .in_chunk(plan.name.clone())
                .with_reference(href),
            );
            return None;
        };

        if !self.matcher.is_match(target.id) {
            return None;
        }

        let Some(css) = ctx.bundle.asset_text(target.id) else {
            plan.diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::UnsupportedAsset,
                    format!("stylesheet '{}' is not valid UTF-8", target.id),
                )
                .in_chunk(plan.name.clone())
                .with_reference(href),
            );
            return None;
        };

        let css = if self.options.strip_css_comments {
            strip_comments(css)
        } else {
            css.to_string()
        };

        plan.report.styles.push(target.id.to_string());
        plan.consumed.push(target.id.to_string());
        Some(style_tag(&css))
    }
}

/// Consumed files that nothing left in the build still needs.
///
/// A consumed chunk stays when a remaining tag references it or when a
/// chunk that stays imports it.
fn deletable(
    chunks: &ChunkMap,
    consumed: BTreeSet<String>,
    referenced: FxHashSet<String>,
) -> Vec<String> {
    let resolver = Resolver::from_chunks(chunks);
    let mut kept: FxHashSet<String> = referenced;
    let mut pending: Vec<String> = chunks
        .keys()
        .filter(|id| !consumed.contains(*id) || kept.contains(*id))
        .cloned()
        .collect();
    let mut visited = FxHashSet::default();

    while let Some(id) = pending.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        let Some(code) = chunks.get(&id) else {
            continue;
        };
        for source in Chunk::parse(id.as_str(), code.as_str()).sources() {
            if let Ok(target) = resolver.resolve(source, Some(&id)) {
                kept.insert(target.id.to_string());
                pending.push(target.id.to_string());
            }
        }
    }

    consumed
        .into_iter()
        .filter(|name| !kept.contains(name))
        .collect()
}

fn forward(document: &str, diagnostic: &Diagnostic) {
    if diagnostic.is_warning() {
        tracing::warn!(document, kind = diagnostic.kind.as_str(), "{}", diagnostic.message);
    } else {
        tracing::debug!(document, kind = diagnostic.kind.as_str(), "{}", diagnostic.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(files: &[(&str, &str)]) -> OutputBundle {
        let mut bundle = OutputBundle::new();
        for (name, text) in files {
            if name.ends_with(".js") {
                bundle.insert_chunk(*name, *text);
            } else {
                bundle.insert_asset(*name, *text);
            }
        }
        bundle
    }

    const PRELOAD_HELPER: &str = r#"const r=function(){const e=typeof document<"u"&&document.createElement("link").relList;return e&&e.supports&&e.supports("modulepreload")?"modulepreload":"preload"}();export{r};"#;

    fn stripping() -> Inliner {
        Inliner::new(InlineOptions {
            remove_module_loader: true,
            ..InlineOptions::default()
        })
        .unwrap()
    }

    #[test]
    fn loader_removal_keeps_wrapped_preload_helper() {
        let mut bundle = bundle(&[
            ("index.html", r#"<script type="module" src="./app.js"></script>"#),
            ("app.js", r#"import{r as rel}from"./helper.js";console.log(rel);"#),
            ("helper.js", PRELOAD_HELPER),
        ]);
        stripping().run(&mut bundle).unwrap();

        let html = bundle.asset_text("index.html").unwrap();
        assert!(html.contains("const __ns_helper = (() => {\nconst r=function(){"));
        assert!(html.contains("return { r: r };\n})();\n"));
        assert!(html.contains("const { r: rel } = __ns_helper;console.log(rel);</script>"));
    }

    #[test]
    fn loader_removal_strips_entry_polyfill_after_wrappers() {
        let mut bundle = bundle(&[
            ("index.html", r#"<script type="module" src="./app.js"></script>"#),
            (
                "app.js",
                r#"import{r as rel}from"./helper.js";(function(){const t=document.createElement("link").relList;if(t&&t.supports&&t.supports("modulepreload"))return;})();console.log(rel);"#,
            ),
            ("helper.js", PRELOAD_HELPER),
        ]);
        stripping().run(&mut bundle).unwrap();

        let html = bundle.asset_text("index.html").unwrap();
        assert!(html.contains("const __ns_helper = (() => {\nconst r=function(){"));
        assert_eq!(html.matches("relList").count(), 1);
        assert!(!html.contains("(function(){const t="));
        assert!(html.contains("const { r: rel } = __ns_helper;console.log(rel);</script>"));
    }

    #[test]
    fn deletable_keeps_chunks_imported_by_survivors() {
        let chunks: ChunkMap = [
            ("a.js", r#"import"./shared.js";"#),
            ("b.js", r#"import"./shared.js";"#),
            ("shared.js", "x();"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let consumed: BTreeSet<String> = ["a.js", "shared.js"].map(String::from).into();
        assert_eq!(deletable(&chunks, consumed, FxHashSet::default()), vec!["a.js"]);
    }

    #[test]
    fn deletable_respects_remaining_references() {
        let chunks: ChunkMap = [("a.js", "1;")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let consumed: BTreeSet<String> = ["a.js".to_string()].into();
        let referenced: FxHashSet<String> = ["a.js".to_string()].into_iter().collect();
        assert!(deletable(&chunks, consumed, referenced).is_empty());
    }

    #[test]
    fn plan_replaces_script_style_and_preload() {
        let mut bundle = bundle(&[
            (
                "index.html",
                concat!(
                    r#"<head><script type="module" crossorigin src="/assets/index.js"></script>"#,
                    r#"<link rel="modulepreload" href="/assets/dep.js">"#,
                    r#"<link rel="stylesheet" href="/assets/site.css"></head>"#,
                ),
            ),
            ("assets/index.js", r#"import{d}from"./dep.js";d();"#),
            ("assets/dep.js", "function d(){}export{d};"),
            ("assets/site.css", "/* c */body{margin:0}"),
        ]);

        let report = Inliner::new(InlineOptions::default())
            .unwrap()
            .run(&mut bundle)
            .unwrap();

        assert_eq!(
            bundle.asset_text("index.html").unwrap(),
            concat!(
                "<head><script type=\"module\">const __ns_dep = (() => {\nfunction d(){}\n",
                "return { d: d };\n})();\nconst { d: d } = __ns_dep;d();</script>",
                "<style>body{margin:0}</style></head>",
            )
        );
        assert_eq!(report.documents[0].scripts, vec!["assets/index.js"]);
        assert_eq!(report.documents[0].styles, vec!["assets/site.css"]);
        assert_eq!(
            report.deleted,
            vec!["assets/dep.js", "assets/index.js", "assets/site.css"]
        );
        assert!(report.diagnostics.is_empty());
        assert_eq!(bundle.len(), 1);
    }

    #[test]
    fn unresolved_entry_leaves_tag() {
        let page = r#"<script src="./missing.js"></script>"#;
        let mut bundle = bundle(&[("index.html", page)]);

        let report = Inliner::new(InlineOptions::default())
            .unwrap()
            .run(&mut bundle)
            .unwrap();

        assert_eq!(bundle.asset_text("index.html"), Some(page));
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::UnresolvedEntry);
    }

    #[test]
    fn pattern_limits_inlining() {
        let page = r#"<script src="app.js"></script><link rel="stylesheet" href="app.css">"#;
        let mut bundle = bundle(&[("index.html", page), ("app.js", "go();"), ("app.css", "a{}")]);

        let options = InlineOptions {
            inline_pattern: vec!["*.css".to_string()],
            ..InlineOptions::default()
        };
        let report = Inliner::new(options).unwrap().run(&mut bundle).unwrap();

        assert_eq!(
            bundle.asset_text("index.html").unwrap(),
            r#"<script src="app.js"></script><style>a{}</style>"#
        );
        assert_eq!(report.deleted, vec!["app.css"]);
        assert!(bundle.contains("app.js"));
    }

    #[test]
    fn keep_inlined_files() {
        let mut bundle = bundle(&[
            ("index.html", r#"<script src="app.js"></script>"#),
            ("app.js", "go();"),
        ]);
        let options = InlineOptions {
            delete_inlined_files: false,
            ..InlineOptions::default()
        };
        let report = Inliner::new(options).unwrap().run(&mut bundle).unwrap();

        assert!(report.deleted.is_empty());
        assert!(bundle.contains("app.js"));
        assert_eq!(bundle.asset_text("index.html"), Some("<script>go();</script>"));
    }

    #[test]
    fn dedicated_pool() {
        let mut bundle = bundle(&[
            ("a.html", r#"<script src="a.js"></script>"#),
            ("b.html", r#"<script src="a.js"></script>"#),
            ("a.js", "a();"),
        ]);
        let inliner = Inliner::new(InlineOptions::default())
            .unwrap()
            .with_parallel_jobs(Some(2))
            .unwrap();
        let report = inliner.run(&mut bundle).unwrap();

        assert_eq!(report.inlined_scripts(), 2);
        assert_eq!(bundle.asset_text("b.html"), Some("<script>a();</script>"));
        assert_eq!(report.deleted, vec!["a.js"]);
    }
}
