//! In-memory view of a build output directory.
//!
//! Items are keyed by their `/`-separated path relative to the output root,
//! the same names the bundler emitted and HTML documents refer to.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use inlay_link::ChunkMap;
use path_clean::PathClean;
use walkdir::WalkDir;

use crate::{Error, Result};

/// One file of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputItem {
    /// JavaScript chunk (`.js`, `.mjs`).
    Chunk { code: String },
    /// Any other file (HTML, CSS, images, ...).
    Asset { source: Vec<u8> },
}

impl OutputItem {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            OutputItem::Chunk { code } => code.as_bytes(),
            OutputItem::Asset { source } => source,
        }
    }

    pub fn is_chunk(&self) -> bool {
        matches!(self, OutputItem::Chunk { .. })
    }
}

/// Build output keyed by file name, in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBundle {
    items: BTreeMap<String, OutputItem>,
}

impl OutputBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every file below `dir`.
    ///
    /// `.js` and `.mjs` files that are valid UTF-8 become chunks; everything
    /// else is kept as raw bytes.
    pub fn read_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut bundle = Self::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(dir) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let bytes = fs::read(entry.path()).map_err(|e| {
                Error::io(format!("Failed to read '{}'", entry.path().display()), e)
            })?;

            if is_script_name(&name) {
                match String::from_utf8(bytes) {
                    Ok(code) => bundle.insert_chunk(name, code),
                    Err(err) => bundle.insert_asset(name, err.into_bytes()),
                }
            } else {
                bundle.insert_asset(name, bytes);
            }
        }

        tracing::debug!(dir = %dir.display(), files = bundle.len(), "read build output");
        Ok(bundle)
    }

    pub fn insert_chunk(&mut self, name: impl Into<String>, code: impl Into<String>) {
        self.items
            .insert(name.into(), OutputItem::Chunk { code: code.into() });
    }

    pub fn insert_asset(&mut self, name: impl Into<String>, source: impl Into<Vec<u8>>) {
        self.items.insert(
            name.into(),
            OutputItem::Asset {
                source: source.into(),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&OutputItem> {
        self.items.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<OutputItem> {
        self.items.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutputItem)> {
        self.items.iter().map(|(name, item)| (name.as_str(), item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All JavaScript chunks, for the linker.
    pub fn chunk_map(&self) -> ChunkMap {
        self.items
            .iter()
            .filter_map(|(name, item)| match item {
                OutputItem::Chunk { code } => Some((name.clone(), code.clone())),
                OutputItem::Asset { .. } => None,
            })
            .collect()
    }

    /// Names of HTML documents, in name order.
    pub fn html_documents(&self) -> Vec<String> {
        self.names()
            .filter(|name| {
                let lower = name.to_ascii_lowercase();
                lower.ends_with(".html") || lower.ends_with(".htm")
            })
            .map(str::to_string)
            .collect()
    }

    /// Names of stylesheet assets.
    pub fn stylesheets(&self) -> impl Iterator<Item = &str> {
        self.names()
            .filter(|name| name.to_ascii_lowercase().ends_with(".css"))
    }

    /// Text of an item, if it is valid UTF-8.
    pub fn asset_text(&self, name: &str) -> Option<&str> {
        match self.items.get(name)? {
            OutputItem::Chunk { code } => Some(code),
            OutputItem::Asset { source } => std::str::from_utf8(source).ok(),
        }
    }

    /// Replace the contents of `name` with `text`, keeping its kind.
    pub fn set_asset_text(&mut self, name: &str, text: String) {
        match self.items.get_mut(name) {
            Some(OutputItem::Chunk { code }) => *code = text,
            Some(OutputItem::Asset { source }) => *source = text.into_bytes(),
            None => self.insert_asset(name, text.into_bytes()),
        }
    }

    /// Write every item below `dir`, creating directories as needed.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref().clean();
        fs::create_dir_all(&dir).map_err(|e| {
            Error::io(
                format!("Failed to create output directory '{}'", dir.display()),
                e,
            )
        })?;

        for (name, item) in &self.items {
            let target = validate_output_path(&dir, name)?;
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::io(format!("Failed to create directory '{}'", parent.display()), e)
                })?;
            }
            fs::write(&target, item.as_bytes())
                .map_err(|e| Error::io(format!("Failed to write '{}'", target.display()), e))?;
        }

        tracing::debug!(dir = %dir.display(), files = self.items.len(), "wrote build output");
        Ok(())
    }

    /// Delete `removed` files from an existing output directory.
    pub fn prune(dir: impl AsRef<Path>, removed: &[String]) -> Result<()> {
        let dir = dir.as_ref().clean();
        for name in removed {
            let target = validate_output_path(&dir, name)?;
            if target.is_file() {
                fs::remove_file(&target).map_err(|e| {
                    Error::io(format!("Failed to delete '{}'", target.display()), e)
                })?;
            }
        }
        Ok(())
    }
}

fn is_script_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".js") || lower.ends_with(".mjs")
}

/// Join `filename` to `base_dir`, refusing paths that escape it.
fn validate_output_path(base_dir: &Path, filename: &str) -> Result<PathBuf> {
    if filename.contains('\0') {
        return Err(Error::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    let full_path = base_dir.join(Path::new(filename).clean()).clean();
    if !full_path.starts_with(base_dir) || full_path == base_dir {
        return Err(Error::InvalidOutputPath(format!(
            "Path '{}' escapes output directory '{}'",
            filename,
            base_dir.display()
        )));
    }

    Ok(full_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_dir_classifies_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::write(dir.path().join("assets/index.js"), "run();").unwrap();
        fs::write(dir.path().join("assets/style.css"), "a{}").unwrap();
        fs::write(dir.path().join("assets/logo.png"), [0x89, 0x50, 0xff]).unwrap();

        let bundle = OutputBundle::read_dir(dir.path()).unwrap();
        assert_eq!(
            bundle.names().collect::<Vec<_>>(),
            vec!["assets/index.js", "assets/logo.png", "assets/style.css", "index.html"]
        );
        assert!(bundle.get("assets/index.js").unwrap().is_chunk());
        assert_eq!(bundle.html_documents(), vec!["index.html"]);
        assert_eq!(bundle.stylesheets().collect::<Vec<_>>(), vec!["assets/style.css"]);
        assert_eq!(bundle.chunk_map().len(), 1);
        assert_eq!(bundle.asset_text("assets/logo.png"), None);
    }

    #[test]
    fn write_and_prune_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut bundle = OutputBundle::new();
        bundle.insert_asset("index.html", "<p>hi</p>");
        bundle.insert_chunk("assets/a.js", "a();");
        bundle.write_to(dir.path()).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("assets/a.js")).unwrap(),
            "a();"
        );

        OutputBundle::prune(dir.path(), &["assets/a.js".to_string()]).unwrap();
        assert!(!dir.path().join("assets/a.js").exists());
        assert!(dir.path().join("index.html").exists());
    }

    #[test]
    fn set_asset_text_keeps_kind() {
        let mut bundle = OutputBundle::new();
        bundle.insert_chunk("a.js", "old");
        bundle.set_asset_text("a.js", "new".to_string());
        assert_eq!(bundle.get("a.js"), Some(&OutputItem::Chunk { code: "new".into() }));
    }

    #[test]
    fn traversal_is_rejected() {
        let base = Path::new("/tmp/output");
        assert!(validate_output_path(base, "../etc/passwd").is_err());
        assert!(validate_output_path(base, "a/../../x").is_err());
        assert!(validate_output_path(base, "file\0.js").is_err());
        assert_eq!(
            validate_output_path(base, "./a/b.js").unwrap(),
            Path::new("/tmp/output/a/b.js")
        );
    }
}
