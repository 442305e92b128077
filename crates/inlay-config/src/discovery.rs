//! File-based config discovery for CLI use
//!
//! Finds the inlay configuration of a project and loads it through figment:
//! built-in defaults, then the config file, then `INLAY_` environment
//! variables (`INLAY_INLINE__CDATA=true` sets `inline.cdata`).

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format as _, Json, Serialized, Toml};
use serde_json::Value;

use crate::config::InlayConfig;
use crate::error::{ConfigError, Result};

/// Prefix of environment variables that override configuration values.
pub const ENV_PREFIX: &str = "INLAY_";

const TOML_FILE: &str = "inlay.toml";
const PACKAGE_JSON: &str = "package.json";
const PACKAGE_FIELD: &str = "inlay";

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use inlay_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. TOML config: inlay.toml
    /// 2. package.json (inlay field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(TOML_FILE);
        if toml_path.is_file() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join(PACKAGE_JSON);
        let has_field = fs::read_to_string(&pkg_path)
            .ok()
            .and_then(|content| serde_json::from_str::<Value>(&content).ok())
            .is_some_and(|parsed| parsed.get(PACKAGE_FIELD).is_some_and(|v| !v.is_null()));
        has_field.then_some(pkg_path)
    }

    /// Load config from the discovered file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<InlayConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        load_file(&path)
    }

    /// Load the discovered config, or defaults plus environment overrides
    /// when the project has none.
    pub fn load_or_default(&self) -> Result<InlayConfig> {
        match self.find() {
            Some(path) => load_file(&path),
            None => extract(base_figment().merge(env_provider())),
        }
    }

    /// Load config with profile merging
    pub fn load_with_profile(&self, profile: &str) -> Result<InlayConfig> {
        self.load()?.materialize_profile(Some(profile))
    }
}

/// Load config from a specific file.
///
/// `package.json` files contribute their `inlay` field, `.json` files are read
/// as JSON, anything else as TOML.
pub fn load_file(path: &Path) -> Result<InlayConfig> {
    // Missing files would otherwise be skipped silently by the providers.
    fs::metadata(path)?;

    let figment = if path.file_name() == Some(std::ffi::OsStr::new(PACKAGE_JSON)) {
        base_figment().merge(Json::string(&package_field(path)?.to_string()))
    } else if path.extension().is_some_and(|ext| ext == "json") {
        base_figment().merge(Json::file(path))
    } else {
        base_figment().merge(Toml::file(path))
    };

    tracing::debug!(path = %path.display(), "loading inlay config");
    extract(figment.merge(env_provider()))
}

fn package_field(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let mut parsed: Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
            field: PACKAGE_JSON.to_string(),
            hint: Some(format!("Invalid JSON: {e}")),
        })?;

    match parsed.get_mut(PACKAGE_FIELD).map(Value::take) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(ConfigError::InvalidValue {
            field: PACKAGE_FIELD.to_string(),
            hint: Some("Add an 'inlay' object to your package.json".to_string()),
        }),
    }
}

fn base_figment() -> Figment {
    Figment::new().merge(Serialized::defaults(InlayConfig::default()))
}

fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).split("__")
}

fn extract(figment: Figment) -> Result<InlayConfig> {
    figment.extract().map_err(|e| ConfigError::InvalidValue {
        field: if e.path.is_empty() {
            "config".to_string()
        } else {
            e.path.join(".")
        },
        hint: Some(e.to_string()),
    })
}

/// Discover and load config from a directory, falling back to defaults.
///
/// # Example
///
/// ```no_run
/// use inlay_config::discover;
///
/// let config = discover(".").unwrap();
/// ```
pub fn discover(root: impl AsRef<Path>) -> Result<InlayConfig> {
    ConfigDiscovery::new(root).load_or_default()
}

/// Discover and load config with profile (convenience function)
pub fn discover_with_profile(root: impl AsRef<Path>, profile: &str) -> Result<InlayConfig> {
    discover(root)?.materialize_profile(Some(profile))
}
