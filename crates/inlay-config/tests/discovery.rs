//! Tests for config discovery, profiles and environment overrides.

use std::fs;
use std::sync::{Mutex, OnceLock};

use inlay_config::{ConfigDiscovery, ConfigError, discover, discover_with_profile};
use tempfile::TempDir;

/// Environment variables are process-wide, so every test that loads a config
/// takes this lock.
fn test_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

#[test]
fn loads_toml_config() {
    let _guard = test_lock().lock().expect("lock");
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("inlay.toml"),
        r#"
[inline]
inline_pattern = ["assets/*.js", "assets/*.css"]
remove_module_loader = true

[settings]
parallel_jobs = 2
"#,
    )
    .expect("write config");

    let config = ConfigDiscovery::new(dir.path()).load().expect("load");
    assert_eq!(config.inline.inline_pattern, vec!["assets/*.js", "assets/*.css"]);
    assert!(config.inline.remove_module_loader);
    assert!(config.inline.delete_inlined_files);
    assert_eq!(config.settings.parallel_jobs, Some(2));
}

#[test]
fn loads_package_json_field() {
    let _guard = test_lock().lock().expect("lock");
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("package.json"),
        r#"{
            "name": "site",
            "inlay": { "inline": { "cdata": true, "namespace_prefix": "$c_" } }
        }"#,
    )
    .expect("write package.json");

    let config = ConfigDiscovery::new(dir.path()).load().expect("load");
    assert!(config.inline.cdata);
    assert_eq!(config.inline.namespace_prefix, "$c_");
}

#[test]
fn profile_overrides_inline_options() {
    let _guard = test_lock().lock().expect("lock");
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("inlay.toml"),
        r#"
[inline]
delete_inlined_files = true
strip_css_comments = true

[profiles.debug.inline]
delete_inlined_files = false
strip_css_comments = false

[profiles.debug.settings]
log_level = "debug"
"#,
    )
    .expect("write config");

    let config = discover_with_profile(dir.path(), "debug").expect("load with profile");
    assert!(!config.inline.delete_inlined_files);
    assert!(!config.inline.strip_css_comments);
    assert_eq!(config.settings.log_level.as_deref(), Some("debug"));

    let err = discover_with_profile(dir.path(), "release").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownProfile { .. }));
}

#[test]
fn discover_falls_back_to_defaults() {
    let _guard = test_lock().lock().expect("lock");
    let dir = TempDir::new().expect("tempdir");
    let config = discover(dir.path()).expect("defaults");
    assert_eq!(config, inlay_config::InlayConfig::default());
}

#[test]
fn environment_overrides_file_values() {
    let _guard = test_lock().lock().expect("lock");
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("inlay.toml"), "[inline]\ncdata = false\n").expect("write config");

    // SAFETY: guarded by the test lock; no other thread reads the environment meanwhile.
    unsafe { std::env::set_var("INLAY_INLINE__CDATA", "true") };
    let result = ConfigDiscovery::new(dir.path()).load();
    unsafe { std::env::remove_var("INLAY_INLINE__CDATA") };

    assert!(result.expect("load").inline.cdata);
}

#[test]
fn invalid_value_names_the_field() {
    let _guard = test_lock().lock().expect("lock");
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("inlay.toml"), "[inline]\ncdata = \"sometimes\"\n")
        .expect("write config");

    let err = ConfigDiscovery::new(dir.path()).load().unwrap_err();
    match err {
        ConfigError::InvalidValue { field, hint } => {
            assert!(field.ends_with("cdata"), "{field}");
            assert!(hint.is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
}
