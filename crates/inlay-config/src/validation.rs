//! Config validation

use crate::config::InlayConfig;
use crate::error::{ConfigError, Result};
use crate::options::InlineMatcher;

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &InlayConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use inlay_config::{ConfigValidator, InlayConfig, SchemaValidator};
///
/// let mut config = InlayConfig::default();
/// config.inline.inline_pattern = vec!["assets/*.js".into()];
///
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &InlayConfig) -> Result<()> {
        let inline = &config.inline;

        for pattern in &inline.inline_pattern {
            if pattern.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "inline patterns cannot be empty".to_string(),
                    hint: Some("Remove empty strings from 'inline_pattern'".to_string()),
                });
            }
        }
        InlineMatcher::new(&inline.inline_pattern)?;

        if !is_identifier_prefix(&inline.namespace_prefix) {
            return Err(ConfigError::SchemaValidation {
                message: format!(
                    "namespace prefix '{}' is not a valid identifier start",
                    inline.namespace_prefix
                ),
                hint: Some(
                    "Use letters, digits, '_' or '$', not starting with a digit".to_string(),
                ),
            });
        }

        if config.settings.parallel_jobs == Some(0) {
            return Err(ConfigError::SchemaValidation {
                message: "parallel_jobs must be at least 1".to_string(),
                hint: Some("Leave parallel_jobs unset to use every core".to_string()),
            });
        }

        Ok(())
    }
}

fn is_identifier_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Convenience function for schema-only validation
pub fn validate_schema(config: &InlayConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_schema(&InlayConfig::default()).is_ok());
    }

    #[test]
    fn rejects_empty_pattern() {
        let mut config = InlayConfig::default();
        config.inline.inline_pattern = vec!["**/*.js".to_string(), "  ".to_string()];
        assert!(matches!(
            validate_schema(&config),
            Err(ConfigError::SchemaValidation { .. })
        ));
    }

    #[test]
    fn rejects_bad_namespace_prefix() {
        for prefix in ["", "9ns", "ns-"] {
            let mut config = InlayConfig::default();
            config.inline.namespace_prefix = prefix.to_string();
            assert!(validate_schema(&config).is_err(), "{prefix:?} should be rejected");
        }

        let mut config = InlayConfig::default();
        config.inline.namespace_prefix = "$m".to_string();
        assert!(validate_schema(&config).is_ok());
    }

    #[test]
    fn rejects_zero_parallel_jobs() {
        let mut config = InlayConfig::default();
        config.settings.parallel_jobs = Some(0);
        assert!(validate_schema(&config).is_err());
    }
}
