//! Top-level configuration and profile merging.
//!
//! For file discovery, see the `discovery` module.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result as ConfigResult};
use crate::options::InlineOptions;
use crate::settings::GlobalSettings;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InlayConfig {
    #[serde(default)]
    pub inline: InlineOptions,

    #[serde(default)]
    pub settings: GlobalSettings,

    #[serde(default)]
    pub profiles: HashMap<String, ProfileConfig>,
}

/// Partial overrides applied on top of the base config by `materialize_profile`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub inline: Value,

    #[serde(default)]
    pub settings: Value,
}

impl InlayConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use inlay_config::InlayConfig;
    /// use serde_json::json;
    ///
    /// let value = json!({
    ///     "inline": {
    ///         "inline_pattern": ["assets/*.js"],
    ///         "cdata": true
    ///     }
    /// });
    ///
    /// let config = InlayConfig::from_value(value).unwrap();
    /// assert!(config.inline.cdata);
    /// assert!(config.inline.delete_inlined_files);
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Apply the overrides of profile `profile` (if any) on top of the base values.
    ///
    /// Naming a profile that is not defined is an error.
    pub fn materialize_profile(mut self, profile: Option<&str>) -> ConfigResult<Self> {
        let Some(name) = profile else {
            return Ok(self);
        };
        let profile_cfg = self
            .profiles
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.to_string(),
            })?;

        if !profile_cfg.inline.is_null() {
            self.inline = merged(&self.inline, &profile_cfg.inline)?;
        }
        if !profile_cfg.settings.is_null() {
            self.settings = merged(&self.settings, &profile_cfg.settings)?;
        }

        tracing::debug!(profile = name, "applied config profile");
        Ok(self)
    }
}

fn merged<T>(base: &T, update: &Value) -> ConfigResult<T>
where
    T: Serialize + serde::de::DeserializeOwned,
{
    let mut value = serde_json::to_value(base).map_err(|err| ConfigError::InvalidProfileOverride {
        message: err.to_string(),
    })?;
    merge_values(&mut value, update);
    serde_json::from_value(value).map_err(|err| ConfigError::InvalidProfileOverride {
        message: err.to_string(),
    })
}

/// Deep-merge `update` into `target`. Objects merge key by key; anything else
/// (arrays included) replaces the target value.
pub fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}
