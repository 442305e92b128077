//! Global configuration settings shared across profiles.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Default log filter when neither `RUST_LOG` nor a CLI flag sets one.
    #[serde(default)]
    pub log_level: Option<String>,

    /// Worker threads used to link documents; the rayon default when unset.
    #[serde(default)]
    pub parallel_jobs: Option<usize>,
}
