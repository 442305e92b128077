pub mod config;
pub mod discovery;
pub mod error;
pub mod options;
pub mod settings;
pub mod validation;

// Re-export main types
pub use config::*;
pub use error::*;
pub use options::*;
pub use settings::*;

// Re-export discovery and validation
pub use discovery::{ConfigDiscovery, ENV_PREFIX, discover, discover_with_profile};
pub use validation::{ConfigValidator, SchemaValidator, validate_schema};
