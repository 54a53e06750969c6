pub mod app_config;
pub mod config;
pub mod family;
pub mod fields;
pub mod records;

pub use app_config::{AppConfig, Pacing};
pub use config::{load_app_config, load_app_config_from_env};
pub use family::PageFamily;
pub use records::{FieldMap, FieldValue, ItemIdentifier, NormalizedRecord, RawRecord};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
