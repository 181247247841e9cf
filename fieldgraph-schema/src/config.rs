//! Schema configuration, read from a TOML file.
//!
//! Every key has a default, so an empty or missing file yields the stock
//! naming (`Field<Category>`, `Field<Category>Repeatable`) and binding.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SchemaError};

/// Composite type naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConfig {
    #[serde(default = "default_type_prefix")]
    pub type_prefix: String,
    #[serde(default = "default_repeatable_suffix")]
    pub repeatable_suffix: String,
}

fn default_type_prefix() -> String {
    "Field".to_string()
}

fn default_repeatable_suffix() -> String {
    "Repeatable".to_string()
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            type_prefix: default_type_prefix(),
            repeatable_suffix: default_repeatable_suffix(),
        }
    }
}

/// How field groups are queried and how registrations are described.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    #[serde(default = "default_field_description")]
    pub field_description: String,
    #[serde(default = "default_type_description")]
    pub type_description: String,
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

fn default_field_description() -> String {
    "Custom field".to_string()
}

fn default_type_description() -> String {
    "Custom field type".to_string()
}

fn default_domain() -> String {
    "posts".to_string()
}

fn default_active_only() -> bool {
    true
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            field_description: default_field_description(),
            type_description: default_type_description(),
            domain: default_domain(),
            active_only: default_active_only(),
        }
    }
}

/// Static hook overrides, keyed by naming context (`post_type`,
/// `taxonomy`, `custom_field`, `custom_field_type`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverridesConfig {
    /// context -> original text -> name
    #[serde(default)]
    pub names: BTreeMap<String, BTreeMap<String, String>>,
    /// context -> slug -> exposed
    #[serde(default)]
    pub exposure: BTreeMap<String, BTreeMap<String, bool>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub binding: BindingConfig,
    #[serde(default)]
    pub overrides: OverridesConfig,
}

impl SchemaConfig {
    /// Parses a config document, failing on malformed TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| SchemaError::Config(e.to_string()))
    }

    /// Loads config from a file.
    /// A missing, unreadable or unparsable file falls back to the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No schema config found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded schema config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!(
                        "Failed to parse schema config {:?}: {}. Falling back to defaults.",
                        path, e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read schema config {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}
