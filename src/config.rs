//! Engine configuration, loadable from TOML.
//!
//! ```toml
//! missing_field = "reject"
//! minor_units = 2
//! require_base_fare = true
//!
//! [[fields]]
//! name = "parcel_class"
//! label = "Parcel Class"
//! kind = "enum"
//! values = ["envelope", "box", "bulky"]
//! ```
//!
//! Every key is optional. Extra `[[fields]]` extend the built-in delivery
//! catalogue; redefining a built-in field is an error.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{FieldKind, FieldRegistry};

/// Largest scale a `rust_decimal::Decimal` can hold.
const MAX_MINOR_UNITS: u32 = 28;

/// What a condition does when the order context lacks its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// The condition is false; a warning is logged.
    #[default]
    NonMatch,
    /// The rule is skipped and the error recorded in the breakdown.
    Reject,
}

/// Kind names accepted in a `[[fields]]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKindName {
    Number,
    Enum,
    Text,
}

/// A field declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub kind: FieldKindName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl FieldDef {
    fn to_kind(&self) -> Result<FieldKind, ConfigError> {
        match self.kind {
            FieldKindName::Enum if self.values.is_empty() => Err(ConfigError::EmptyEnum {
                name: self.name.clone(),
            }),
            FieldKindName::Enum => Ok(FieldKind::Enum(self.values.clone())),
            _ if !self.values.is_empty() => Err(ConfigError::UnexpectedValues {
                name: self.name.clone(),
            }),
            FieldKindName::Number => Ok(FieldKind::Number),
            FieldKindName::Text => Ok(FieldKind::Text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub missing_field: MissingFieldPolicy,
    /// Decimal places of the currency's minor unit (2 for kobo or cents).
    pub minor_units: u32,
    /// Fail the quote when no triggered rule supplies a base fare.
    pub require_base_fare: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDef>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            missing_field: MissingFieldPolicy::NonMatch,
            minor_units: 2,
            require_base_fare: false,
            fields: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read engine config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("field '{name}' is already defined")]
    DuplicateField { name: String },

    #[error("enum field '{name}' declares no values")]
    EmptyEnum { name: String },

    #[error("field '{name}' lists values but is not an enum")]
    UnexpectedValues { name: String },

    #[error("minor_units must be at most 28, got {value}")]
    MinorUnits { value: u32 },
}

impl EngineConfig {
    /// Parse a TOML document into a config and check it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or fails validation.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.registry()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on I/O, parse, or validation failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Build the field registry: the delivery catalogue plus configured fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on duplicate or malformed field definitions,
    /// or an out-of-range `minor_units`.
    pub fn registry(&self) -> Result<FieldRegistry, ConfigError> {
        if self.minor_units > MAX_MINOR_UNITS {
            return Err(ConfigError::MinorUnits {
                value: self.minor_units,
            });
        }
        let mut registry = FieldRegistry::delivery();
        for def in &self.fields {
            let kind = def.to_kind()?;
            let label = def.label.as_deref().unwrap_or(&def.name);
            if registry.insert(&def.name, label, kind).is_some() {
                return Err(ConfigError::DuplicateField {
                    name: def.name.clone(),
                });
            }
        }
        Ok(registry)
    }
}
