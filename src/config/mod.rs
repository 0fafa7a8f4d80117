//! TOML configuration: detector tuning, custom file types and named policies.
//!
//! ```toml
//! [detector]
//! max_header_bytes = 8192
//!
//! [[custom_types]]
//! extension = "acme"
//! signature = "41434d45"
//! categories = ["archive"]
//!
//! [policies.bundles]
//! kind = "allow_types"
//! types = ["zip", "7z"]
//! ```

use crate::detector::custom::parse_hex_signature;
use crate::detector::{Category, CustomType, FileType, InferDetector, DEFAULT_MAX_HEADER_BYTES};
use crate::error::ConfigError;
use crate::gate::{Policy, TypeGate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub detector: DetectorConfig,
    pub custom_types: Vec<CustomTypeConfig>,
    pub policies: BTreeMap<String, PolicyConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub max_header_bytes: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CustomTypeConfig {
    pub extension: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Hex encoded bytes, e.g. `"41434d45"`.
    pub signature: String,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl CustomTypeConfig {
    pub fn to_custom_type(&self) -> Result<CustomType, ConfigError> {
        if FileType::new(&self.extension).as_str().is_empty() {
            return Err(ConfigError::EmptyExtension {
                extension: self.extension.clone(),
            });
        }

        let signature = parse_hex_signature(&self.extension, &self.signature)?;
        let mut custom = CustomType::new(self.extension.as_str(), signature).with_offset(self.offset);
        if let Some(description) = &self.description {
            custom = custom.with_description(description.clone());
        }
        for category in &self.categories {
            custom = custom.with_category(*category);
        }

        Ok(custom)
    }
}

/// A policy as written in the config file.
///
/// List policies may omit `types`; the resulting empty list is reported as a
/// configuration error when the policy is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyConfig {
    AllowTypes {
        #[serde(default)]
        types: Vec<FileType>,
    },
    ForbidTypes {
        #[serde(default)]
        types: Vec<FileType>,
    },
    AllowDocuments,
    AllowImages,
    AllowArchives,
    ForbidExecutables,
}

impl PolicyConfig {
    pub fn to_policy(&self) -> Policy {
        match self {
            PolicyConfig::AllowTypes { types } => Policy::AllowTypes(types.clone()),
            PolicyConfig::ForbidTypes { types } => Policy::ForbidTypes(types.clone()),
            PolicyConfig::AllowDocuments => Policy::allow_documents(),
            PolicyConfig::AllowImages => Policy::allow_images(),
            PolicyConfig::AllowArchives => Policy::allow_archives(),
            PolicyConfig::ForbidExecutables => Policy::forbid_executables(),
        }
    }
}

impl FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = content.parse().map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            "Loaded {} custom types and {} policies from {}",
            config.custom_types.len(),
            config.policies.len(),
            path.display()
        );

        Ok(config)
    }

    pub fn policy(&self, name: &str) -> Result<Policy, ConfigError> {
        self.policies
            .get(name)
            .map(PolicyConfig::to_policy)
            .ok_or_else(|| ConfigError::UnknownPolicy(name.to_string()))
    }

    /// Builds a gate with the configured header size and custom types.
    pub fn build_gate(&self) -> Result<TypeGate<InferDetector>, ConfigError> {
        let detector = InferDetector::with_max_header_bytes(self.detector.max_header_bytes);
        let mut gate = TypeGate::with_detector(detector);

        for entry in &self.custom_types {
            gate.register_custom_type(entry.to_custom_type()?);
        }

        Ok(gate)
    }
}
