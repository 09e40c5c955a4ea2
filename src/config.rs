//! Store configuration
//!
//! Stored as JSON in ~/.config/shardstore/config.json. Every field is
//! optional; missing fields take their defaults.

use crate::path::{CasTransform, HashAlgorithm, IdentityTransform, DEFAULT_BLOCK_SIZE};
use crate::store::StoreOptions;
use crate::{Error, Result, DEFAULT_ROOT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which built-in transform a store uses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Hash-sharded content addressing
    #[default]
    Cas,
    /// Key used verbatim as path and filename
    Identity,
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformKind::Cas => f.write_str("cas"),
            TransformKind::Identity => f.write_str("identity"),
        }
    }
}

impl FromStr for TransformKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cas" => Ok(TransformKind::Cas),
            "identity" => Ok(TransformKind::Identity),
            other => Err(Error::Config(format!("Unknown transform: {}", other))),
        }
    }
}

/// Serializable store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base directory of the store
    pub root: PathBuf,
    pub transform: TransformKind,
    /// Digest used by the `cas` transform
    pub hash: HashAlgorithm,
    /// Segment width used by the `cas` transform
    pub block_size: usize,
    pub atomic_writes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            root: PathBuf::from(DEFAULT_ROOT),
            transform: TransformKind::Cas,
            hash: HashAlgorithm::Sha1,
            block_size: DEFAULT_BLOCK_SIZE,
            atomic_writes: false,
        }
    }
}

impl StoreConfig {
    /// Default config file location (~/.config/shardstore/config.json)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shardstore").join("config.json"))
    }

    /// Load config from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load config from the default location, falling back to defaults
    /// when there is no config file
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Write config to a file, creating its parent directory
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;
        Ok(())
    }

    /// Validate and build store options
    pub fn to_options(&self) -> Result<StoreOptions> {
        let options = StoreOptions::new()
            .with_root(&self.root)
            .with_atomic_writes(self.atomic_writes);

        Ok(match self.transform {
            TransformKind::Cas => {
                options.with_transform(CasTransform::new(self.hash, self.block_size)?)
            }
            TransformKind::Identity => options.with_transform(IdentityTransform),
        })
    }
}
