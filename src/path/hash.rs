//! Digest algorithms used to address keys

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;

/// Hash function applied to a key's raw bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// 160-bit SHA-1 (40 hex chars)
    #[default]
    Sha1,
    /// 256-bit BLAKE3 (64 hex chars)
    Blake3,
}

impl HashAlgorithm {
    /// Hash arbitrary data
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
            HashAlgorithm::Blake3 => blake3::hash(data).as_bytes().to_vec(),
        }
    }

    /// Hash arbitrary data and encode it as lowercase hex
    pub fn digest_hex(&self, data: &[u8]) -> String {
        hex::encode(self.digest(data))
    }

    /// Length of the hex-encoded digest
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Blake3 => 64,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(HashAlgorithm::Sha1),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(crate::Error::Config(format!(
                "Unknown hash algorithm: {}",
                other
            ))),
        }
    }
}
