//! Key to PathKey transforms

use super::{HashAlgorithm, PathKey};
use crate::{Error, Result};

/// Default width of each directory segment cut from a digest
pub const DEFAULT_BLOCK_SIZE: usize = 5;

/// Maps a key to the location its object is stored under
///
/// Implementations must be pure and deterministic: the same key always
/// yields the same `PathKey`, and no input string may cause a failure.
/// Any `Fn(&str) -> PathKey` closure is a transform.
pub trait PathTransform: Send + Sync {
    fn transform(&self, key: &str) -> PathKey;
}

impl<F> PathTransform for F
where
    F: Fn(&str) -> PathKey + Send + Sync,
{
    fn transform(&self, key: &str) -> PathKey {
        self(key)
    }
}

/// Content-addressed transform
///
/// Hashes the key, splits the hex digest into `block_size`-wide directory
/// segments (a trailing remainder shorter than `block_size` is dropped) and
/// uses the whole digest as the filename.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CasTransform {
    algorithm: HashAlgorithm,
    block_size: usize,
}

impl CasTransform {
    pub fn new(algorithm: HashAlgorithm, block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(Error::Config("block size must be at least 1".into()));
        }
        Ok(CasTransform {
            algorithm,
            block_size,
        })
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

impl Default for CasTransform {
    fn default() -> Self {
        CasTransform {
            algorithm: HashAlgorithm::Sha1,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl PathTransform for CasTransform {
    fn transform(&self, key: &str) -> PathKey {
        let hashed = self.algorithm.digest_hex(key.as_bytes());
        let b = self.block_size;

        // hex is ASCII, so byte offsets are char boundaries
        let pathname = (0..hashed.len() / b)
            .map(|i| &hashed[i * b..(i + 1) * b])
            .collect::<Vec<_>>()
            .join("/");

        PathKey {
            pathname,
            filename: hashed,
        }
    }
}

/// Maps a key directly to itself: `pathname = key`, `filename = key`
///
/// Keeps the on-disk layout human readable, but offers no collision
/// resistance and no fan-out control. Keys are not sanitized here; a key
/// such as `../outside` produces a `PathKey` that escapes the root, and
/// [`Store`](crate::Store) refuses those with [`Error::InvalidKey`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdentityTransform;

impl PathTransform for IdentityTransform {
    fn transform(&self, key: &str) -> PathKey {
        PathKey::new(key, key)
    }
}
