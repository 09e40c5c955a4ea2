//! # shardstore
//!
//! A content-addressable local blob store.
//!
//! Each key is turned into a location under a root directory by a
//! [`PathTransform`]. The default content-addressed transform hashes the
//! key and shards the hex digest into short directory segments, so every
//! node holding the same key computes the same path without talking to
//! anyone else.
//!
//! ## Core Concepts
//!
//! - **PathKey**: relative directory path plus filename for an object
//! - **PathTransform**: pure `key -> PathKey` function (sharded, identity, or any closure)
//! - **Store**: root directory plus transform; `has`, `write`, `read`, `delete`, `clear`
//!
//! ## Example
//!
//! ```no_run
//! use shardstore::{CasTransform, Store, StoreOptions};
//! use std::io::Read;
//!
//! # fn main() -> shardstore::Result<()> {
//! let store = Store::new(
//!     StoreOptions::new()
//!         .with_root("supernetwork")
//!         .with_transform(CasTransform::default()),
//! );
//!
//! store.write("momsbestpicture", &b"some jpg bytes"[..])?;
//!
//! let mut blob = store.read("momsbestpicture")?;
//! let mut data = Vec::new();
//! blob.read_to_end(&mut data)?;
//! assert_eq!(data.len() as u64, blob.size());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod path;
pub mod store;

mod error;

pub use config::{StoreConfig, TransformKind};
pub use error::{Error, Result};
pub use path::{CasTransform, HashAlgorithm, IdentityTransform, PathKey, PathTransform};
pub use store::{Blob, Store, StoreOptions};

/// Root directory used when none is configured
pub const DEFAULT_ROOT: &str = "supernetwork";
