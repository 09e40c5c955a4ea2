//! Directory-backed blob store
//!
//! This module implements the storage engine on top of the key-to-path
//! transforms: every object is a plain file under the store root.

mod blob;
mod file_store;

pub use blob::Blob;
pub use file_store::{Store, StoreOptions};
