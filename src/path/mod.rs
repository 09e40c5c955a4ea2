//! Key-to-path transforms
//!
//! Every stored object lives at `root/<pathname>/<filename>`, where the
//! `PathKey` is derived from the object's key by a [`PathTransform`].

mod hash;
mod key;
mod transform;

pub use hash::HashAlgorithm;
pub use key::PathKey;
pub use transform::{CasTransform, IdentityTransform, PathTransform, DEFAULT_BLOCK_SIZE};
