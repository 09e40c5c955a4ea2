//! PathKey - where an object lives relative to the store root

use serde::{Deserialize, Serialize};
use std::fmt;

/// A relative directory path plus the filename an object is stored under
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathKey {
    /// `/`-separated directory segments
    pub pathname: String,
    /// Base filename of the object
    pub filename: String,
}

impl PathKey {
    pub fn new(pathname: impl Into<String>, filename: impl Into<String>) -> Self {
        PathKey {
            pathname: pathname.into(),
            filename: filename.into(),
        }
    }

    /// Non-empty directory segments, outermost first
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.pathname.split('/').filter(|s| !s.is_empty())
    }

    /// Outermost directory component, the unit of deletion.
    /// Empty when the pathname has no segments.
    pub fn first_segment(&self) -> &str {
        self.segments().next().unwrap_or("")
    }

    /// Pathname and filename joined into one relative path
    pub fn full_path(&self) -> String {
        if self.pathname.is_empty() {
            self.filename.clone()
        } else {
            format!("{}/{}", self.pathname, self.filename)
        }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}
