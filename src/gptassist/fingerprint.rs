//! Content fingerprints used for change detection between prompts.
//!
//! File contents, directory-tree renderings and URLs all go through the same
//! [`fingerprint`] function: the digest carries no notion of what kind of
//! content produced it.

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Hex-encoded SHA-256 of a piece of text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn fingerprint(content: &str) -> Digest {
    let hash = Sha256::digest(content.as_bytes());
    Digest(hex::encode(hash))
}
