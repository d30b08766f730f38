//! Flat variable keys and the reference literal grammar.
//!
//! Every variable is addressed by a [`FlatKey`] of the form
//! `"<collection>:<path/with/slashes>"`. The same syntax is used inside value
//! literals to alias another variable.

use std::borrow::Borrow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s:]+(?:\s+[^\s:]+)*:[^\s:]+(?:\s+[^\s:]+)*$").expect("valid regex")
});

/// Returns true if the literal is a reference to another variable.
///
/// A reference is exactly one colon separating two non-empty token groups.
/// Whitespace may appear between tokens but never next to the colon.
///
/// ```
/// use varsync_domain::reference::is_reference;
///
/// assert!(is_reference("Colors:primary"));
/// assert!(is_reference("Brand Colors:button/primary fill"));
/// assert!(!is_reference("Colors : primary"));
/// assert!(!is_reference("a:b:c"));
/// ```
#[must_use]
pub fn is_reference(input: &str) -> bool {
    REFERENCE_PATTERN.is_match(input)
}

/// Canonical identifier of a variable: `"<collection>:<path>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatKey(String);

impl FlatKey {
    /// Builds a key from a collection name and a slash-joined path.
    #[must_use]
    pub fn new(collection: &str, path: &str) -> Self {
        Self(format!("{collection}:{path}"))
    }

    /// Parses a key, requiring a non-empty collection and path.
    ///
    /// The collection is everything up to the first colon.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidFlatKey`] if either side is empty or the
    /// colon is missing.
    pub fn parse(input: &str) -> DomainResult<Self> {
        match input.split_once(':') {
            Some((collection, path)) if !collection.is_empty() && !path.is_empty() => {
                Ok(Self(input.to_string()))
            }
            _ => Err(DomainError::InvalidFlatKey(input.to_string())),
        }
    }

    /// The collection part of the key.
    #[must_use]
    pub fn collection(&self) -> &str {
        self.0.split_once(':').map_or("", |(collection, _)| collection)
    }

    /// The slash-joined variable path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(_, path)| path)
    }

    /// Path segments, split on `/`.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path().split('/')
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FlatKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FlatKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
