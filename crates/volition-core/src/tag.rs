use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A hierarchical, dot-separated identifier (`"Action.Combat.Melee"`).
///
/// Tags name actions, inputs, queries and parameters. Comparison is either
/// exact (`==`) or parent-prefix ([`Tag::matches`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Tag(String);

impl Tag {
    /// Build a tag without validation. Validity is checked where the tag is
    /// consumed, so config loaded from data can carry bad tags without
    /// aborting the whole catalogue.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Strict constructor: rejects empty paths and empty segments.
    pub fn parse(path: &str) -> Result<Self, ConfigError> {
        let tag = Self::new(path);
        if tag.is_valid() {
            Ok(tag)
        } else {
            Err(ConfigError::InvalidTag(path.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.split('.').all(|seg| !seg.is_empty())
    }

    /// True when `self` is `parent` itself or lies underneath it
    /// (`"Input.Health.Pct"` matches `"Input.Health"` and `"Input"`).
    pub fn matches(&self, parent: &Tag) -> bool {
        self.matches_path(parent.as_str())
    }

    /// Prefix match against a raw path, used for well-known root segments.
    pub fn matches_path(&self, parent: &str) -> bool {
        if parent.is_empty() {
            return false;
        }
        match self.0.strip_prefix(parent) {
            Some(rest) => rest.is_empty() || rest.starts_with('.'),
            None => false,
        }
    }

    /// The final path segment.
    pub fn leaf(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or("")
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
