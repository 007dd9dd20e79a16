//! Identity types for streams and their owners

use serde::{Deserialize, Serialize};

/// External channel identity of a stream (e.g. a Twitch channel name)
///
/// Unique within a tournament and immutable for the lifetime of a streamer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamerLink(String);

impl StreamerLink {
    /// Create a new link
    pub fn new(link: impl Into<String>) -> Self {
        Self(link.into())
    }

    /// Get the link as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StreamerLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StreamerLink {
    fn from(link: &str) -> Self {
        Self::new(link)
    }
}

impl From<String> for StreamerLink {
    fn from(link: String) -> Self {
        Self(link)
    }
}

/// Identifier of a tournament member (informational owner of a stream)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
