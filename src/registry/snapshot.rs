//! Persisted registry layout
//!
//! The registry itself does no I/O. A snapshot captures everything needed to
//! rebuild it: each streamer's link, owner, room and ordered queue, in
//! registration order. Serialization format is up to the embedder.

use serde::{Deserialize, Serialize};

use super::link::{MemberId, StreamerLink};
use super::streamer::Streamer;
use crate::bracket::SetNumber;

/// Persisted state of a single streamer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamerRecord {
    pub link: StreamerLink,
    pub owner: MemberId,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub room_code: Option<String>,
    #[serde(default)]
    pub queue: Vec<SetNumber>,
}

impl From<&Streamer> for StreamerRecord {
    fn from(streamer: &Streamer) -> Self {
        Self {
            link: streamer.link().clone(),
            owner: streamer.owner(),
            room_id: streamer.room_id().map(str::to_owned),
            room_code: streamer.room_code().map(str::to_owned),
            queue: streamer.queue().to_vec(),
        }
    }
}

/// Persisted state of a registry, streamers in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub streamers: Vec<StreamerRecord>,
}

impl RegistrySnapshot {
    /// Check if the snapshot holds no streamers
    pub fn is_empty(&self) -> bool {
        self.streamers.is_empty()
    }
}
