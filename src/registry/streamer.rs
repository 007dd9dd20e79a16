//! Streamer and queue types
//!
//! This module defines the per-stream state stored in the registry and the
//! queue algorithms that only touch a single streamer. Checks that span the
//! whole tournament (set uniqueness, capacity) live in the registry store.

use std::collections::BTreeSet;

use crate::bracket::{MatchRef, MatchResolver, MatchStatus, SetNumber};

use super::error::RegistryError;
use super::link::{MemberId, StreamerLink};

/// A broadcast channel and its ordered queue of sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Streamer {
    /// External channel identity, immutable
    link: StreamerLink,

    /// Member the stream belongs to (informational only)
    owner: MemberId,

    /// Game room ID players should join
    room_id: Option<String>,

    /// Game room password
    room_code: Option<String>,

    /// Queued sets in presentation order, no duplicates
    queue: Vec<SetNumber>,
}

impl Streamer {
    /// Create a streamer with an empty queue and no room
    pub fn new(link: impl Into<StreamerLink>, owner: MemberId) -> Self {
        Self {
            link: link.into(),
            owner,
            room_id: None,
            room_code: None,
            queue: Vec::new(),
        }
    }

    /// Set room credentials
    pub fn with_room(mut self, room_id: Option<String>, room_code: Option<String>) -> Self {
        self.room_id = room_id;
        self.room_code = room_code;
        self
    }

    /// Rebuild a streamer from persisted parts; the caller validates the queue
    pub(super) fn from_parts(
        link: StreamerLink,
        owner: MemberId,
        room_id: Option<String>,
        room_code: Option<String>,
        queue: Vec<SetNumber>,
    ) -> Self {
        Self {
            link,
            owner,
            room_id,
            room_code,
            queue,
        }
    }

    /// Get the channel link
    pub fn link(&self) -> &StreamerLink {
        &self.link
    }

    /// Get the owning member
    pub fn owner(&self) -> MemberId {
        self.owner
    }

    /// Get the room ID
    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    /// Get the room code
    pub fn room_code(&self) -> Option<&str> {
        self.room_code.as_deref()
    }

    /// Get the queued sets in order
    pub fn queue(&self) -> &[SetNumber] {
        &self.queue
    }

    /// Check if a set is queued
    pub fn contains(&self, set: SetNumber) -> bool {
        self.queue.contains(&set)
    }

    fn position(&self, set: SetNumber) -> Result<usize, RegistryError> {
        self.queue
            .iter()
            .position(|&s| s == set)
            .ok_or(RegistryError::SetNotFound(set))
    }

    /// First queued set whose match is being played
    pub fn active_set(&self, resolver: &dyn MatchResolver) -> Option<SetNumber> {
        self.queue
            .iter()
            .copied()
            .find(|&set| resolver.resolve(set).is_ongoing())
    }

    /// Build a resolved view of this streamer
    pub fn info(&self, resolver: &dyn MatchResolver) -> StreamerInfo {
        let entries: Vec<QueueEntry> = self
            .queue
            .iter()
            .map(|&set| QueueEntry::from_match_ref(resolver.resolve(set)))
            .collect();

        let active_set = entries
            .iter()
            .find(|entry| entry.is_ongoing())
            .map(|entry| entry.set);

        StreamerInfo {
            link: self.link.clone(),
            owner: self.owner,
            room_id: self.room_id.clone(),
            room_code: self.room_code.clone(),
            active_set,
            entries,
        }
    }

    /// Append a set that the registry already checked, and tell the bracket
    /// the match is streamed here
    pub(super) fn enqueue(&mut self, set: SetNumber, resolver: &dyn MatchResolver) {
        debug_assert!(!self.contains(set));
        self.queue.push(set);

        if let MatchRef::Resolved(_) = resolver.resolve(set) {
            resolver.notify_streamed(set, &self.link);
        }
    }

    /// Remove the given sets
    ///
    /// Fails with `NoneFound`, leaving the queue untouched, if none of the
    /// sets are queued. Returns the removed sets in queue order.
    pub(super) fn remove_sets(
        &mut self,
        sets: &BTreeSet<SetNumber>,
        resolver: &dyn MatchResolver,
    ) -> Result<Vec<SetNumber>, RegistryError> {
        let (removed, kept): (Vec<SetNumber>, Vec<SetNumber>) =
            self.queue.iter().partition(|&&set| sets.contains(&set));

        if removed.is_empty() {
            return Err(RegistryError::NoneFound);
        }

        self.queue = kept;
        for &set in &removed {
            release(resolver, set);
        }

        Ok(removed)
    }

    /// Empty the queue, releasing every stream association
    pub(super) fn clear(&mut self, resolver: &dyn MatchResolver) -> Vec<SetNumber> {
        let removed = std::mem::take(&mut self.queue);
        for &set in &removed {
            release(resolver, set);
        }
        removed
    }

    /// Remove every set whose match is finished
    pub(super) fn remove_finished(&mut self, resolver: &dyn MatchResolver) -> Vec<SetNumber> {
        let mut removed = Vec::new();

        self.queue.retain(|&set| {
            if resolver.resolve(set).is_finished() {
                resolver.clear_streamed(set);
                removed.push(set);
                false
            } else {
                true
            }
        });

        removed
    }

    /// Swap the queue positions of two sets
    pub(super) fn swap(&mut self, a: SetNumber, b: SetNumber) -> Result<(), RegistryError> {
        let i = self.position(a)?;
        let j = self.position(b)?;
        self.queue.swap(i, j);
        Ok(())
    }

    /// Move `moving` immediately before `before`, or to the end of the queue
    /// if `before` is `None`
    pub(super) fn insert_before(
        &mut self,
        moving: SetNumber,
        before: Option<SetNumber>,
    ) -> Result<(), RegistryError> {
        let from = self.position(moving)?;

        // Validate the target before touching the queue
        if let Some(target) = before {
            self.position(target)?;
            if target == moving {
                return Ok(());
            }
        }

        self.queue.remove(from);
        let to = match before {
            Some(target) => self.position(target)?,
            None => self.queue.len(),
        };
        self.queue.insert(to, moving);

        Ok(())
    }

    /// Overwrite both room credentials
    pub(super) fn set_room(&mut self, room_id: Option<String>, room_code: Option<String>) {
        self.room_id = room_id;
        self.room_code = room_code;
    }

    /// Reassign the owning member
    pub(super) fn set_owner(&mut self, owner: MemberId) {
        self.owner = owner;
    }
}

/// Drop the bracket's stream association for a resolved set
///
/// Resolvers are not required to report `streamed_on`, so every resolved
/// match is cleared.
fn release(resolver: &dyn MatchResolver, set: SetNumber) {
    if let MatchRef::Resolved(_) = resolver.resolve(set) {
        resolver.clear_streamed(set);
    }
}

/// State of a queued set as seen by the bracket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
    /// The bracket has not produced participants for this set yet
    WaitingForPlayers,
    /// A concrete match
    Ready {
        /// First player
        player1: String,
        /// Second player
        player2: String,
        /// Match status
        status: MatchStatus,
    },
}

/// A queued set with its resolved state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    /// Set number
    pub set: SetNumber,
    /// Resolved state
    pub state: EntryState,
}

impl QueueEntry {
    fn from_match_ref(match_ref: MatchRef) -> Self {
        match match_ref {
            MatchRef::Unresolved(set) => Self {
                set,
                state: EntryState::WaitingForPlayers,
            },
            MatchRef::Resolved(info) => Self {
                set: info.set,
                state: EntryState::Ready {
                    player1: info.player1,
                    player2: info.player2,
                    status: info.status,
                },
            },
        }
    }

    /// Check if this set is being played
    pub fn is_ongoing(&self) -> bool {
        matches!(
            self.state,
            EntryState::Ready {
                status: MatchStatus::Ongoing,
                ..
            }
        )
    }
}

/// Resolved snapshot of a streamer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamerInfo {
    /// Channel link
    pub link: StreamerLink,
    /// Owning member
    pub owner: MemberId,
    /// Room ID
    pub room_id: Option<String>,
    /// Room code
    pub room_code: Option<String>,
    /// Set currently on air
    pub active_set: Option<SetNumber>,
    /// Queue in order
    pub entries: Vec<QueueEntry>,
}
