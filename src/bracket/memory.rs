//! In-memory bracket
//!
//! A minimal [`MatchResolver`] backed by a map, for tests, demos and
//! embedders that keep the bracket in process.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{MatchInfo, MatchRef, MatchResolver, MatchStatus, SetNumber};
use crate::registry::StreamerLink;

/// Thread-safe in-memory bracket
///
/// Sets never inserted resolve to [`MatchRef::Unresolved`].
#[derive(Debug, Default)]
pub struct MemoryBracket {
    matches: RwLock<HashMap<SetNumber, MatchInfo>>,
}

impl MemoryBracket {
    /// Create an empty bracket
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a match
    pub fn insert(&self, info: MatchInfo) {
        self.matches
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(info.set, info);
    }

    /// Update the status of a match
    ///
    /// Returns `false` if the set is unresolved.
    pub fn set_status(&self, set: SetNumber, status: MatchStatus) -> bool {
        let mut matches = self.matches.write().unwrap_or_else(PoisonError::into_inner);
        match matches.get_mut(&set) {
            Some(info) => {
                info.status = status;
                true
            }
            None => false,
        }
    }

    /// Get a copy of a match
    pub fn get(&self, set: SetNumber) -> Option<MatchInfo> {
        self.matches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&set)
            .cloned()
    }

    /// Stream a match is associated with, if any
    pub fn streamed_on(&self, set: SetNumber) -> Option<StreamerLink> {
        self.get(set).and_then(|info| info.streamed_on)
    }
}

impl MatchResolver for MemoryBracket {
    fn resolve(&self, set: SetNumber) -> MatchRef {
        match self.get(set) {
            Some(info) => MatchRef::Resolved(info),
            None => MatchRef::Unresolved(set),
        }
    }

    fn notify_streamed(&self, set: SetNumber, link: &StreamerLink) {
        let mut matches = self.matches.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(info) = matches.get_mut(&set) {
            info.streamed_on = Some(link.clone());
        }
    }

    fn clear_streamed(&self, set: SetNumber) {
        let mut matches = self.matches.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(info) = matches.get_mut(&set) {
            info.streamed_on = None;
        }
    }
}
