//! Bracket-side match contract
//!
//! The bracket engine owns the canonical match objects. The streamer registry
//! only needs three things from it: resolving a set number to a match, and
//! marking/unmarking a match as being streamed on a given channel.
//!
//! A set the bracket has not produced participants for yet resolves to
//! [`MatchRef::Unresolved`]; it can still be queued on a stream.

pub mod memory;

use crate::registry::StreamerLink;

pub use memory::MemoryBracket;

/// Set number as listed on the bracket
pub type SetNumber = u32;

/// Status of a resolved match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    /// Players known, match not started
    Pending,
    /// Match is being played
    Ongoing,
    /// Match was called but is waiting (e.g. for a stream slot)
    OnHold,
    /// Match has a winner
    Finished,
}

/// A match the bracket has produced participants for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInfo {
    /// Set number
    pub set: SetNumber,
    /// First player's display name
    pub player1: String,
    /// Second player's display name
    pub player2: String,
    /// Current status
    pub status: MatchStatus,
    /// Stream this match is associated with, if any
    pub streamed_on: Option<StreamerLink>,
}

impl MatchInfo {
    /// Create a pending match with no stream association
    pub fn new(set: SetNumber, player1: impl Into<String>, player2: impl Into<String>) -> Self {
        Self {
            set,
            player1: player1.into(),
            player2: player2.into(),
            status: MatchStatus::Pending,
            streamed_on: None,
        }
    }

    /// Set the status
    pub fn with_status(mut self, status: MatchStatus) -> Self {
        self.status = status;
        self
    }
}

/// Result of resolving a set number against the bracket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRef {
    /// The bracket has not produced real participants for this slot yet
    Unresolved(SetNumber),
    /// A concrete match
    Resolved(MatchInfo),
}

impl MatchRef {
    /// Set number this reference points to
    pub fn set(&self) -> SetNumber {
        match self {
            MatchRef::Unresolved(set) => *set,
            MatchRef::Resolved(info) => info.set,
        }
    }

    /// Get the match, if resolved
    pub fn resolved(&self) -> Option<&MatchInfo> {
        match self {
            MatchRef::Unresolved(_) => None,
            MatchRef::Resolved(info) => Some(info),
        }
    }

    /// Check if the match is currently being played
    pub fn is_ongoing(&self) -> bool {
        self.status() == Some(MatchStatus::Ongoing)
    }

    /// Check if the match is waiting on hold
    pub fn is_on_hold(&self) -> bool {
        self.status() == Some(MatchStatus::OnHold)
    }

    /// Check if the match has a winner
    pub fn is_finished(&self) -> bool {
        self.status() == Some(MatchStatus::Finished)
    }

    /// Check if the match is resolved and associated with a stream
    pub fn is_streamed(&self) -> bool {
        self.resolved().is_some_and(|info| info.streamed_on.is_some())
    }

    fn status(&self) -> Option<MatchStatus> {
        self.resolved().map(|info| info.status)
    }
}

/// Contract the registry consumes from the bracket engine
///
/// Implementations must not block: they are called while registry locks are
/// held. Notifications are fire-and-forget from the registry's point of view;
/// an implementation that persists or forwards them is free to defer the work.
pub trait MatchResolver: Send + Sync {
    /// Resolve a set number to a match or an unresolved placeholder
    fn resolve(&self, set: SetNumber) -> MatchRef;

    /// Associate a resolved match with the stream that queued it
    fn notify_streamed(&self, set: SetNumber, link: &StreamerLink);

    /// Drop the stream association of a match
    ///
    /// Called for every resolved set leaving a queue, whether or not
    /// `resolve` reported an association, so it must tolerate matches that
    /// have none.
    fn clear_streamed(&self, set: SetNumber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_ref_status() {
        let unresolved = MatchRef::Unresolved(4);
        assert_eq!(unresolved.set(), 4);
        assert!(unresolved.resolved().is_none());
        assert!(!unresolved.is_ongoing());
        assert!(!unresolved.is_finished());
        assert!(!unresolved.is_streamed());

        let info = MatchInfo::new(7, "Alice", "Bob").with_status(MatchStatus::Ongoing);
        let ongoing = MatchRef::Resolved(info);
        assert_eq!(ongoing.set(), 7);
        assert!(ongoing.is_ongoing());
        assert!(!ongoing.is_on_hold());
        assert!(!ongoing.is_finished());
    }

    #[test]
    fn test_match_ref_streamed() {
        let mut info = MatchInfo::new(12, "Alice", "Bob");
        assert!(!MatchRef::Resolved(info.clone()).is_streamed());

        info.streamed_on = Some(StreamerLink::new("el_laggron"));
        assert!(MatchRef::Resolved(info).is_streamed());
    }
}
