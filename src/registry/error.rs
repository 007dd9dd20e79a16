//! Registry error types
//!
//! Error types for streamer registry and queue operations.

use std::collections::BTreeMap;

use super::link::StreamerLink;
use crate::bracket::SetNumber;

/// Per-set failures of a multi-set operation
///
/// Sets that succeeded are absent from the map.
pub type SetErrors = BTreeMap<SetNumber, RegistryError>;

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A streamer with this link is already registered
    DuplicateLink(StreamerLink),
    /// No streamer with this link
    StreamerNotFound(StreamerLink),
    /// Set is already queued on a stream of this tournament
    DuplicateInTournament {
        /// The requested set
        set: SetNumber,
        /// Stream whose queue holds it
        holder: StreamerLink,
    },
    /// Set is not in the streamer's queue
    SetNotFound(SetNumber),
    /// None of the sets to remove were queued
    NoneFound,
    /// Set number is not a valid bracket key
    InvalidSet(SetNumber),
    /// Streamer queue reached its configured capacity
    QueueFull(SetNumber),
    /// Registry reached its configured streamer capacity
    RegistryFull,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateLink(link) => {
                write!(f, "Streamer already registered: {}", link)
            }
            RegistryError::StreamerNotFound(link) => write!(f, "Streamer not found: {}", link),
            RegistryError::DuplicateInTournament { set, holder } => {
                write!(f, "Set #{} is already queued on {}", set, holder)
            }
            RegistryError::SetNotFound(set) => write!(f, "Set #{} is not in the queue", set),
            RegistryError::NoneFound => write!(f, "None of the sets were in the queue"),
            RegistryError::InvalidSet(set) => write!(f, "Invalid set number: {}", set),
            RegistryError::QueueFull(set) => write!(f, "Queue is full, cannot add set #{}", set),
            RegistryError::RegistryFull => write!(f, "Maximum number of streamers reached"),
        }
    }
}

impl std::error::Error for RegistryError {}
