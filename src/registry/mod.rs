//! Streamer registry and match queues
//!
//! The registry owns every streamer of a tournament. Each streamer broadcasts
//! one match at a time from an ordered queue of set numbers, and a set may be
//! queued on at most one streamer at any instant.
//!
//! # Architecture
//!
//! ```text
//!                        StreamerRegistry
//!               ┌───────────────────────────────┐
//!               │ streamers: RwLock<Vec<Slot {  │  tournament-wide section
//!               │   link,                       │  (add, replace, register)
//!               │   streamer: RwLock<Streamer>, │  per-streamer section
//!               │ }>>                           │  (remove, swap, insert, end)
//!               │ resolver: Arc<dyn MatchResolver>
//!               └───────────────┬───────────────┘
//!                               │ resolve / notify_streamed / clear_streamed
//!                               ▼
//!                         bracket engine
//! ```
//!
//! Adding sets checks every queue before inserting, so it runs with the
//! outer lock held exclusively. Everything else that touches one queue only
//! needs the outer lock shared, letting operations on different streamers
//! proceed in parallel.

pub mod config;
pub mod error;
pub mod link;
pub mod snapshot;
pub mod store;
pub mod streamer;

pub use config::RegistryConfig;
pub use error::{RegistryError, SetErrors};
pub use link::{MemberId, StreamerLink};
pub use snapshot::{RegistrySnapshot, StreamerRecord};
pub use store::StreamerRegistry;
pub use streamer::{EntryState, QueueEntry, Streamer, StreamerInfo};
