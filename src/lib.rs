//! Streamer registry for tournament brackets
//!
//! Assigns bracket sets to broadcast channels ("streamers"). Each streamer
//! owns an ordered queue of set numbers; the registry guarantees a set is
//! queued on at most one streamer of the tournament, even under concurrent
//! commands.
//!
//! The bracket itself stays external: the registry reads matches through the
//! [`MatchResolver`](bracket::MatchResolver) trait and tells it which matches
//! are being streamed.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bracket_streams::bracket::MemoryBracket;
//! use bracket_streams::registry::{MemberId, Streamer, StreamerLink, StreamerRegistry};
//!
//! # async fn demo() -> Result<(), bracket_streams::registry::RegistryError> {
//! let bracket = Arc::new(MemoryBracket::new());
//! let registry = StreamerRegistry::new(bracket);
//!
//! registry.register(Streamer::new("firedragon", MemberId(1))).await?;
//!
//! let link = StreamerLink::new("firedragon");
//! let errors = registry.add_matches(&link, [252, 253, 254]).await?;
//! for (set, error) in &errors {
//!     println!("#{}: {}", set, error);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bracket;
pub mod registry;

pub use bracket::{MatchInfo, MatchRef, MatchResolver, MatchStatus, SetNumber};
pub use registry::{
    MemberId, RegistryConfig, RegistryError, Streamer, StreamerLink, StreamerRegistry,
};
