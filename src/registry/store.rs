//! Streamer registry implementation
//!
//! The central registry that owns every streamer of a tournament and enforces
//! that a set is queued on at most one of them.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::bracket::{MatchResolver, SetNumber};

use super::config::{RegistryConfig, MIN_CLEANUP_INTERVAL};
use super::error::{RegistryError, SetErrors};
use super::link::{MemberId, StreamerLink};
use super::snapshot::{RegistrySnapshot, StreamerRecord};
use super::streamer::{Streamer, StreamerInfo};

/// A registered streamer
///
/// The link is duplicated outside the lock so lookups by link never wait on
/// a streamer being mutated.
struct Slot {
    link: StreamerLink,
    streamer: RwLock<Streamer>,
}

impl Slot {
    fn new(streamer: Streamer) -> Self {
        Self {
            link: streamer.link().clone(),
            streamer: RwLock::new(streamer),
        }
    }
}

/// Registry of all streamers in a tournament
///
/// Locking happens at two levels. The outer `RwLock` is the tournament-wide
/// section: registration and every operation that must see all queues at
/// once (adding sets) take it exclusively. Operations touching a single
/// queue take it shared and then lock only their streamer. Locks are always
/// acquired outer first, and streamer locks never leave the registry.
pub struct StreamerRegistry {
    /// Streamers in registration order
    streamers: RwLock<Vec<Slot>>,

    /// Bracket the queued sets refer to
    resolver: Arc<dyn MatchResolver>,

    /// Configuration
    config: RegistryConfig,
}

fn position(slots: &[Slot], link: &StreamerLink) -> Result<usize, RegistryError> {
    slots
        .iter()
        .position(|slot| &slot.link == link)
        .ok_or_else(|| RegistryError::StreamerNotFound(link.clone()))
}

fn find<'a>(slots: &'a [Slot], link: &StreamerLink) -> Result<&'a Slot, RegistryError> {
    position(slots, link).map(|i| &slots[i])
}

impl StreamerRegistry {
    /// Create a new registry with default configuration
    pub fn new(resolver: Arc<dyn MatchResolver>) -> Self {
        Self::with_config(resolver, RegistryConfig::default())
    }

    /// Create a new registry with custom configuration
    pub fn with_config(resolver: Arc<dyn MatchResolver>, config: RegistryConfig) -> Self {
        Self {
            streamers: RwLock::new(Vec::new()),
            resolver,
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Get the bracket resolver
    pub fn resolver(&self) -> &dyn MatchResolver {
        self.resolver.as_ref()
    }

    /// Register a streamer
    ///
    /// Returns an error if a streamer with the same link exists or the
    /// registry is full.
    pub async fn register(&self, streamer: Streamer) -> Result<(), RegistryError> {
        let mut slots = self.streamers.write().await;

        if slots.iter().any(|slot| &slot.link == streamer.link()) {
            return Err(RegistryError::DuplicateLink(streamer.link().clone()));
        }
        if !self.config.allows_streamer(slots.len()) {
            return Err(RegistryError::RegistryFull);
        }

        tracing::info!(
            streamer = %streamer.link(),
            owner = %streamer.owner(),
            streamers = slots.len() + 1,
            "Streamer registered"
        );
        slots.push(Slot::new(streamer));

        Ok(())
    }

    /// Unregister a streamer, returning it as it was
    ///
    /// Queued sets are not released; call [`end`](Self::end) first or use
    /// [`close`](Self::close).
    pub async fn unregister(&self, link: &StreamerLink) -> Result<Streamer, RegistryError> {
        let mut slots = self.streamers.write().await;
        let index = position(&slots, link)?;
        let streamer = slots.remove(index).streamer.into_inner();

        tracing::info!(
            streamer = %link,
            queued = streamer.queue().len(),
            "Streamer unregistered"
        );

        Ok(streamer)
    }

    /// End a stream and unregister it in one step
    pub async fn close(&self, link: &StreamerLink) -> Result<Streamer, RegistryError> {
        let mut slots = self.streamers.write().await;
        let index = position(&slots, link)?;
        let mut streamer = slots.remove(index).streamer.into_inner();
        let released = streamer.clear(self.resolver());

        tracing::info!(
            streamer = %link,
            released = released.len(),
            "Stream closed"
        );

        Ok(streamer)
    }

    /// Find a streamer by link
    pub async fn find_by_link(&self, link: &StreamerLink) -> Option<Streamer> {
        let slots = self.streamers.read().await;
        let slot = find(&slots, link).ok()?;
        let streamer = slot.streamer.read().await;
        Some(streamer.clone())
    }

    /// Find the first registered streamer owned by a member
    pub async fn find_by_owner(&self, owner: MemberId) -> Option<Streamer> {
        let slots = self.streamers.read().await;

        for slot in slots.iter() {
            let streamer = slot.streamer.read().await;
            if streamer.owner() == owner {
                return Some(streamer.clone());
            }
        }

        None
    }

    /// Get the link of the streamer whose queue holds a set
    pub async fn holder_of(&self, set: SetNumber) -> Option<StreamerLink> {
        let slots = self.streamers.read().await;

        for slot in slots.iter() {
            if slot.streamer.read().await.contains(set) {
                return Some(slot.link.clone());
            }
        }

        None
    }

    /// Union of every streamer's queue
    pub async fn all_sets(&self) -> BTreeSet<SetNumber> {
        let slots = self.streamers.read().await;
        let mut sets = BTreeSet::new();

        for slot in slots.iter() {
            sets.extend(slot.streamer.read().await.queue().iter().copied());
        }

        sets
    }

    /// Get total number of streamers
    pub async fn streamer_count(&self) -> usize {
        self.streamers.read().await.len()
    }

    /// Get a resolved view of a streamer
    pub async fn info(&self, link: &StreamerLink) -> Option<StreamerInfo> {
        let slots = self.streamers.read().await;
        let slot = find(&slots, link).ok()?;
        let streamer = slot.streamer.read().await;
        Some(streamer.info(self.resolver()))
    }

    /// Get resolved views of all streamers in registration order
    pub async fn list(&self) -> Vec<StreamerInfo> {
        let slots = self.streamers.read().await;
        let mut infos = Vec::with_capacity(slots.len());

        for slot in slots.iter() {
            infos.push(slot.streamer.read().await.info(self.resolver()));
        }

        infos
    }

    /// Queue sets on a stream
    ///
    /// Sets are processed in ascending order. A set fails individually if it
    /// is already queued anywhere in the tournament (this stream included),
    /// is zero, or does not fit in the queue; the others are still added.
    /// Returns the per-set failures, empty on full success.
    pub async fn add_matches(
        &self,
        link: &StreamerLink,
        sets: impl IntoIterator<Item = SetNumber>,
    ) -> Result<SetErrors, RegistryError> {
        let requested: BTreeSet<SetNumber> = sets.into_iter().collect();
        let mut slots = self.streamers.write().await;
        let index = position(&slots, link)?;

        Ok(self.add_exclusive(&mut slots, index, &requested))
    }

    /// Replace a stream's queue
    ///
    /// Equivalent to [`remove_all`](Self::remove_all) followed by
    /// [`add_matches`](Self::add_matches), without letting another stream
    /// claim the released sets in between.
    pub async fn replace_matches(
        &self,
        link: &StreamerLink,
        sets: impl IntoIterator<Item = SetNumber>,
    ) -> Result<SetErrors, RegistryError> {
        let requested: BTreeSet<SetNumber> = sets.into_iter().collect();
        let mut slots = self.streamers.write().await;
        let index = position(&slots, link)?;

        let released = slots[index].streamer.get_mut().clear(self.resolver());
        tracing::debug!(streamer = %link, released = released.len(), "Queue cleared for replace");

        Ok(self.add_exclusive(&mut slots, index, &requested))
    }

    /// Add sets while holding the tournament-wide section
    fn add_exclusive(
        &self,
        slots: &mut [Slot],
        index: usize,
        requested: &BTreeSet<SetNumber>,
    ) -> SetErrors {
        // Every requested set already queued somewhere, with its holder
        let mut holders: HashMap<SetNumber, StreamerLink> = HashMap::new();
        for slot in slots.iter_mut() {
            let streamer = slot.streamer.get_mut();
            for &set in requested {
                if streamer.contains(set) {
                    holders.insert(set, slot.link.clone());
                }
            }
        }

        let resolver = self.resolver.as_ref();
        let streamer = slots[index].streamer.get_mut();
        let mut errors = SetErrors::new();

        for &set in requested {
            if set == 0 {
                errors.insert(set, RegistryError::InvalidSet(set));
            } else if let Some(holder) = holders.remove(&set) {
                errors.insert(set, RegistryError::DuplicateInTournament { set, holder });
            } else if !self.config.allows_queue_len(streamer.queue().len()) {
                errors.insert(set, RegistryError::QueueFull(set));
            } else {
                streamer.enqueue(set, resolver);
            }
        }

        tracing::debug!(
            streamer = %streamer.link(),
            requested = requested.len(),
            failed = errors.len(),
            queued = streamer.queue().len(),
            "Sets added"
        );

        errors
    }

    /// Remove sets from a stream
    ///
    /// Fails with [`RegistryError::NoneFound`] without modifying the queue if
    /// none of the sets are queued. Returns the removed sets in queue order.
    pub async fn remove_matches(
        &self,
        link: &StreamerLink,
        sets: impl IntoIterator<Item = SetNumber>,
    ) -> Result<Vec<SetNumber>, RegistryError> {
        let requested: BTreeSet<SetNumber> = sets.into_iter().collect();
        let slots = self.streamers.read().await;
        let mut streamer = find(&slots, link)?.streamer.write().await;

        let removed = streamer.remove_sets(&requested, self.resolver())?;
        tracing::debug!(streamer = %link, removed = ?removed, "Sets removed");

        Ok(removed)
    }

    /// Empty a stream's queue
    pub async fn remove_all(&self, link: &StreamerLink) -> Result<Vec<SetNumber>, RegistryError> {
        let slots = self.streamers.read().await;
        let mut streamer = find(&slots, link)?.streamer.write().await;

        let removed = streamer.clear(self.resolver());
        tracing::debug!(streamer = %link, removed = removed.len(), "Queue cleared");

        Ok(removed)
    }

    /// Swap the positions of two queued sets
    pub async fn swap_matches(
        &self,
        link: &StreamerLink,
        a: SetNumber,
        b: SetNumber,
    ) -> Result<(), RegistryError> {
        let slots = self.streamers.read().await;
        let mut streamer = find(&slots, link)?.streamer.write().await;

        streamer.swap(a, b)?;
        tracing::debug!(streamer = %link, a, b, "Sets swapped");

        Ok(())
    }

    /// Move a queued set immediately before another, or to the end of the
    /// queue when `before` is `None`
    pub async fn insert_match(
        &self,
        link: &StreamerLink,
        moving: SetNumber,
        before: Option<SetNumber>,
    ) -> Result<(), RegistryError> {
        let slots = self.streamers.read().await;
        let mut streamer = find(&slots, link)?.streamer.write().await;

        streamer.insert_before(moving, before)?;
        tracing::debug!(streamer = %link, moving, before = ?before, "Set moved");

        Ok(())
    }

    /// End a stream: release every queued set
    ///
    /// The streamer stays registered; removing it is up to the caller.
    /// Returns the released sets.
    pub async fn end(&self, link: &StreamerLink) -> Result<Vec<SetNumber>, RegistryError> {
        let slots = self.streamers.read().await;
        let mut streamer = find(&slots, link)?.streamer.write().await;

        let released = streamer.clear(self.resolver());
        tracing::info!(streamer = %link, released = released.len(), "Stream ended");

        Ok(released)
    }

    /// Overwrite a stream's room credentials
    pub async fn set_room(
        &self,
        link: &StreamerLink,
        room_id: Option<String>,
        room_code: Option<String>,
    ) -> Result<(), RegistryError> {
        let slots = self.streamers.read().await;
        let mut streamer = find(&slots, link)?.streamer.write().await;

        streamer.set_room(room_id, room_code);
        Ok(())
    }

    /// Reassign a stream's owner
    pub async fn set_owner(
        &self,
        link: &StreamerLink,
        owner: MemberId,
    ) -> Result<(), RegistryError> {
        let slots = self.streamers.read().await;
        let mut streamer = find(&slots, link)?.streamer.write().await;

        tracing::info!(
            streamer = %link,
            from = %streamer.owner(),
            to = %owner,
            "Stream ownership transferred"
        );
        streamer.set_owner(owner);

        Ok(())
    }

    /// Run cleanup once
    ///
    /// Removes from every queue the sets whose match is finished. Returns the
    /// number of sets removed.
    pub async fn cleanup(&self) -> usize {
        let slots = self.streamers.read().await;
        let mut total = 0;

        for slot in slots.iter() {
            let removed = slot.streamer.write().await.remove_finished(self.resolver());
            if !removed.is_empty() {
                tracing::info!(
                    streamer = %slot.link,
                    removed = ?removed,
                    "Finished sets removed by cleanup"
                );
                total += removed.len();
            }
        }

        total
    }

    /// Spawn background cleanup task
    ///
    /// Returns a handle that can be used to abort the task.
    pub fn spawn_cleanup_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let registry = Arc::clone(self);
        // The field is public, so the builder's clamp may have been bypassed
        let interval = registry.config.cleanup_interval.max(MIN_CLEANUP_INTERVAL);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                registry.cleanup().await;
            }
        })
    }

    /// Capture the persisted state of the registry
    pub async fn snapshot(&self) -> RegistrySnapshot {
        let slots = self.streamers.read().await;
        let mut streamers = Vec::with_capacity(slots.len());

        for slot in slots.iter() {
            streamers.push(StreamerRecord::from(&*slot.streamer.read().await));
        }

        RegistrySnapshot { streamers }
    }

    /// Rebuild a registry from a snapshot
    ///
    /// The snapshot is rejected if it breaks link uniqueness, set uniqueness
    /// across queues, or the configured limits. The bracket is not notified;
    /// it persists its own stream associations.
    pub fn restore(
        resolver: Arc<dyn MatchResolver>,
        config: RegistryConfig,
        snapshot: RegistrySnapshot,
    ) -> Result<Self, RegistryError> {
        let mut slots: Vec<Slot> = Vec::with_capacity(snapshot.streamers.len());
        let mut holders: HashMap<SetNumber, StreamerLink> = HashMap::new();

        for record in snapshot.streamers {
            if let Err(e) = validate_record(&record, &slots, &holders, &config) {
                tracing::warn!(streamer = %record.link, error = %e, "Snapshot rejected");
                return Err(e);
            }

            for &set in &record.queue {
                holders.insert(set, record.link.clone());
            }
            slots.push(Slot::new(Streamer::from_parts(
                record.link,
                record.owner,
                record.room_id,
                record.room_code,
                record.queue,
            )));
        }

        tracing::info!(streamers = slots.len(), sets = holders.len(), "Registry restored");

        Ok(Self {
            streamers: RwLock::new(slots),
            resolver,
            config,
        })
    }
}

fn validate_record(
    record: &StreamerRecord,
    slots: &[Slot],
    holders: &HashMap<SetNumber, StreamerLink>,
    config: &RegistryConfig,
) -> Result<(), RegistryError> {
    if slots.iter().any(|slot| slot.link == record.link) {
        return Err(RegistryError::DuplicateLink(record.link.clone()));
    }
    if !config.allows_streamer(slots.len()) {
        return Err(RegistryError::RegistryFull);
    }

    let mut seen = BTreeSet::new();
    for (len, &set) in record.queue.iter().enumerate() {
        if set == 0 {
            return Err(RegistryError::InvalidSet(set));
        }
        if let Some(holder) = holders.get(&set) {
            return Err(RegistryError::DuplicateInTournament {
                set,
                holder: holder.clone(),
            });
        }
        if !seen.insert(set) {
            return Err(RegistryError::DuplicateInTournament {
                set,
                holder: record.link.clone(),
            });
        }
        if !config.allows_queue_len(len) {
            return Err(RegistryError::QueueFull(set));
        }
    }

    Ok(())
}
