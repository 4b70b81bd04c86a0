//! Storage and publish abstractions
//!
//! The core depends on two capability sets, [`RotationStore`] and
//! [`StatsStore`], plus a fire-and-forget [`EventSink`]. Each has two
//! production variants elsewhere in the workspace (in-memory, for tests and
//! the default deployment; relational/AMQP, for production) implementing
//! these same traits, so the engine crate can take them as constructor
//! parameters without knowing which backend it was handed.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::types::{BannerId, Event, EventId, GroupId, NewEvent, NewRotation, Rotation, SlotId};

/// CRUD for slot↔banner memberships.
///
/// # Isolation
///
/// A read must never observe a partial `add` or a partial `remove`.
/// Writers take exclusive access; readers may proceed in parallel with
/// other readers.
#[async_trait]
pub trait RotationStore: Send + Sync {
    /// Assigns a fresh id, stores the record, and returns the stored copy.
    /// Never fails on logical grounds.
    async fn add(&self, rotation: NewRotation, cancel: &CancellationToken) -> Result<Rotation>;

    /// Returns all rotations for `slot_id` (possibly empty). Order is
    /// unspecified.
    async fn find_all_by_slot_id(
        &self,
        slot_id: SlotId,
        cancel: &CancellationToken,
    ) -> Result<Vec<Rotation>>;

    /// Returns any rotation whose banner matches `banner_id`.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Error::NotFound`] if none match. Used by
    /// transports that address banners directly (e.g. `SetTransition`).
    async fn find_one_by_banner_id(
        &self,
        banner_id: BannerId,
        cancel: &CancellationToken,
    ) -> Result<Rotation>;

    /// Deletes every rotation whose banner matches `banner_id`. An
    /// implementation may treat an empty match as [`crate::Error::NotFound`]
    /// or as a silent no-op. Both behaviours are valid and
    /// implementation-specific; see the in-memory and relational stores for
    /// which one each chooses.
    async fn remove(&self, banner_id: BannerId, cancel: &CancellationToken) -> Result<()>;
}

/// Append-only event log, queryable by (slot, group).
///
/// # Isolation
///
/// Same discipline as [`RotationStore`]: writers are exclusive against both
/// readers and other writers, readers may run concurrently with each other.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Assigns a fresh, monotonically increasing (per-store) id, stores the
    /// event, and returns the stored copy.
    async fn add(&self, event: NewEvent, cancel: &CancellationToken) -> Result<Event>;

    /// Returns all events matching both `slot_id` and `group_id`. Order is
    /// unspecified.
    async fn find_all_by_slot_id_and_group_id(
        &self,
        slot_id: SlotId,
        group_id: GroupId,
        cancel: &CancellationToken,
    ) -> Result<Vec<Event>>;

    /// Deletes a single event by id.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Error::NotFound`] if absent. Not used on the hot
    /// path, only by tests.
    async fn remove(&self, event_id: EventId, cancel: &CancellationToken) -> Result<()>;
}

/// Fire-and-forget sink for persisted events.
///
/// Implementations may hand off to a background task/queue; the foreground
/// request must not be blocked by broker slowness beyond a bounded timeout
/// and must not fail because the broker is unavailable. A publish failure
/// is logged, never returned to the caller.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publishes `event`. Failures are swallowed by the implementation
    /// (after logging); this method has no error return because a publish
    /// failure must never affect request correctness.
    async fn publish(&self, event: &Event);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `RotationStore`, `StatsStore` and `EventSink` must be object-safe so
    /// `RotationService` can hold them as `Arc<dyn ...>` without knowing
    /// the concrete backend.
    #[test]
    fn traits_are_object_safe_and_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn RotationStore>();
        assert_send_sync::<dyn StatsStore>();
        assert_send_sync::<dyn EventSink>();
    }
}
