//! In-memory `StatsStore`

use std::collections::HashMap;

use async_trait::async_trait;
use banner_core::{
    ensure_not_cancelled, Error, Event, EventId, GroupId, NewEvent, Result, SlotId, StatsStore,
};
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

struct Inner {
    events: HashMap<EventId, Event>,
    next_id: EventId,
}

/// In-memory, append-only event log.
pub struct InMemoryStatsStore {
    inner: RwLock<Inner>,
}

impl InMemoryStatsStore {
    /// Builds an empty store. Ids start at 1, matching the original's
    /// `ID: 1` initial field value.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                events: HashMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryStatsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatsStore for InMemoryStatsStore {
    async fn add(&self, event: NewEvent, cancel: &CancellationToken) -> Result<Event> {
        ensure_not_cancelled(cancel)?;

        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;

        let stored = Event {
            id,
            kind: event.kind,
            banner_id: event.banner_id,
            slot_id: event.slot_id,
            group_id: event.group_id,
            created_at: event.created_at,
        };
        inner.events.insert(id, stored.clone());

        Ok(stored)
    }

    async fn find_all_by_slot_id_and_group_id(
        &self,
        slot_id: SlotId,
        group_id: GroupId,
        cancel: &CancellationToken,
    ) -> Result<Vec<Event>> {
        ensure_not_cancelled(cancel)?;

        let inner = self.inner.read();
        Ok(inner
            .events
            .values()
            .filter(|event| event.slot_id == slot_id && event.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn remove(&self, event_id: EventId, cancel: &CancellationToken) -> Result<()> {
        ensure_not_cancelled(cancel)?;

        let mut inner = self.inner.write();
        if inner.events.remove(&event_id).is_none() {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banner_core::EventKind;

    fn token() -> CancellationToken {
        CancellationToken::new()
    }

    fn new_event(kind: EventKind, banner_id: i64, slot_id: i64, group_id: i64) -> NewEvent {
        NewEvent::now(kind, banner_id, slot_id, group_id)
    }

    #[tokio::test]
    async fn add_assigns_increasing_ids_starting_at_one() {
        let store = InMemoryStatsStore::new();
        let first = store
            .add(new_event(EventKind::View, 1, 1, 1), &token())
            .await
            .unwrap();
        let second = store
            .add(new_event(EventKind::Click, 1, 1, 1), &token())
            .await
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn find_all_filters_by_both_slot_and_group() {
        let store = InMemoryStatsStore::new();
        store
            .add(new_event(EventKind::View, 1, 5, 8), &token())
            .await
            .unwrap();
        store
            .add(new_event(EventKind::View, 1, 5, 9), &token())
            .await
            .unwrap();
        store
            .add(new_event(EventKind::View, 1, 6, 8), &token())
            .await
            .unwrap();

        let found = store
            .find_all_by_slot_id_and_group_id(5, 8, &token())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].slot_id, 5);
        assert_eq!(found[0].group_id, 8);
    }

    #[tokio::test]
    async fn remove_fails_not_found_on_an_absent_event() {
        let store = InMemoryStatsStore::new();
        assert!(matches!(store.remove(1, &token()).await, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn remove_deletes_a_single_event() {
        let store = InMemoryStatsStore::new();
        let event = store
            .add(new_event(EventKind::Click, 13, 5, 8), &token())
            .await
            .unwrap();

        store.remove(event.id, &token()).await.unwrap();

        let remaining = store
            .find_all_by_slot_id_and_group_id(5, 8, &token())
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_adds_never_collide_on_event_id() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryStatsStore::new());
        let mut handles = Vec::new();

        for _ in 0..100 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .add(
                        new_event(EventKind::View, 1, 1, 1),
                        &CancellationToken::new(),
                    )
                    .await
                    .unwrap()
            }));
        }

        let mut ids: Vec<EventId> = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().id);
        }

        ids.sort_unstable();
        let before_dedup = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before_dedup, "no two events share an id");

        let events = store
            .find_all_by_slot_id_and_group_id(1, 1, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(events.len(), 100);
    }
}
