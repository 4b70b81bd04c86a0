//! In-memory `RotationStore`

use std::collections::HashMap;

use async_trait::async_trait;
use banner_core::{
    ensure_not_cancelled, BannerId, Error, NewRotation, Result, Rotation, RotationId,
    RotationStore, SlotId,
};
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

struct Inner {
    rotations: HashMap<RotationId, Rotation>,
    next_id: RotationId,
}

/// In-memory rotation catalogue.
///
/// `remove` fails with [`Error::NotFound`] when no rotation matches the
/// given banner id. This is the asymmetric counterpart to the relational
/// store's silently idempotent delete; this inconsistency in the original
/// service is preserved deliberately, not unified.
pub struct InMemoryRotationStore {
    inner: RwLock<Inner>,
}

impl InMemoryRotationStore {
    /// Builds an empty store. Ids start at 1, matching the original's
    /// `ID: 1` initial field value.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                rotations: HashMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryRotationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RotationStore for InMemoryRotationStore {
    async fn add(&self, rotation: NewRotation, cancel: &CancellationToken) -> Result<Rotation> {
        ensure_not_cancelled(cancel)?;

        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;

        let stored = Rotation {
            id,
            banner_id: rotation.banner_id,
            slot_id: rotation.slot_id,
            description: rotation.description,
            created_at: rotation.created_at,
        };
        inner.rotations.insert(id, stored.clone());

        Ok(stored)
    }

    async fn find_all_by_slot_id(
        &self,
        slot_id: SlotId,
        cancel: &CancellationToken,
    ) -> Result<Vec<Rotation>> {
        ensure_not_cancelled(cancel)?;

        let inner = self.inner.read();
        Ok(inner
            .rotations
            .values()
            .filter(|rotation| rotation.slot_id == slot_id)
            .cloned()
            .collect())
    }

    async fn find_one_by_banner_id(
        &self,
        banner_id: BannerId,
        cancel: &CancellationToken,
    ) -> Result<Rotation> {
        ensure_not_cancelled(cancel)?;

        let inner = self.inner.read();
        inner
            .rotations
            .values()
            .find(|rotation| rotation.banner_id == banner_id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn remove(&self, banner_id: BannerId, cancel: &CancellationToken) -> Result<()> {
        ensure_not_cancelled(cancel)?;

        let mut inner = self.inner.write();
        let matching: Vec<RotationId> = inner
            .rotations
            .values()
            .filter(|rotation| rotation.banner_id == banner_id)
            .map(|rotation| rotation.id)
            .collect();

        if matching.is_empty() {
            return Err(Error::NotFound);
        }

        for id in matching {
            inner.rotations.remove(&id);
        }

        Ok(())
    }
}
