//! `RotationService`: orchestrates `RotationStore`, `StatsStore`, the
//! selector/aggregator pair and the event sink to implement the four
//! operations transports expose.

use std::sync::Arc;
use std::time::Duration;

use banner_algorithm::aggregate;
use banner_core::{
    BannerId, Event, EventKind, GroupId, NewEvent, NewRotation, Result, Rotation, RotationStore,
    SlotId, StatsStore, WrapErrorExt,
};
use tokio_util::sync::CancellationToken;

/// Publish is best-effort: it must never hold up the foreground request
/// waiting on a slow or unreachable broker.
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(2);

/// Ties a [`RotationStore`], a [`StatsStore`] and an
/// [`EventSink`](banner_core::EventSink) together into the four operations
/// `Add`, `Remove`, `SelectBanner` and `SetTransition`.
pub struct RotationService {
    rotations: Arc<dyn RotationStore>,
    stats: Arc<dyn StatsStore>,
    sink: Arc<dyn banner_core::EventSink>,
}

impl RotationService {
    /// Builds a service over the given stores and event sink.
    pub fn new(
        rotations: Arc<dyn RotationStore>,
        stats: Arc<dyn StatsStore>,
        sink: Arc<dyn banner_core::EventSink>,
    ) -> Self {
        Self {
            rotations,
            stats,
            sink,
        }
    }

    /// Stamps `CreatedAt = now(UTC)`, forwards to `RotationStore::add`.
    pub async fn add(
        &self,
        banner_id: BannerId,
        slot_id: SlotId,
        description: String,
        cancel: &CancellationToken,
    ) -> Result<Rotation> {
        let rotation = NewRotation::now(banner_id, slot_id, description);
        self.rotations
            .add(rotation, cancel)
            .await
            .wrap_context("error when adding banner in the rotation")
    }

    /// Delegates to `RotationStore::remove`.
    pub async fn remove(&self, banner_id: BannerId, cancel: &CancellationToken) -> Result<()> {
        self.rotations
            .remove(banner_id, cancel)
            .await
            .wrap_context("error while removing banner from rotation")
    }

    /// Looks up the rotation a banner currently belongs to. Transports use
    /// this to resolve `SetTransition`'s `bannerId` into the
    /// `(bannerID, slotID)` pair the service needs, matching the original
    /// handler's direct `RotationRepository.FindOneByBannerID` call.
    pub async fn find_rotation_by_banner_id(
        &self,
        banner_id: BannerId,
        cancel: &CancellationToken,
    ) -> Result<Rotation> {
        self.rotations
            .find_one_by_banner_id(banner_id, cancel)
            .await
            .wrap_context("error when searching for a rotation by bannerId")
    }

    /// Selects a banner for `(slot_id, group_id)` under the UCB1 policy,
    /// records a VIEW event for the selection, and returns `(bannerID,
    /// event)`. Publish failures are logged but never surfaced here.
    pub async fn select_banner(
        &self,
        slot_id: SlotId,
        group_id: GroupId,
        cancel: &CancellationToken,
    ) -> Result<(BannerId, Event)> {
        let rotations = self
            .rotations
            .find_all_by_slot_id(slot_id, cancel)
            .await
            .wrap_context("error when searching for rotations by slot id for banner selection")?;

        let events = self
            .stats
            .find_all_by_slot_id_and_group_id(slot_id, group_id, cancel)
            .await
            .wrap_context("error getting statistics for a selection of banner")?;

        if rotations.is_empty() {
            return Err(banner_core::Error::EmptyRotations);
        }

        let aggregated = aggregate(&rotations, &events);
        let arm = banner_algorithm::select_arm(&aggregated.counts, &aggregated.rewards)
            .wrap_context("error when selecting an arm")?;
        let banner_id = aggregated.arms[arm];

        let event = self
            .stats
            .add(
                NewEvent::now(EventKind::View, banner_id, slot_id, group_id),
                cancel,
            )
            .await
            .wrap_context("error while save view")?;

        self.publish_best_effort(&event).await;

        Ok((banner_id, event))
    }

    /// Records a CLICK event for `rotation` in `group_id` and publishes it
    /// best-effort.
    pub async fn set_transition(
        &self,
        rotation: &Rotation,
        group_id: GroupId,
        cancel: &CancellationToken,
    ) -> Result<Event> {
        let event = self
            .stats
            .add(
                NewEvent::now(
                    EventKind::Click,
                    rotation.banner_id,
                    rotation.slot_id,
                    group_id,
                ),
                cancel,
            )
            .await
            .wrap_context("error when set the transition")?;

        self.publish_best_effort(&event).await;

        Ok(event)
    }

    async fn publish_best_effort(&self, event: &Event) {
        match tokio::time::timeout(PUBLISH_TIMEOUT, self.sink.publish(event)).await {
            Ok(()) => {}
            Err(_) => {
                tracing::warn!(
                    event_id = event.id,
                    banner_id = event.banner_id,
                    "publish timed out; event remains the source of truth in the stats store"
                );
            }
        }
    }
}
