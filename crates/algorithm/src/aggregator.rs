//! Collapses rotation membership and raw event rows into per-banner arms
//!
//! Grounded on the original service's `defineBanner` helper
//! (`internal/domain/service/rotation.go`): build a map keyed by banner id,
//! walk the rotations to seed zero counters, walk the events to accumulate
//! them, and emit parallel vectors. Events for banners no longer in the
//! rotation are dropped; they describe banners the policy can no longer
//! select.

use std::collections::BTreeMap;

use banner_core::{BannerId, Event, EventKind, Rotation};

/// The three parallel vectors the selector consumes: `arms[i]` is a banner
/// id, `counts[i]` its view count, `rewards[i]` its click count.
///
/// Note that `rewards` holds raw click counts, not a click-through rate in
/// `[0, 1]`. This is the original service's behaviour and is preserved
/// rather than "corrected".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregatedArms {
    /// Banner id for each arm.
    pub arms: Vec<BannerId>,
    /// View (impression) count for each arm.
    pub counts: Vec<u64>,
    /// Click count for each arm.
    pub rewards: Vec<f64>,
}

impl AggregatedArms {
    /// Number of arms produced.
    pub fn len(&self) -> usize {
        self.arms.len()
    }

    /// True if no banner is currently in rotation for this slot.
    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }
}

/// Builds the arm vectors for one (slot, group) selection.
///
/// `rotations` should already be filtered to a single slot and `events` to
/// that same slot and a single group. The caller (`RotationService`) is
/// responsible for that filtering via the store queries; this function only
/// aggregates what it is given.
///
/// Iteration order over distinct banner ids is a `BTreeMap`'s ascending
/// order: a fixed, deterministic choice that satisfies the "fixed but
/// unspecified" contract, since the selector only depends on the vectors
/// jointly, never on their order.
pub fn aggregate(rotations: &[Rotation], events: &[Event]) -> AggregatedArms {
    let mut banners: BTreeMap<BannerId, (u64, f64)> = BTreeMap::new();
    for rotation in rotations {
        banners.entry(rotation.banner_id).or_insert((0, 0.0));
    }

    for event in events {
        if let Some(counters) = banners.get_mut(&event.banner_id) {
            match event.kind {
                EventKind::View => counters.0 += 1,
                EventKind::Click => counters.1 += 1.0,
            }
        }
    }

    let mut arms = Vec::with_capacity(banners.len());
    let mut counts = Vec::with_capacity(banners.len());
    let mut rewards = Vec::with_capacity(banners.len());
    for (banner_id, (views, clicks)) in banners {
        arms.push(banner_id);
        counts.push(views);
        rewards.push(clicks);
    }

    AggregatedArms {
        arms,
        counts,
        rewards,
    }
}
