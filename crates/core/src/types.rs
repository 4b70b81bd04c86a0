//! Domain model: rotations (slot↔banner memberships) and events (views/clicks)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a [`Rotation`] by whichever store created it.
pub type RotationId = u64;

/// Identifier assigned to an [`Event`] by whichever store created it.
pub type EventId = u64;

/// Caller-assigned identifier for a banner. The banner itself is not owned
/// by this system; the catalogue only references it.
pub type BannerId = i64;

/// Identifier of an advertising placement.
pub type SlotId = i64;

/// Identifier of an audience segment.
pub type GroupId = i64;

/// The kind of interaction an [`Event`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum EventKind {
    /// An impression: the banner was shown.
    View = 1,
    /// A click: the banner was followed.
    Click = 2,
}

impl From<EventKind> for i32 {
    fn from(kind: EventKind) -> Self {
        kind.discriminant()
    }
}

impl TryFrom<i32> for EventKind {
    type Error = String;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        EventKind::from_discriminant(value).ok_or_else(|| format!("unknown event kind {value}"))
    }
}

impl EventKind {
    /// The wire/storage discriminant, matching the original service's
    /// `StatisticsTypeView = 1` / `StatisticsTypeClick = 2` constants.
    pub fn discriminant(self) -> i32 {
        self as i32
    }

    /// Recovers an `EventKind` from its storage discriminant.
    pub fn from_discriminant(value: i32) -> Option<Self> {
        match value {
            1 => Some(EventKind::View),
            2 => Some(EventKind::Click),
            _ => None,
        }
    }

    /// True if this is a view event.
    pub fn is_view(self) -> bool {
        matches!(self, EventKind::View)
    }

    /// True if this is a click event.
    pub fn is_click(self) -> bool {
        matches!(self, EventKind::Click)
    }
}

/// A membership record placing a banner into a slot.
///
/// Invariant: the tuple `(banner_id, slot_id)` identifies a membership;
/// [`RotationStore::remove`](crate::traits::RotationStore::remove) deletes
/// all rotations for a given banner across every slot it participates in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    /// Assigned by the store, unique within the store.
    pub id: RotationId,
    /// The banner being placed.
    pub banner_id: BannerId,
    /// The slot it competes for.
    pub slot_id: SlotId,
    /// Free-text description.
    pub description: String,
    /// UTC instant the rotation was created.
    pub created_at: DateTime<Utc>,
}

/// A [`Rotation`] before it has been assigned an id by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRotation {
    /// The banner being placed.
    pub banner_id: BannerId,
    /// The slot it competes for.
    pub slot_id: SlotId,
    /// Free-text description.
    pub description: String,
    /// UTC instant the rotation was created.
    pub created_at: DateTime<Utc>,
}

impl NewRotation {
    /// Builds a new rotation stamped with the current UTC instant.
    pub fn now(banner_id: BannerId, slot_id: SlotId, description: String) -> Self {
        Self {
            banner_id,
            slot_id,
            description,
            created_at: Utc::now(),
        }
    }
}

/// An append-only fact recording an interaction.
///
/// Invariant: events are never mutated; removal exists but is only used by
/// tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Assigned by the store.
    pub id: EventId,
    /// View or click.
    pub kind: EventKind,
    /// The banner this event is about.
    pub banner_id: BannerId,
    /// The slot this event occurred in.
    pub slot_id: SlotId,
    /// The audience segment this event belongs to.
    pub group_id: GroupId,
    /// UTC instant the event was recorded.
    pub created_at: DateTime<Utc>,
}

/// An [`Event`] before it has been assigned an id by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    /// View or click.
    pub kind: EventKind,
    /// The banner this event is about.
    pub banner_id: BannerId,
    /// The slot this event occurred in.
    pub slot_id: SlotId,
    /// The audience segment this event belongs to.
    pub group_id: GroupId,
    /// UTC instant the event was recorded.
    pub created_at: DateTime<Utc>,
}

impl NewEvent {
    /// Builds a new event stamped with the current UTC instant.
    pub fn now(kind: EventKind, banner_id: BannerId, slot_id: SlotId, group_id: GroupId) -> Self {
        Self {
            kind,
            banner_id,
            slot_id,
            group_id,
            created_at: Utc::now(),
        }
    }
}
