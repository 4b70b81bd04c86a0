//! Core types and traits for the banner rotation service
//!
//! This crate defines the foundational types shared by every other crate
//! in the workspace:
//! - [`Rotation`] / [`Event`]: the two persisted records
//! - [`RotationStore`] / [`StatsStore`] / [`EventSink`]: the storage and
//!   publish abstractions the service is generic over
//! - [`Error`]: the unified error type for the core's request surface

pub mod cancellation;
pub mod error;
pub mod traits;
pub mod types;

pub use cancellation::ensure_not_cancelled;
pub use error::{Error, Result, ResultExt, WrapErrorExt};
pub use traits::{EventSink, RotationStore, StatsStore};
pub use types::{
    BannerId, Event, EventKind, GroupId, NewEvent, NewRotation, Rotation, RotationId, SlotId,
    EventId,
};
