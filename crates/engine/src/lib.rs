//! `RotationService`: the orchestrator tying the stores, the selector and
//! the event sink together.

pub mod service;
pub mod sink;

pub use service::RotationService;
pub use sink::NullSink;
