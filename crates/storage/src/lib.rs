//! In-memory `RotationStore` and `StatsStore` implementations
//!
//! These back the test suite and the default, no-external-dependencies
//! deployment of the service. Both are guarded by a
//! [`parking_lot::RwLock`](parking_lot::RwLock), matching the original
//! service's `sync.RWMutex`-guarded maps
//! (`internal/storage/memory/{rotation,statistic}.go`): writers
//! (`add`/`remove`) take exclusive access, readers (`find_all_*`,
//! `find_one_*`) may run concurrently with each other.

pub mod rotation;
pub mod stats;

pub use rotation::InMemoryRotationStore;
pub use stats::InMemoryStatsStore;
