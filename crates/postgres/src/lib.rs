//! PostgreSQL-backed `RotationStore` and `StatsStore` implementations
//!
//! Grounded on `examples/original_source/api/internal/storage/postgres/*.go`:
//! the same two tables (`rotations`, `statistics`), the same queries, and
//! the same `ctx.Err() == context.Canceled` fail-fast-before-querying check,
//! translated to [`banner_core::ensure_not_cancelled`]. Built on `sqlx`
//! rather than `jmoiron/sqlx` + `database/sql`, the async Postgres driver
//! this workspace's `examples/rust-nostr-nostr`-style sqlx usage favours.

pub mod pool;
pub mod rotation;
pub mod stats;

pub use pool::{connect_pool, PoolSettings};
pub use rotation::PostgresRotationStore;
pub use stats::PostgresStatsStore;
