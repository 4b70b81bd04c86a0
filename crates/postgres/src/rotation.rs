//! PostgreSQL-backed `RotationStore`
//!
//! Grounded on `examples/original_source/api/internal/storage/postgres/rotation.go`.
//! `remove` is a silent, idempotent `DELETE` with no rows-affected check.
//! This is the original's actual behaviour, not an oversight, and the
//! asymmetry with [`banner_storage::InMemoryRotationStore`]'s `NotFound`
//! is preserved rather than unified.

use async_trait::async_trait;
use banner_core::{
    ensure_not_cancelled, BannerId, NewRotation, ResultExt, Result, Rotation, RotationStore,
    SlotId,
};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

const QUERY_INSERT: &str = "INSERT INTO rotations(banner_id, slot_id, description, create_at) \
    VALUES ($1, $2, $3, $4) RETURNING id, banner_id, slot_id, description, create_at";
const QUERY_FIND_ALL_BY_SLOT_ID: &str =
    "SELECT id, banner_id, slot_id, description, create_at FROM rotations WHERE slot_id = $1";
const QUERY_FIND_ONE_BY_BANNER_ID: &str =
    "SELECT id, banner_id, slot_id, description, create_at FROM rotations WHERE banner_id = $1 LIMIT 1";
const QUERY_REMOVE_BY_BANNER_ID: &str = "DELETE FROM rotations WHERE banner_id = $1";

#[derive(sqlx::FromRow)]
struct RotationRow {
    id: i64,
    banner_id: BannerId,
    slot_id: SlotId,
    description: String,
    create_at: chrono::DateTime<chrono::Utc>,
}

impl From<RotationRow> for Rotation {
    fn from(row: RotationRow) -> Self {
        Rotation {
            id: row.id as u64,
            banner_id: row.banner_id,
            slot_id: row.slot_id,
            description: row.description,
            created_at: row.create_at,
        }
    }
}

/// `RotationStore` backed by the `rotations` table.
pub struct PostgresRotationStore {
    pool: PgPool,
}

impl PostgresRotationStore {
    /// Wraps an already-connected pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RotationStore for PostgresRotationStore {
    async fn add(&self, rotation: NewRotation, cancel: &CancellationToken) -> Result<Rotation> {
        if cancel.is_cancelled() {
            tracing::info!(
                banner_id = rotation.banner_id,
                "adding a banner to the rotation was canceled due to context cancellation"
            );
        }
        ensure_not_cancelled(cancel)?;

        let row: RotationRow = sqlx::query_as(QUERY_INSERT)
            .bind(rotation.banner_id)
            .bind(rotation.slot_id)
            .bind(&rotation.description)
            .bind(rotation.created_at)
            .fetch_one(&self.pool)
            .await
            .context("error when adding banner in the rotation")?;

        Ok(row.into())
    }

    async fn find_all_by_slot_id(
        &self,
        slot_id: SlotId,
        cancel: &CancellationToken,
    ) -> Result<Vec<Rotation>> {
        if cancel.is_cancelled() {
            tracing::info!(slot_id, "search for all banners was interrupted due to context cancellation");
        }
        ensure_not_cancelled(cancel)?;

        let rows: Vec<RotationRow> = sqlx::query_as(QUERY_FIND_ALL_BY_SLOT_ID)
            .bind(slot_id)
            .fetch_all(&self.pool)
            .await
            .context("error when searching for rotations by slotId")?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_one_by_banner_id(
        &self,
        banner_id: BannerId,
        cancel: &CancellationToken,
    ) -> Result<Rotation> {
        if cancel.is_cancelled() {
            tracing::info!(banner_id, "search for a rotation was interrupted due to context cancellation");
        }
        ensure_not_cancelled(cancel)?;

        let row: Option<RotationRow> = sqlx::query_as(QUERY_FIND_ONE_BY_BANNER_ID)
            .bind(banner_id)
            .fetch_optional(&self.pool)
            .await
            .context("error when searching for a rotation by bannerId")?;

        row.map(Into::into).ok_or(banner_core::Error::NotFound)
    }

    async fn remove(&self, banner_id: BannerId, cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            tracing::info!(
                banner_id,
                "removal rotation of a banner was interrupted due to the cancellation context"
            );
        }
        ensure_not_cancelled(cancel)?;

        sqlx::query(QUERY_REMOVE_BY_BANNER_ID)
            .bind(banner_id)
            .execute(&self.pool)
            .await
            .context("error when remove banner rotation")?;

        Ok(())
    }
}
