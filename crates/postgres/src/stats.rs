//! PostgreSQL-backed `StatsStore`
//!
//! Grounded on `examples/original_source/api/internal/storage/postgres/statistic.go`.

use async_trait::async_trait;
use banner_core::{
    ensure_not_cancelled, BannerId, Event, EventId, EventKind, GroupId, NewEvent, ResultExt,
    Result, SlotId, StatsStore,
};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

const QUERY_INSERT: &str = "INSERT INTO statistics(type, banner_id, slot_id, group_id, created_at) \
    VALUES ($1, $2, $3, $4, $5) RETURNING id, type, banner_id, slot_id, group_id, created_at";
const QUERY_FIND_ALL_BY_SLOT_ID_AND_GROUP_ID: &str =
    "SELECT id, type, banner_id, slot_id, group_id, created_at FROM statistics \
     WHERE slot_id = $1 AND group_id = $2";
const QUERY_REMOVE_BY_ID: &str = "DELETE FROM statistics WHERE id = $1";

#[derive(sqlx::FromRow)]
struct StatisticRow {
    id: i64,
    r#type: i32,
    banner_id: BannerId,
    slot_id: SlotId,
    group_id: GroupId,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<StatisticRow> for Event {
    type Error = banner_core::Error;

    fn try_from(row: StatisticRow) -> std::result::Result<Self, Self::Error> {
        let kind = EventKind::from_discriminant(row.r#type).ok_or_else(|| {
            banner_core::Error::storage(
                format!("unrecognized statistics.type {}", row.r#type),
                std::io::Error::new(std::io::ErrorKind::InvalidData, "unknown event kind"),
            )
        })?;

        Ok(Event {
            id: row.id as EventId,
            kind,
            banner_id: row.banner_id,
            slot_id: row.slot_id,
            group_id: row.group_id,
            created_at: row.created_at,
        })
    }
}

/// `StatsStore` backed by the `statistics` table.
pub struct PostgresStatsStore {
    pool: PgPool,
}

impl PostgresStatsStore {
    /// Wraps an already-connected pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsStore for PostgresStatsStore {
    async fn add(&self, event: NewEvent, cancel: &CancellationToken) -> Result<Event> {
        if cancel.is_cancelled() {
            tracing::info!(
                banner_id = event.banner_id,
                "adding a statistics was canceled due to context cancellation"
            );
        }
        ensure_not_cancelled(cancel)?;

        let row: StatisticRow = sqlx::query_as(QUERY_INSERT)
            .bind(event.kind.discriminant())
            .bind(event.banner_id)
            .bind(event.slot_id)
            .bind(event.group_id)
            .bind(event.created_at)
            .fetch_one(&self.pool)
            .await
            .context("error when adding statistics")?;

        row.try_into()
    }

    async fn find_all_by_slot_id_and_group_id(
        &self,
        slot_id: SlotId,
        group_id: GroupId,
        cancel: &CancellationToken,
    ) -> Result<Vec<Event>> {
        if cancel.is_cancelled() {
            tracing::info!(
                slot_id,
                group_id,
                "search for all statistics was interrupted due to context cancellation"
            );
        }
        ensure_not_cancelled(cancel)?;

        let rows: Vec<StatisticRow> = sqlx::query_as(QUERY_FIND_ALL_BY_SLOT_ID_AND_GROUP_ID)
            .bind(slot_id)
            .bind(group_id)
            .fetch_all(&self.pool)
            .await
            .context("error when searching statistics by slotId and groupId")?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn remove(&self, event_id: EventId, cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            tracing::info!(
                event_id,
                "removal statistics was interrupted due to the cancellation context"
            );
        }
        ensure_not_cancelled(cancel)?;

        sqlx::query(QUERY_REMOVE_BY_ID)
            .bind(event_id as i64)
            .execute(&self.pool)
            .await
            .context("error when remove statistics")?;

        Ok(())
    }
}
