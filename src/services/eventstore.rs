use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::database::DatabasePool;
use crate::error::StoreError;
use crate::models::AttendanceEvent;

/// Append-only log of check-in events.
///
/// Implementations never update or delete a stored event. Reads return a snapshot ordered
/// newest first (by `timestamp`, then `created_at`).
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a fully-formed event. The caller has already validated it and assigned its id.
    async fn insert(&self, event: &AttendanceEvent) -> Result<(), StoreError>;

    /// All events whose UTC `date` equals `date`.
    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceEvent>, StoreError>;

    /// Events with `start <= timestamp <= end`, at most `limit` of them.
    async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<AttendanceEvent>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Ordering used by every read: newest `timestamp` first, ties broken by newest `created_at`.
pub(crate) fn newest_first(a: &AttendanceEvent, b: &AttendanceEvent) -> Ordering {
    b.timestamp
        .cmp(&a.timestamp)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

const SELECT_COLUMNS: &str =
    "SELECT id, name, identity, checked_in_at, check_in_date, created_at FROM attendance_events";

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: DatabasePool,
}

impl PgEventStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Apply embedded migrations. Safe to call on every startup.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&*self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn insert(&self, event: &AttendanceEvent) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO attendance_events (id, name, identity, checked_in_at, check_in_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.identity)
        .bind(event.timestamp)
        .bind(event.date)
        .bind(event.created_at)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceEvent>, StoreError> {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE check_in_date = $1 ORDER BY checked_in_at DESC, created_at DESC"
        );
        let events = sqlx::query_as::<_, AttendanceEvent>(&sql)
            .bind(date)
            .fetch_all(&*self.pool)
            .await?;
        Ok(events)
    }

    async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<AttendanceEvent>, StoreError> {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE checked_in_at >= $1 AND checked_in_at <= $2 \
             ORDER BY checked_in_at DESC, created_at DESC LIMIT $3"
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let events = sqlx::query_as::<_, AttendanceEvent>(&sql)
            .bind(start)
            .bind(end)
            .bind(limit)
            .fetch_all(&*self.pool)
            .await?;
        Ok(events)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance_events")
            .fetch_one(&*self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&*self.pool).await?;
        Ok(())
    }
}
