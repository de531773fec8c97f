//! Process-local event store for tests and `ATTENDANCE_STORE=memory` demos. Not durable.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{AttendanceEvent, EventId};
use crate::services::eventstore::{newest_first, EventStore};

#[derive(Debug, Default)]
pub struct MemoryEventStore {
    log: RwLock<Log>,
}

#[derive(Debug, Default)]
struct Log {
    events: Vec<AttendanceEvent>,
    ids: HashSet<EventId>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn insert(&self, event: &AttendanceEvent) -> Result<(), StoreError> {
        let mut log = self.log.write().await;
        if !log.ids.insert(event.id) {
            return Err(StoreError::Unavailable(format!("duplicate event id {}", event.id)));
        }
        log.events.push(event.clone());
        Ok(())
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceEvent>, StoreError> {
        let mut matching: Vec<AttendanceEvent> = self
            .log
            .read()
            .await
            .events
            .iter()
            .filter(|event| event.date == date)
            .cloned()
            .collect();
        matching.sort_by(newest_first);
        Ok(matching)
    }

    async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<AttendanceEvent>, StoreError> {
        let mut matching: Vec<AttendanceEvent> = self
            .log
            .read()
            .await
            .events
            .iter()
            .filter(|event| event.timestamp >= start && event.timestamp <= end)
            .cloned()
            .collect();
        matching.sort_by(newest_first);
        matching.truncate(limit);
        Ok(matching)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.log.read().await.events.len() as u64)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
