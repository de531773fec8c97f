use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{ids, AttendanceEvent, CheckIn, CheckInRequest, DailyTarget, EventId, WeeklyReport};
use crate::services::aggregator;
use crate::services::eventstore::EventStore;
use crate::services::query::AttendanceQuery;
use crate::utils::date;

/// Ingest, query and summarize over one event store. Holds no state of its own, so clones are
/// cheap and interchangeable.
#[derive(Clone)]
pub struct AttendanceService {
    store: Arc<dyn EventStore>,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    /// Validate and append a check-in, returning its store-assigned id.
    pub async fn append(&self, request: &CheckInRequest) -> Result<EventId> {
        self.append_at(request, Utc::now()).await
    }

    pub async fn append_at(&self, request: &CheckInRequest, created_at: DateTime<Utc>) -> Result<EventId> {
        let check_in = CheckIn::validate(request)?;
        let event = check_in.into_event(ids::new_event_id(), created_at);

        self.store.insert(&event).await?;
        tracing::info!(
            event_id = %event.id,
            identity = %event.identity,
            date = %event.date,
            "Attendance recorded"
        );
        Ok(event.id)
    }

    pub async fn query(&self, query: AttendanceQuery) -> Result<Vec<AttendanceEvent>> {
        self.query_at(query, Utc::now()).await
    }

    pub async fn query_at(&self, query: AttendanceQuery, now: DateTime<Utc>) -> Result<Vec<AttendanceEvent>> {
        let events = query.execute(self.store.as_ref(), now).await?;
        tracing::debug!(?query, count = events.len(), "Attendance query executed");
        Ok(events)
    }

    /// Weekly report anchored at today's UTC date over the default 7-day window.
    pub async fn weekly_report(&self, target: DailyTarget) -> Result<WeeklyReport> {
        self.weekly_report_at(target, Utc::now()).await
    }

    pub async fn weekly_report_at(&self, target: DailyTarget, now: DateTime<Utc>) -> Result<WeeklyReport> {
        let events = self.query_at(AttendanceQuery::default(), now).await?;
        Ok(aggregator::summarize(&events, date::utc_date(&now), target))
    }

    pub async fn health_check(&self) -> Result<()> {
        self.store.health_check().await?;
        Ok(())
    }
}
