//! HTTP client for the attendance API (check-in devices, seeding, the terminal dashboard).

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use crate::background::poller::ReportSource;
use crate::handlers::{AttendanceListResponse, RecordAttendanceResponse, SummaryResponse};
use crate::models::{ids, CheckInRequest, DailyTarget, EventId, WeeklyReport};
use crate::services::aggregator;
use crate::services::query::AttendanceQuery;
use crate::utils::date::{self, DATE_FORMAT};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone)]
pub struct AttendanceClient {
    http: reqwest::Client,
    base_url: String,
}

impl AttendanceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST /attendance -> { id, message }
    pub async fn record(&self, request: &CheckInRequest) -> Result<EventId, ClientError> {
        let url = format!("{}/attendance", self.base_url);
        let resp = self.http.post(&url).json(request).send().await?;
        let body: RecordAttendanceResponse = read_json(resp).await?;
        ids::parse_event_id(&body.id).map_err(ClientError::InvalidResponse)
    }

    /// GET /attendance with either `date` or `days`.
    pub async fn fetch(&self, query: AttendanceQuery) -> Result<AttendanceListResponse, ClientError> {
        let url = format!("{}/attendance", self.base_url);
        let params = match query {
            AttendanceQuery::ByDate(day) => vec![("date", day.format(DATE_FORMAT).to_string())],
            AttendanceQuery::ByWindow { days } => vec![("days", days.to_string())],
        };
        let resp = self.http.get(&url).query(&params).send().await?;
        read_json(resp).await
    }

    /// GET /attendance/summary; the server's configured target applies when `target` is None.
    pub async fn summary(&self, target: Option<DailyTarget>) -> Result<WeeklyReport, ClientError> {
        let url = format!("{}/attendance/summary", self.base_url);
        let mut request = self.http.get(&url);
        if let Some(target) = target {
            request = request.query(&[("target", target.get())]);
        }
        let body: SummaryResponse = read_json(request.send().await?).await?;
        Ok(body.data)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(ClientError::Status { status, body: text });
    }
    serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

/// Fetches the default window and summarizes it locally against today's UTC date, the way the
/// browser dashboard does.
#[derive(Debug, Clone)]
pub struct HttpReportSource {
    client: AttendanceClient,
    target: DailyTarget,
}

impl HttpReportSource {
    pub fn new(client: AttendanceClient, target: DailyTarget) -> Self {
        Self { client, target }
    }
}

#[async_trait]
impl ReportSource for HttpReportSource {
    async fn fetch_report(&self) -> anyhow::Result<WeeklyReport> {
        let listing = self.client.fetch(AttendanceQuery::default()).await?;
        let today = date::utc_date(&Utc::now());
        Ok(aggregator::summarize(&listing.data, today, self.target))
    }
}
