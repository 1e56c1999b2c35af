use std::time::{Duration, Instant};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::scorecard::{NewScorecardEntry, Perspective, ScorecardEntry};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/bsc";

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the persistence API: one create/read/update resource
/// per perspective, keyed by department and record id.
#[derive(Debug, Clone)]
pub struct ScorecardApi {
    client: reqwest::Client,
    base_url: String,
}

impl ScorecardApi {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        Self::with_timeout(base_url, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|err| AppError::other(format!("failed to build scorecard HTTP client: {err}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, perspective: Perspective, suffix: &str) -> String {
        format!("{}/{}/{}", self.base_url, perspective.path_segment(), suffix)
    }

    /// `GET {base}/{perspective}/get/{department_id}` — all entries for one
    /// perspective of one department.
    pub async fn fetch(
        &self,
        perspective: Perspective,
        department_id: i64,
    ) -> AppResult<Vec<ScorecardEntry>> {
        let correlation_id = Uuid::new_v4().to_string();
        let url = self.endpoint(perspective, &format!("get/{department_id}"));

        debug!(
            target: "app::api",
            perspective = perspective.as_str(),
            department_id,
            correlation_id = %correlation_id,
            "fetching scorecard entries"
        );

        let start = Instant::now();
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::map_status_error(
                "fetching scorecard entries",
                status.as_u16(),
                &correlation_id,
            ));
        }

        let entries: Vec<ScorecardEntry> = response.json().await.map_err(|err| {
            AppError::transport(
                format!("invalid scorecard list response: {err}"),
                Some(correlation_id.as_str()),
            )
        })?;

        debug!(
            target: "app::api",
            perspective = perspective.as_str(),
            correlation_id = %correlation_id,
            latency_ms = start.elapsed().as_millis() as u64,
            count = entries.len(),
            "scorecard entries fetched"
        );

        Ok(entries)
    }

    /// `POST {base}/{perspective}/insert` — creates a record; the server
    /// assigns and returns the id.
    pub async fn insert(
        &self,
        perspective: Perspective,
        payload: &NewScorecardEntry,
    ) -> AppResult<ScorecardEntry> {
        let correlation_id = Uuid::new_v4().to_string();
        let url = self.endpoint(perspective, "insert");

        debug!(
            target: "app::api",
            perspective = perspective.as_str(),
            department_id = payload.department.id,
            target_code = %payload.target_code,
            correlation_id = %correlation_id,
            "inserting scorecard entry"
        );

        let response = self.client.post(&url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::map_status_error(
                "saving scorecard entry",
                status.as_u16(),
                &correlation_id,
            ));
        }

        let saved: ScorecardEntry = response.json().await.map_err(|err| {
            AppError::transport(
                format!("invalid insert response: {err}"),
                Some(correlation_id.as_str()),
            )
        })?;

        debug!(
            target: "app::api",
            perspective = perspective.as_str(),
            id = saved.id,
            correlation_id = %correlation_id,
            "scorecard entry inserted"
        );

        Ok(saved)
    }

    /// `PUT {base}/{perspective}/update/{id}` — replaces the record's
    /// fields. A bare 2xx with no body counts as confirmation and the
    /// submitted record is echoed back.
    pub async fn update(
        &self,
        perspective: Perspective,
        entry: &ScorecardEntry,
    ) -> AppResult<ScorecardEntry> {
        let correlation_id = Uuid::new_v4().to_string();
        let url = self.endpoint(perspective, &format!("update/{}", entry.id));

        debug!(
            target: "app::api",
            perspective = perspective.as_str(),
            id = entry.id,
            correlation_id = %correlation_id,
            "updating scorecard entry"
        );

        let response = self.client.put(&url).json(entry).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::map_status_error(
                "updating scorecard entry",
                status.as_u16(),
                &correlation_id,
            ));
        }

        let body = response.bytes().await.map_err(|err| {
            AppError::transport(
                format!("failed to read update response: {err}"),
                Some(correlation_id.as_str()),
            )
        })?;

        if body.iter().all(|byte| byte.is_ascii_whitespace()) {
            debug!(
                target: "app::api",
                id = entry.id,
                correlation_id = %correlation_id,
                "update confirmed without a body, echoing submitted entry"
            );
            return Ok(entry.clone());
        }

        match serde_json::from_slice::<ScorecardEntry>(&body) {
            Ok(updated) => Ok(updated),
            Err(err) => {
                debug!(
                    target: "app::api",
                    id = entry.id,
                    correlation_id = %correlation_id,
                    error = %err,
                    "update response is not a record, echoing submitted entry"
                );
                Ok(entry.clone())
            }
        }
    }

    fn map_status_error(context: &str, status: u16, correlation_id: &str) -> AppError {
        warn!(
            target: "app::api",
            correlation_id = %correlation_id,
            status,
            context,
            "persistence API returned a non-success status"
        );
        if status == 404 {
            AppError::not_found()
        } else {
            AppError::transport_with_status(
                format!("{context} failed (status {status})"),
                status,
                Some(correlation_id),
            )
        }
    }
}
