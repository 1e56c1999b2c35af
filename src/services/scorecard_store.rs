use serde_json::json;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::scorecard::{
    DepartmentRef, EntryStatus, Metric, NewScorecardEntry, Perspective, ScorecardEntry,
};
use crate::services::metric_policy;
use crate::services::scorecard_api::ScorecardApi;

/// Whether a save creates a fresh record or replaces an existing one.
/// The caller is in exactly one of the two modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Create,
    Edit(i64),
}

/// Form state for one entry: every field independently editable, the
/// performance slots normalized on each change so the draft is always
/// policy-compliant while the user types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryDraft {
    pub target_code: String,
    pub metric: Option<Metric>,
    pub office_target: String,
    pub status: Option<EntryStatus>,
    pub key_performance_indicator: String,
    pub target_performance: Option<f64>,
    pub actual_performance: Option<f64>,
    pub actions: Option<String>,
    pub budget: Option<String>,
    pub incharge: Option<String>,
    pub ofi: Option<String>,
}

impl EntryDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an existing record into the form for editing.
    pub fn from_entry(entry: &ScorecardEntry) -> Self {
        Self {
            target_code: entry.target_code.clone(),
            metric: Some(entry.metric),
            office_target: entry.office_target.clone(),
            status: Some(entry.status),
            key_performance_indicator: entry.key_performance_indicator.clone(),
            target_performance: entry
                .target_performance
                .as_deref()
                .and_then(|raw| raw.parse::<f64>().ok()),
            actual_performance: entry
                .actual_performance
                .as_deref()
                .and_then(|raw| raw.parse::<f64>().ok()),
            actions: entry.actions.clone(),
            budget: entry.budget.clone(),
            incharge: entry.incharge.clone(),
            ofi: entry.ofi.clone(),
        }
    }

    /// Changing the metric re-validates the performance fields against the
    /// new bounds. Values already persisted elsewhere are left alone.
    pub fn set_metric(&mut self, metric: Metric) {
        self.metric = Some(metric);
        self.target_performance = self
            .target_performance
            .and_then(|value| metric_policy::apply(metric, value));
        self.actual_performance = self
            .actual_performance
            .and_then(|value| metric_policy::apply(metric, value));
    }

    pub fn set_target_performance(&mut self, raw: &str) {
        self.target_performance = metric_policy::normalize(self.effective_metric(), raw);
    }

    pub fn set_actual_performance(&mut self, raw: &str) {
        self.actual_performance = metric_policy::normalize(self.effective_metric(), raw);
    }

    // With no metric picked yet the original forms fall through to the
    // free 0..=1000 limit, which is the Count bounds.
    fn effective_metric(&self) -> Metric {
        self.metric.unwrap_or(Metric::Count)
    }

    /// The required-field check run before any network call. A draft with
    /// any of the seven required fields missing never produces a request.
    pub fn validate(&self) -> AppResult<()> {
        let mut missing = Vec::new();
        if self.target_code.trim().is_empty() {
            missing.push("targetCode");
        }
        if self.metric.is_none() {
            missing.push("metric");
        }
        if self.office_target.trim().is_empty() {
            missing.push("officeTarget");
        }
        if self.status.is_none() {
            missing.push("status");
        }
        if self.key_performance_indicator.trim().is_empty() {
            missing.push("keyPerformanceIndicator");
        }
        if self.target_performance.is_none() {
            missing.push("targetPerformance");
        }
        if self.actual_performance.is_none() {
            missing.push("actualPerformance");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation_with_details(
                "Please fill in all fields and ensure performance values do not exceed its limit.",
                json!({ "missing": missing }),
            ))
        }
    }

    /// Insert payload for a validated draft.
    pub fn to_payload(&self, department_id: i64) -> AppResult<NewScorecardEntry> {
        self.validate()?;
        Ok(NewScorecardEntry {
            department: DepartmentRef { id: department_id },
            target_code: self.target_code.trim().to_string(),
            metric: self.metric.expect("validated"),
            office_target: self.office_target.clone(),
            status: self.status.expect("validated"),
            key_performance_indicator: self.key_performance_indicator.trim().to_string(),
            target_performance: self.target_performance.expect("validated").to_string(),
            actual_performance: self.actual_performance.expect("validated").to_string(),
            actions: self.actions.clone(),
            budget: self.budget.clone(),
            incharge: self.incharge.clone(),
            ofi: self.ofi.clone(),
        })
    }

    /// Full updated record for a validated draft: the form fields replace
    /// the loaded record's values, id and department stay put.
    pub fn apply_to(&self, existing: &ScorecardEntry) -> AppResult<ScorecardEntry> {
        self.validate()?;
        Ok(ScorecardEntry {
            id: existing.id,
            department: existing.department,
            target_code: self.target_code.trim().to_string(),
            metric: self.metric.expect("validated"),
            office_target: self.office_target.clone(),
            status: self.status.expect("validated"),
            key_performance_indicator: self.key_performance_indicator.trim().to_string(),
            target_performance: Some(self.target_performance.expect("validated").to_string()),
            actual_performance: Some(self.actual_performance.expect("validated").to_string()),
            actions: self.actions.clone(),
            budget: self.budget.clone(),
            incharge: self.incharge.clone(),
            ofi: self.ofi.clone(),
        })
    }
}

/// In-memory collection of one perspective's entries for one department,
/// kept in sync with the persistence API. Saves validate first, hit the
/// network second, and only mutate the collection after a confirmed 2xx.
#[derive(Debug, Clone)]
pub struct PerspectiveStore {
    api: ScorecardApi,
    perspective: Perspective,
    department_id: i64,
    entries: Vec<ScorecardEntry>,
}

impl PerspectiveStore {
    pub fn new(api: ScorecardApi, perspective: Perspective, department_id: i64) -> Self {
        Self {
            api,
            perspective,
            department_id,
            entries: Vec::new(),
        }
    }

    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    pub fn department_id(&self) -> i64 {
        self.department_id
    }

    pub fn entries(&self) -> &[ScorecardEntry] {
        &self.entries
    }

    /// Replaces the collection with the server's current view.
    pub async fn load(&mut self) -> AppResult<&[ScorecardEntry]> {
        self.entries = self.api.fetch(self.perspective, self.department_id).await?;
        debug!(
            target: "app::store",
            perspective = self.perspective.as_str(),
            department_id = self.department_id,
            count = self.entries.len(),
            "scorecard loaded"
        );
        Ok(&self.entries)
    }

    /// Validates the draft, dispatches create or update, and syncs the
    /// collection with the saved record. A validation failure returns
    /// before any request; a transport failure leaves the collection
    /// unchanged.
    pub async fn save(&mut self, draft: &EntryDraft, mode: SaveMode) -> AppResult<ScorecardEntry> {
        draft.validate()?;

        match mode {
            SaveMode::Create => {
                let payload = draft.to_payload(self.department_id)?;
                let saved = self.api.insert(self.perspective, &payload).await?;
                self.entries.push(saved.clone());
                debug!(
                    target: "app::store",
                    perspective = self.perspective.as_str(),
                    id = saved.id,
                    "scorecard entry created"
                );
                Ok(saved)
            }
            SaveMode::Edit(id) => {
                let existing = self
                    .entries
                    .iter()
                    .find(|entry| entry.id == id)
                    .cloned()
                    .ok_or_else(AppError::not_found)?;
                let updated = draft.apply_to(&existing)?;
                let saved = self.api.update(self.perspective, &updated).await?;
                for entry in &mut self.entries {
                    if entry.id == id {
                        *entry = saved.clone();
                    }
                }
                debug!(
                    target: "app::store",
                    perspective = self.perspective.as_str(),
                    id,
                    "scorecard entry updated"
                );
                Ok(saved)
            }
        }
    }
}
