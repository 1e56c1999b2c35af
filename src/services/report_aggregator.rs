use tracing::{debug, warn};

use crate::error::AppResult;
use crate::models::report::{DepartmentReport, PerspectiveFailure};
use crate::models::scorecard::{Perspective, ScorecardEntry};
use crate::services::scorecard_api::ScorecardApi;

/// Fetches all four perspectives of a department and keeps only
/// report-ready entries. Fetches run concurrently and fail independently:
/// a broken perspective contributes an empty section, never a crash.
#[derive(Debug, Clone)]
pub struct ReportAggregator {
    api: ScorecardApi,
}

impl ReportAggregator {
    pub fn new(api: ScorecardApi) -> Self {
        Self { api }
    }

    pub async fn aggregate(&self, department_id: i64) -> DepartmentReport {
        let (financial, stakeholder, internal, learning) = tokio::join!(
            self.fetch_report_ready(Perspective::Financial, department_id),
            self.fetch_report_ready(Perspective::Stakeholder, department_id),
            self.fetch_report_ready(Perspective::Internal, department_id),
            self.fetch_report_ready(Perspective::Learning, department_id),
        );

        let mut failures = Vec::new();
        let financial = Self::resolve(Perspective::Financial, financial, &mut failures);
        let stakeholder = Self::resolve(Perspective::Stakeholder, stakeholder, &mut failures);
        let internal = Self::resolve(Perspective::Internal, internal, &mut failures);
        let learning = Self::resolve(Perspective::Learning, learning, &mut failures);

        DepartmentReport {
            financial,
            stakeholder,
            internal,
            learning,
            failures,
        }
    }

    async fn fetch_report_ready(
        &self,
        perspective: Perspective,
        department_id: i64,
    ) -> AppResult<Vec<ScorecardEntry>> {
        let entries = self.api.fetch(perspective, department_id).await?;
        let total = entries.len();
        let ready: Vec<ScorecardEntry> = entries.into_iter().filter(is_report_ready).collect();

        debug!(
            target: "app::report",
            perspective = perspective.as_str(),
            department_id,
            total,
            ready = ready.len(),
            "perspective aggregated"
        );

        Ok(ready)
    }

    fn resolve(
        perspective: Perspective,
        outcome: AppResult<Vec<ScorecardEntry>>,
        failures: &mut Vec<PerspectiveFailure>,
    ) -> Vec<ScorecardEntry> {
        match outcome {
            Ok(entries) => entries,
            Err(error) => {
                warn!(
                    target: "app::report",
                    perspective = perspective.as_str(),
                    error = %error,
                    "perspective fetch failed, its section will be empty"
                );
                failures.push(PerspectiveFailure {
                    perspective,
                    message: error.to_string(),
                });
                Vec::new()
            }
        }
    }
}

/// The completeness filter: an entry qualifies for the exported report
/// only when every projected column has a value. Partially specified
/// entries stay visible in the live scorecard but are not report-ready.
pub fn is_report_ready(entry: &ScorecardEntry) -> bool {
    has_text(Some(entry.target_code.as_str()))
        && has_text(Some(entry.office_target.as_str()))
        && has_text(Some(entry.key_performance_indicator.as_str()))
        && has_text(entry.actions.as_deref())
        && has_text(entry.budget.as_deref())
        && has_text(entry.incharge.as_deref())
        && entry.actual_performance.is_some()
        && entry.target_performance.is_some()
        && has_text(entry.ofi.as_deref())
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scorecard::{DepartmentRef, EntryStatus, Metric};

    fn complete_entry() -> ScorecardEntry {
        ScorecardEntry {
            id: 5,
            department: Some(DepartmentRef { id: 3 }),
            target_code: "ST-2".to_string(),
            metric: Metric::Percentage,
            office_target: "Improve response time".to_string(),
            status: EntryStatus::Achieved,
            key_performance_indicator: "median response".to_string(),
            target_performance: Some("90".to_string()),
            actual_performance: Some("95".to_string()),
            actions: Some("triage rota".to_string()),
            budget: Some("12000".to_string()),
            incharge: Some("service desk".to_string()),
            ofi: Some("expand rota to weekends".to_string()),
        }
    }

    #[test]
    fn complete_entries_are_report_ready() {
        assert!(is_report_ready(&complete_entry()));
    }

    #[test]
    fn missing_ofi_disqualifies_an_entry() {
        let mut entry = complete_entry();
        entry.ofi = None;
        assert!(!is_report_ready(&entry));

        entry.ofi = Some("  ".to_string());
        assert!(!is_report_ready(&entry));
    }

    #[test]
    fn null_performance_disqualifies_an_entry() {
        let mut entry = complete_entry();
        entry.actual_performance = None;
        assert!(!is_report_ready(&entry));

        let mut entry = complete_entry();
        entry.target_performance = None;
        assert!(!is_report_ready(&entry));
    }

    #[test]
    fn blank_extras_disqualify_an_entry() {
        for field in ["actions", "budget", "incharge"] {
            let mut entry = complete_entry();
            match field {
                "actions" => entry.actions = Some(String::new()),
                "budget" => entry.budget = None,
                _ => entry.incharge = Some("".to_string()),
            }
            assert!(!is_report_ready(&entry), "{field} should disqualify");
        }
    }
}
