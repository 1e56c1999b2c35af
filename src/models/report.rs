use serde::{Deserialize, Serialize};

use crate::models::scorecard::{Perspective, ScorecardEntry};

/// Column headers of the exported tables, in their fixed order.
pub const REPORT_HEADERS: [&str; 9] = [
    "Target Code",
    "Office Target",
    "KPI",
    "Actions",
    "Budget",
    "In-charge",
    "Actual Performance",
    "Target Performance",
    "OFI",
];

/// One exported table row: the fixed nine-column projection of an entry.
/// Fields outside the projection are dropped for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub target_code: String,
    pub office_target: String,
    pub kpi: String,
    pub actions: String,
    pub budget: String,
    pub incharge: String,
    pub actual_performance: String,
    pub target_performance: String,
    pub ofi: String,
}

impl ReportRow {
    pub fn from_entry(entry: &ScorecardEntry) -> Self {
        Self {
            target_code: entry.target_code.clone(),
            office_target: entry.office_target.clone(),
            kpi: entry.key_performance_indicator.clone(),
            actions: entry.actions.clone().unwrap_or_default(),
            budget: entry.budget.clone().unwrap_or_default(),
            incharge: entry.incharge.clone().unwrap_or_default(),
            actual_performance: entry.actual_performance.clone().unwrap_or_default(),
            target_performance: entry.target_performance.clone().unwrap_or_default(),
            ofi: entry.ofi.clone().unwrap_or_default(),
        }
    }

    /// Cell values in header order.
    pub fn cells(&self) -> [&str; 9] {
        [
            &self.target_code,
            &self.office_target,
            &self.kpi,
            &self.actions,
            &self.budget,
            &self.incharge,
            &self.actual_performance,
            &self.target_performance,
            &self.ofi,
        ]
    }
}

/// A titled table in the exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSection {
    pub title: String,
    pub rows: Vec<ReportRow>,
}

/// A perspective whose fetch failed during aggregation. The failure is
/// reported alongside the data instead of aborting the whole report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerspectiveFailure {
    pub perspective: Perspective,
    pub message: String,
}

/// Report-ready entries for one department, one list per perspective,
/// plus whatever fetches failed along the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentReport {
    pub financial: Vec<ScorecardEntry>,
    pub stakeholder: Vec<ScorecardEntry>,
    pub internal: Vec<ScorecardEntry>,
    pub learning: Vec<ScorecardEntry>,
    pub failures: Vec<PerspectiveFailure>,
}

impl DepartmentReport {
    pub fn entries_for(&self, perspective: Perspective) -> &[ScorecardEntry] {
        match perspective {
            Perspective::Financial => &self.financial,
            Perspective::Stakeholder => &self.stakeholder,
            Perspective::Internal => &self.internal,
            Perspective::Learning => &self.learning,
        }
    }

    /// The four titled sections in their fixed export order.
    pub fn sections(&self) -> Vec<ReportSection> {
        Perspective::ALL
            .iter()
            .map(|perspective| ReportSection {
                title: perspective.report_title().to_string(),
                rows: self
                    .entries_for(*perspective)
                    .iter()
                    .map(ReportRow::from_entry)
                    .collect(),
            })
            .collect()
    }

    pub fn total_rows(&self) -> usize {
        self.financial.len() + self.stakeholder.len() + self.internal.len() + self.learning.len()
    }
}
