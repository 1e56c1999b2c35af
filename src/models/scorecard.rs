use serde::{Deserialize, Serialize};

/// The four balanced-scorecard perspectives, tracked independently but
/// reported together in this fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Perspective {
    Financial,
    Stakeholder,
    Internal,
    Learning,
}

impl Perspective {
    pub const ALL: [Perspective; 4] = [
        Perspective::Financial,
        Perspective::Stakeholder,
        Perspective::Internal,
        Perspective::Learning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Perspective::Financial => "financial",
            Perspective::Stakeholder => "stakeholder",
            Perspective::Internal => "internal",
            Perspective::Learning => "learning",
        }
    }

    /// Resource segment in the persistence API path.
    pub fn path_segment(&self) -> &'static str {
        self.as_str()
    }

    /// Section title used in the exported report.
    pub fn report_title(&self) -> &'static str {
        match self {
            Perspective::Financial => "FINANCIAL PERSPECTIVE",
            Perspective::Stakeholder => "STAKEHOLDER PERSPECTIVE",
            Perspective::Internal => "INTERNAL PERSPECTIVE",
            Perspective::Learning => "LEARNING AND GROWTH PERSPECTIVE",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "financial" => Ok(Perspective::Financial),
            "stakeholder" => Ok(Perspective::Stakeholder),
            "internal" => Ok(Perspective::Internal),
            "learning" => Ok(Perspective::Learning),
            _ => Err(format!("Invalid perspective: {}", s)),
        }
    }
}

/// Unit of measure for a target. Fixed once set on create; bounds for the
/// performance fields depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    Percentage,
    Count,
    Rating,
    Score,
    #[serde(alias = "Succession Plan")]
    SuccessionPlan,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Percentage => "Percentage",
            Metric::Count => "Count",
            Metric::Rating => "Rating",
            Metric::Score => "Score",
            Metric::SuccessionPlan => "SuccessionPlan",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "Percentage" => Ok(Metric::Percentage),
            "Count" => Ok(Metric::Count),
            "Rating" => Ok(Metric::Rating),
            "Score" => Ok(Metric::Score),
            "SuccessionPlan" | "Succession Plan" => Ok(Metric::SuccessionPlan),
            _ => Err(format!("Invalid metric: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    Achieved,
    #[serde(alias = "Not Achieved")]
    NotAchieved,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Achieved => "Achieved",
            EntryStatus::NotAchieved => "Not Achieved",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "Achieved" => Ok(EntryStatus::Achieved),
            "NotAchieved" | "Not Achieved" => Ok(EntryStatus::NotAchieved),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

/// Owner scope, nested exactly as the persistence API nests it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRef {
    pub id: i64,
}

/// One scorecard record. All four perspectives share this shape; the
/// `actions`/`budget`/`incharge`/`ofi` extras are free text and only
/// matter for report inclusion.
///
/// Performance values travel as decimal strings. Records saved through
/// this crate always carry both; fetched records may hold nulls for
/// entries that were never fully specified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardEntry {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentRef>,
    pub target_code: String,
    pub metric: Metric,
    pub office_target: String,
    pub status: EntryStatus,
    pub key_performance_indicator: String,
    #[serde(default)]
    pub target_performance: Option<String>,
    #[serde(default)]
    pub actual_performance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incharge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ofi: Option<String>,
}

/// Insert payload; the server assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewScorecardEntry {
    pub department: DepartmentRef,
    pub target_code: String,
    pub metric: Metric,
    pub office_target: String,
    pub status: EntryStatus,
    pub key_performance_indicator: String,
    pub target_performance: String,
    pub actual_performance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incharge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ofi: Option<String>,
}

const OFFICE_TARGET_DISPLAY_LIMIT: usize = 60;

impl ScorecardEntry {
    /// Both performance values parsed, when present and numeric.
    pub fn performance_pair(&self) -> Option<(f64, f64)> {
        let actual = self.actual_performance.as_deref()?.parse::<f64>().ok()?;
        let target = self.target_performance.as_deref()?.parse::<f64>().ok()?;
        Some((actual, target))
    }

    /// Raw attainment percentage for this entry, two-decimal rounded.
    /// `None` when either value is missing/unparseable or the target does
    /// not support a meaningful division.
    pub fn attainment(&self) -> Option<f64> {
        let (actual, target) = self.performance_pair()?;
        level_of_attainment(actual, target)
    }

    /// Office target as shown in list rows: capped at 60 characters with a
    /// trailing ellipsis, full text untouched in storage.
    pub fn display_office_target(&self) -> String {
        let total = self.office_target.chars().count();
        if total > OFFICE_TARGET_DISPLAY_LIMIT {
            let truncated: String = self
                .office_target
                .chars()
                .take(OFFICE_TARGET_DISPLAY_LIMIT)
                .collect();
            format!("{}...", truncated)
        } else {
            self.office_target.clone()
        }
    }
}

/// Actual performance expressed as a percentage of target, rounded to two
/// decimals. Guards the division: a zero, negative, or non-finite target
/// yields `None` ("N/A" to the caller) rather than an Infinity/NaN.
pub fn level_of_attainment(actual: f64, target: f64) -> Option<f64> {
    if !actual.is_finite() || !target.is_finite() || target <= 0.0 {
        return None;
    }
    let ratio = (actual / target) * 100.0;
    if !ratio.is_finite() {
        return None;
    }
    Some((ratio * 100.0).round() / 100.0)
}

/// Display-only clamp of a raw attainment value into `[1, 100]`. Stored
/// values are unaffected.
pub fn display_attainment(value: f64) -> f64 {
    value.clamp(1.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with_office_target(text: &str) -> ScorecardEntry {
        ScorecardEntry {
            id: 1,
            department: Some(DepartmentRef { id: 7 }),
            target_code: "FT-1".to_string(),
            metric: Metric::Percentage,
            office_target: text.to_string(),
            status: EntryStatus::Achieved,
            key_performance_indicator: "KPI".to_string(),
            target_performance: Some("100".to_string()),
            actual_performance: Some("50".to_string()),
            actions: None,
            budget: None,
            incharge: None,
            ofi: None,
        }
    }

    #[test]
    fn attainment_is_two_decimal_percentage() {
        assert_eq!(level_of_attainment(50.0, 200.0), Some(25.0));
        assert_eq!(level_of_attainment(1.0, 3.0), Some(33.33));
        assert_eq!(level_of_attainment(500.0, 100.0), Some(500.0));
        assert_eq!(level_of_attainment(0.0, 100.0), Some(0.0));
    }

    #[test]
    fn attainment_guards_the_division() {
        assert_eq!(level_of_attainment(50.0, 0.0), None);
        assert_eq!(level_of_attainment(50.0, -1.0), None);
        assert_eq!(level_of_attainment(f64::NAN, 100.0), None);
        assert_eq!(level_of_attainment(50.0, f64::INFINITY), None);
    }

    #[test]
    fn display_attainment_clamps_into_unit_range() {
        assert_eq!(display_attainment(25.0), 25.0);
        assert_eq!(display_attainment(500.0), 100.0);
        assert_eq!(display_attainment(0.0), 1.0);
        assert_eq!(display_attainment(-3.0), 1.0);
    }

    #[test]
    fn office_target_truncates_for_display_only() {
        let long = "x".repeat(80);
        let entry = entry_with_office_target(&long);
        let display = entry.display_office_target();
        assert_eq!(display.chars().count(), 63);
        assert!(display.ends_with("..."));
        assert_eq!(entry.office_target.len(), 80);

        let short = entry_with_office_target("improve onboarding");
        assert_eq!(short.display_office_target(), "improve onboarding");
    }

    #[test]
    fn entry_attainment_parses_stored_strings() {
        let mut entry = entry_with_office_target("t");
        assert_eq!(entry.attainment(), Some(50.0));

        entry.target_performance = Some("0".to_string());
        assert_eq!(entry.attainment(), None);

        entry.target_performance = None;
        assert_eq!(entry.attainment(), None);
    }

    #[test]
    fn wire_format_uses_camel_case_keys() {
        let entry = entry_with_office_target("t");
        let json = serde_json::to_value(&entry).expect("serializable");
        assert!(json.get("targetCode").is_some());
        assert!(json.get("keyPerformanceIndicator").is_some());
        assert!(json.get("targetPerformance").is_some());
        assert_eq!(
            json.get("metric").and_then(|v| v.as_str()),
            Some("Percentage")
        );
    }
}
