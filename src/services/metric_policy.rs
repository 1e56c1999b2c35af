use crate::models::scorecard::Metric;

/// Rounding rule applied after clamping a performance value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Integer,
    Tenth,
    Free,
}

/// Numeric bounds for one metric kind. Every metric starts at zero; the
/// ceiling and rounding differ by kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricBounds {
    pub min: f64,
    pub max: f64,
    pub step: Step,
}

/// Bounds table shared by all four perspective forms. Centralized so the
/// same limits apply no matter which form the value comes from.
pub fn bounds(metric: Metric) -> MetricBounds {
    let (max, step) = match metric {
        Metric::Percentage => (100.0, Step::Free),
        Metric::Count => (1000.0, Step::Free),
        Metric::Rating => (10.0, Step::Tenth),
        Metric::Score => (20.0, Step::Tenth),
        Metric::SuccessionPlan => (1000.0, Step::Free),
    };
    MetricBounds {
        min: 0.0,
        max,
        step,
    }
}

/// Normalizes raw performance input for a metric: parse, clamp into
/// `[0, max]`, then apply the metric's rounding. Out-of-range values are
/// silently corrected rather than rejected; non-numeric input yields
/// `None` and is left for the required-field check to refuse.
pub fn normalize(metric: Metric, raw: &str) -> Option<f64> {
    let parsed = raw.trim().parse::<f64>().ok()?;
    apply(metric, parsed)
}

/// Clamp-and-round for an already-parsed value; used when a draft changes
/// metric and its performance fields must satisfy the new bounds.
pub fn apply(metric: Metric, value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    let limits = bounds(metric);
    let clamped = value.clamp(limits.min, limits.max);
    let stepped = match limits.step {
        Step::Integer => clamped.ceil(),
        Step::Tenth => ceil_to_tenth(clamped),
        Step::Free => clamped,
    };
    Some(stepped)
}

/// Rounds up to the nearest tenth. The small tolerance keeps values that
/// are already exact tenths stable under float representation noise
/// (3.6 * 10 must not ceil to 37).
fn ceil_to_tenth(value: f64) -> f64 {
    ((value * 10.0) - 1e-9).ceil() / 10.0
}
