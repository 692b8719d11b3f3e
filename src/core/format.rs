use crate::domain::model::MetricName;

/// The two presentation modes used by the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Per-domain metric card: everything in milliseconds except CLS.
    #[default]
    Card,
    /// Aggregate API summary: LCP in seconds.
    Summary,
}

pub const NOT_AVAILABLE: &str = "N/A";

pub fn format_value(name: MetricName, value: f64, mode: DisplayMode) -> String {
    match (mode, name) {
        (DisplayMode::Card, MetricName::Cls) => format!("{:.3}", value),
        (DisplayMode::Card, _) => format!("{:.0}ms", value),
        (DisplayMode::Summary, MetricName::Lcp) => format!("{:.2}s", value / 1000.0),
        (DisplayMode::Summary, MetricName::Cls) => format!("{:.2}", value),
        (DisplayMode::Summary, _) => format!("{}ms", value),
    }
}

pub fn format_optional(name: MetricName, value: Option<f64>, mode: DisplayMode) -> String {
    value
        .map(|v| format_value(name, v, mode))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
