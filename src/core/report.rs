use crate::core::format::{format_optional, format_value, DisplayMode, NOT_AVAILABLE};
use crate::core::scoring::{coerce_value, NEEDS_IMPROVEMENT_START, POOR_START};
use crate::domain::model::{DomainResult, MetricName, ResultSet, ScoredMetric};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

const BAR_WIDTH: usize = 30;
const CHART_WIDTH: usize = 40;
const CHART_METRICS: [MetricName; 4] = [
    MetricName::Lcp,
    MetricName::Cls,
    MetricName::Inp,
    MetricName::Ttfb,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub metric: MetricName,
    pub value: f64,
    pub label: String,
    pub width_percentage: f64,
}

/// Comparative chart for one domain. Missing metrics count as zero and every
/// row is scaled against the largest value.
pub fn chart_rows(result: &DomainResult) -> Vec<ChartRow> {
    let values: Vec<(MetricName, f64)> = CHART_METRICS
        .iter()
        .map(|&name| (name, result.get(name).map(|m| m.value).unwrap_or(0.0)))
        .collect();
    let max = values.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    values
        .into_iter()
        .map(|(metric, value)| ChartRow {
            metric,
            value,
            label: format_optional(metric, result.get(metric).map(|m| m.value), DisplayMode::Card),
            width_percentage: if max > 0.0 { (value / max) * 100.0 } else { 0.0 },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub key: String,
    pub title: String,
    pub category: String,
    pub formatted: String,
}

/// API metrics summary over every key the response reports, not only the
/// scored ones.
pub fn summarize_raw(raw: &Value) -> Vec<SummaryEntry> {
    let Some(metrics) = raw.pointer("/record/metrics").and_then(Value::as_object) else {
        return Vec::new();
    };

    metrics
        .iter()
        .map(|(key, node)| {
            let p75 = node.pointer("/percentiles/p75").and_then(coerce_value);
            let formatted = match (MetricName::from_source_key(key), p75) {
                (Some(name), value) => format_optional(name, value, DisplayMode::Summary),
                (None, Some(value)) => format!("{}ms", value),
                (None, None) => NOT_AVAILABLE.to_string(),
            };

            SummaryEntry {
                key: key.clone(),
                title: key.replace('_', " ").to_uppercase(),
                category: key.to_uppercase(),
                formatted,
            }
        })
        .collect()
}

fn render_bar(percentage: f64) -> String {
    let fill = ((percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
    let ni_marker = ((NEEDS_IMPROVEMENT_START / 100.0) * BAR_WIDTH as f64).round() as usize;
    let poor_marker = ((POOR_START / 100.0) * BAR_WIDTH as f64).round() as usize;

    (0..BAR_WIDTH)
        .map(|i| {
            if i < fill {
                '█'
            } else if i == ni_marker || i == poor_marker {
                '|'
            } else {
                '·'
            }
        })
        .collect()
}

fn render_metric_line(out: &mut String, metric: &ScoredMetric) {
    let _ = writeln!(
        out,
        "  {:<11} {:>8}  {:<17} [{}] {:>6.2}%",
        metric.name.label(),
        format_value(metric.name, metric.value, DisplayMode::Card),
        metric.band.as_str(),
        render_bar(metric.bar_percentage),
        metric.bar_percentage
    );
}

pub fn render_cards(results: &ResultSet, show_raw: bool) -> Result<String> {
    let mut out = String::new();

    for (domain, result) in results.iter() {
        let _ = writeln!(out, "🌐 {}", domain);
        if result.metrics.is_empty() {
            let _ = writeln!(out, "  (no Core Web Vitals data)");
        }
        for metric in result.metrics.values() {
            render_metric_line(&mut out, metric);
        }

        if show_raw {
            let _ = writeln!(out, "  Raw API response:");
            for line in serde_json::to_string_pretty(&result.raw_response)?.lines() {
                let _ = writeln!(out, "    {}", line);
            }
        }
        out.push('\n');
    }

    Ok(out)
}

pub fn render_chart(results: &ResultSet) -> String {
    let mut out = String::new();

    for (domain, result) in results.iter() {
        let _ = writeln!(out, "📊 {}", domain);
        for row in chart_rows(result) {
            let fill = ((row.width_percentage / 100.0) * CHART_WIDTH as f64).round() as usize;
            let _ = writeln!(
                out,
                "  {:<5} {:<width$} {}",
                row.metric.label(),
                "█".repeat(fill),
                row.label,
                width = CHART_WIDTH
            );
        }
        out.push('\n');
    }

    out
}

pub fn render_summary(results: &ResultSet) -> String {
    let mut out = String::new();

    for (domain, result) in results.iter() {
        let entries = summarize_raw(&result.raw_response);
        if entries.is_empty() {
            continue;
        }
        let _ = writeln!(out, "📋 API Metrics Summary: {}", domain);
        for entry in entries {
            let _ = writeln!(out, "  {:<45} {:>10}  ({})", entry.title, entry.formatted, entry.category);
        }
        out.push('\n');
    }

    out
}

#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub generated_at: DateTime<Utc>,
    pub query_type: &'a str,
    pub form_factor: &'a str,
    pub results: &'a ResultSet,
}

pub fn to_json(document: &ReportDocument<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

pub fn to_csv(results: &ResultSet) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["domain", "metric", "value", "formatted", "band", "bar_percentage"])?;

    for (domain, result) in results.iter() {
        for metric in result.metrics.values() {
            writer.write_record([
                domain.to_string(),
                metric.name.label().to_string(),
                metric.value.to_string(),
                format_value(metric.name, metric.value, DisplayMode::Card),
                metric.band.as_str().to_string(),
                format!("{:.2}", metric.bar_percentage),
            ])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| crate::utils::error::VitalsError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
