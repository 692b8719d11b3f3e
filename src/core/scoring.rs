//! Metric extraction, banding and bar positioning for a single CrUX record.
//!
//! Everything here is pure: missing or malformed metric data is never an
//! error, the metric is simply left out of the result.

use crate::domain::model::{Band, DomainResult, MetricName, MetricSample, ScoredMetric, Threshold};
use serde_json::Value;
use std::collections::BTreeMap;

/// Width of each of the three bands on the bar.
pub const BAND_WIDTH: f64 = 33.33;
pub const NEEDS_IMPROVEMENT_START: f64 = 33.33;
pub const POOR_START: f64 = 66.66;

/// Core Web Vitals thresholds. LCP is expressed in seconds, CLS is unitless,
/// the rest are milliseconds.
pub const fn threshold(name: MetricName) -> Threshold {
    match name {
        MetricName::Lcp => Threshold { good: 2.5, poor: 4.0 },
        MetricName::Cls => Threshold { good: 0.1, poor: 0.25 },
        MetricName::Inp => Threshold { good: 200.0, poor: 500.0 },
        MetricName::Ttfb | MetricName::ImageTtfb => Threshold {
            good: 800.0,
            poor: 1800.0,
        },
    }
}

/// Converts a stored value into the unit its threshold is expressed in.
pub fn comparison_value(name: MetricName, value: f64) -> f64 {
    match name {
        MetricName::Lcp => value / 1000.0,
        _ => value,
    }
}

pub fn classify(name: MetricName, value: Option<f64>) -> Band {
    let Some(value) = value else {
        return Band::Unknown;
    };

    let normalized = comparison_value(name, value);
    let threshold = threshold(name);

    if normalized <= threshold.good {
        Band::Good
    } else if normalized <= threshold.poor {
        Band::NeedsImprovement
    } else {
        Band::Poor
    }
}

/// Position of the value on a 0-100 bar split into three equal bands.
///
/// The poor branch divides by `poor` rather than by a range above it, so the
/// bar saturates at twice the poor threshold.
pub fn bar_percentage(name: MetricName, value: f64) -> f64 {
    let normalized = comparison_value(name, value);
    let Threshold { good, poor } = threshold(name);

    let percentage = if normalized <= good {
        (normalized / good) * BAND_WIDTH
    } else if normalized <= poor {
        NEEDS_IMPROVEMENT_START + ((normalized - good) / (poor - good)) * BAND_WIDTH
    } else {
        (POOR_START + ((normalized - poor) / poor) * BAND_WIDTH).min(100.0)
    };

    percentage.max(0.0)
}

/// Coerces a p75 value to a finite float. Numbers and numeric strings are
/// accepted; CrUX reports CLS as a string.
pub fn coerce_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };

    number.filter(|n| n.is_finite())
}

fn metric_node<'a>(raw: &'a Value, name: MetricName) -> Option<&'a Value> {
    let mut node = raw.get("record")?.get("metrics")?;
    for segment in name.source_path() {
        node = node.get(segment)?;
    }
    Some(node)
}

/// Reads the p75 of one metric from a raw `queryRecord` response.
pub fn extract_sample(raw: &Value, name: MetricName) -> MetricSample {
    let raw_value = metric_node(raw, name)
        .and_then(|node| node.get("percentiles"))
        .and_then(|percentiles| percentiles.get("p75"))
        .and_then(coerce_value);

    MetricSample {
        name,
        raw_value,
        unit: name.unit(),
    }
}

pub fn extract_samples(raw: &Value) -> Vec<MetricSample> {
    MetricName::ALL
        .into_iter()
        .map(|name| extract_sample(raw, name))
        .collect()
}

pub fn score_sample(sample: &MetricSample) -> Option<ScoredMetric> {
    let value = sample.raw_value?;

    Some(ScoredMetric {
        name: sample.name,
        value,
        band: classify(sample.name, Some(value)),
        bar_percentage: bar_percentage(sample.name, value),
    })
}

/// Scores every known metric in the response. Metrics without a usable
/// sample are absent from the mapping; the raw response is kept as-is.
pub fn score_response(raw: Value) -> DomainResult {
    let metrics: BTreeMap<MetricName, ScoredMetric> = extract_samples(&raw)
        .iter()
        .filter_map(score_sample)
        .map(|scored| (scored.name, scored))
        .collect();

    tracing::debug!("Scored {} of {} metrics", metrics.len(), MetricName::ALL.len());

    DomainResult {
        metrics,
        raw_response: raw,
    }
}
