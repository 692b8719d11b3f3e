use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Core Web Vitals 指標；宣告順序即顯示順序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricName {
    #[serde(rename = "LCP")]
    Lcp,
    #[serde(rename = "CLS")]
    Cls,
    #[serde(rename = "INP")]
    Inp,
    #[serde(rename = "TTFB")]
    Ttfb,
    #[serde(rename = "Image TTFB")]
    ImageTtfb,
}

impl MetricName {
    pub const ALL: [MetricName; 5] = [
        MetricName::Lcp,
        MetricName::Cls,
        MetricName::Inp,
        MetricName::Ttfb,
        MetricName::ImageTtfb,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetricName::Lcp => "LCP",
            MetricName::Cls => "CLS",
            MetricName::Inp => "INP",
            MetricName::Ttfb => "TTFB",
            MetricName::ImageTtfb => "Image TTFB",
        }
    }

    /// Path below `record.metrics` that holds the metric's distribution.
    pub fn source_path(self) -> &'static [&'static str] {
        match self {
            MetricName::Lcp => &["largest_contentful_paint"],
            MetricName::Cls => &["cumulative_layout_shift"],
            MetricName::Inp => &["interaction_to_next_paint"],
            MetricName::Ttfb => &["experimental_time_to_first_byte"],
            MetricName::ImageTtfb => &["largest_contentful_paint_element", "ttfb"],
        }
    }

    /// Reverse lookup for top-level keys of `record.metrics`.
    pub fn from_source_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|name| name.source_path().len() == 1 && name.source_path()[0] == key)
    }

    pub fn unit(self) -> Unit {
        match self {
            MetricName::Cls => Unit::Unitless,
            _ => Unit::Millisecond,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MetricName::Lcp => "Largest Contentful Paint measures loading performance",
            MetricName::Cls => "Cumulative Layout Shift measures visual stability",
            MetricName::Inp => "Interaction to Next Paint measures responsiveness",
            MetricName::Ttfb => "Time to First Byte measures server response time",
            MetricName::ImageTtfb => "Time to First Byte for the LCP image",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Millisecond,
    Unitless,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Band {
    Good,
    NeedsImprovement,
    Poor,
    Unknown,
}

impl Band {
    pub fn as_str(self) -> &'static str {
        match self {
            Band::Good => "good",
            Band::NeedsImprovement => "needs-improvement",
            Band::Poor => "poor",
            Band::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Good/poor boundaries in the metric's comparison unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub good: f64,
    pub poor: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: MetricName,
    pub raw_value: Option<f64>,
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMetric {
    pub name: MetricName,
    pub value: f64,
    pub band: Band,
    pub bar_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainResult {
    pub metrics: BTreeMap<MetricName, ScoredMetric>,
    pub raw_response: serde_json::Value,
}

impl DomainResult {
    pub fn get(&self, name: MetricName) -> Option<&ScoredMetric> {
        self.metrics.get(&name)
    }
}

/// 依提交順序保存每個網域的結果
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    entries: Vec<(String, DomainResult)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-inserting an existing domain replaces its result but keeps its position.
    pub fn insert(&mut self, domain: String, result: DomainResult) {
        match self.entries.iter_mut().find(|(key, _)| *key == domain) {
            Some((_, existing)) => *existing = result,
            None => self.entries.push((domain, result)),
        }
    }

    pub fn get(&self, domain: &str) -> Option<&DomainResult> {
        self.entries
            .iter()
            .find(|(key, _)| key == domain)
            .map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DomainResult)> {
        self.entries
            .iter()
            .map(|(domain, result)| (domain.as_str(), result))
    }

    pub fn domains(&self) -> Vec<&str> {
        self.entries.iter().map(|(domain, _)| domain.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (domain, result) in &self.entries {
            map.serialize_entry(domain, result)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    #[default]
    Origin,
    Url,
}

impl QueryType {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryType::Origin => "origin",
            QueryType::Url => "url",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "origin" => Ok(QueryType::Origin),
            "url" => Ok(QueryType::Url),
            other => Err(format!("unknown query type '{}', expected origin or url", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormFactor {
    Desktop,
    #[default]
    Phone,
}

impl FormFactor {
    pub fn as_str(self) -> &'static str {
        match self {
            FormFactor::Desktop => "DESKTOP",
            FormFactor::Phone => "PHONE",
        }
    }
}

impl fmt::Display for FormFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormFactor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DESKTOP" => Ok(FormFactor::Desktop),
            "PHONE" | "MOBILE" => Ok(FormFactor::Phone),
            other => Err(format!(
                "unknown form factor '{}', expected desktop or phone",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    pub query_type: QueryType,
    pub form_factor: FormFactor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTarget {
    Origin(String),
    Url(String),
}

impl QueryTarget {
    /// Wire field name carrying the target in the request body.
    pub fn field_name(&self) -> &'static str {
        match self {
            QueryTarget::Origin(_) => "origin",
            QueryTarget::Url(_) => "url",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            QueryTarget::Origin(value) | QueryTarget::Url(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPayload {
    pub form_factor: FormFactor,
    pub target: QueryTarget,
}

impl Serialize for RequestPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("formFactor", &self.form_factor)?;
        map.serialize_entry(self.target.field_name(), self.target.value())?;
        map.end()
    }
}

/// 單一網域的原始 API 回應
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub domain: String,
    pub response: serde_json::Value,
}
