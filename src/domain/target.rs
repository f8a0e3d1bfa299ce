// Query target domain model
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a target queries the backend: by picked device/measurement/metric,
/// or through an opaque statistic link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum QueryMode {
    #[default]
    Measurement,
    StatisticLink,
}

impl From<QueryMode> for i64 {
    fn from(mode: QueryMode) -> Self {
        match mode {
            QueryMode::Measurement => 0,
            QueryMode::StatisticLink => 10,
        }
    }
}

impl TryFrom<i64> for QueryMode {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(QueryMode::Measurement),
            10 => Ok(QueryMode::StatisticLink),
            other => Err(format!("unknown query mode: {}", other)),
        }
    }
}

/// Unit of the custom average period. The wire value is the number of
/// milliseconds per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum AverageUnit {
    Seconds,
    #[default]
    Minutes,
    Hours,
    Days,
}

impl AverageUnit {
    pub fn millis(self) -> i64 {
        match self {
            AverageUnit::Seconds => 1_000,
            AverageUnit::Minutes => 60_000,
            AverageUnit::Hours => 3_600_000,
            AverageUnit::Days => 86_400_000,
        }
    }
}

impl From<AverageUnit> for i64 {
    fn from(unit: AverageUnit) -> Self {
        unit.millis()
    }
}

impl TryFrom<i64> for AverageUnit {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1_000 => Ok(AverageUnit::Seconds),
            60_000 => Ok(AverageUnit::Minutes),
            3_600_000 => Ok(AverageUnit::Hours),
            86_400_000 => Ok(AverageUnit::Days),
            other => Err(format!("unknown average unit: {}", other)),
        }
    }
}

/// A dropdown option: display label plus backend object id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelValue {
    pub label: String,
    pub value: i64,
}

impl LabelValue {
    pub fn new(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A candidate metric offered for selection under a measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub key: String,
    pub text: String,
    pub measurement_obid: i64,
}

/// Persisted query state for one panel query row. Owned by the host
/// framework; the core only ever reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[serde(default)]
    pub mode: QueryMode,
    #[serde(default)]
    pub selected_device: Option<LabelValue>,
    #[serde(default)]
    pub selected_measurement: Option<LabelValue>,
    /// Metric key -> selected flag. Keys are a subset of `metrics` keys;
    /// a stale key is skipped at assembly time.
    #[serde(default)]
    pub chosen_metrics: BTreeMap<String, bool>,
    #[serde(default)]
    pub metric_prefix: String,
    #[serde(default)]
    pub include_min_stats: bool,
    #[serde(default)]
    pub include_avg_stats: bool,
    #[serde(default)]
    pub include_max_stats: bool,
    #[serde(default)]
    pub statistic_link: String,
    #[serde(default)]
    pub use_custom_average: bool,
    #[serde(default)]
    pub average_period: String,
    #[serde(default)]
    pub average_unit: AverageUnit,
    /// Candidate metrics for the selected measurement.
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

impl Target {
    /// Returns a copy of this target with one metric selection flipped.
    /// Targets are treated as immutable values; toggling never mutates
    /// the original map.
    pub fn with_metric_chosen(&self, key: impl Into<String>, chosen: bool) -> Self {
        let mut updated = self.clone();
        updated.chosen_metrics.insert(key.into(), chosen);
        updated
    }
}
