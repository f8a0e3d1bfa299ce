// Backend query wire contract
use serde::{Deserialize, Serialize};

/// One metric requested under a measurement: backend key plus the display
/// name the chart layer will show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub key: String,
    pub name: String,
}

/// Request payload for a device/metric query: which measurement to read and
/// which of its metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementQuery {
    pub measurement_obid: i64,
    pub metrics: Vec<MetricSpec>,
}

/// A single backend query. The wire discriminator is `queryType`; each
/// variant carries only the payload that query type uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "queryType", rename_all = "camelCase")]
pub enum SingleQuery {
    #[serde(rename_all = "camelCase")]
    StatisticLink {
        ref_id: String,
        datasource_id: i64,
        statistic_link: String,
        interval_ms: f64,
        include_min_stats: bool,
        include_avg_stats: bool,
        include_max_stats: bool,
    },
    #[serde(rename_all = "camelCase")]
    MetricData {
        ref_id: String,
        datasource_id: i64,
        request_data: Vec<MeasurementQuery>,
        interval_ms: f64,
        include_min_stats: bool,
        include_avg_stats: bool,
        include_max_stats: bool,
    },
    #[serde(rename_all = "camelCase")]
    TestDatasource {
        ref_id: String,
        datasource_id: i64,
    },
    #[serde(rename_all = "camelCase")]
    Devices {
        ref_id: String,
        datasource_id: i64,
        filter: String,
    },
    #[serde(rename_all = "camelCase")]
    Measurements {
        ref_id: String,
        datasource_id: i64,
        device_obid: i64,
        filter: String,
    },
    #[serde(rename_all = "camelCase")]
    MetricNames {
        ref_id: String,
        datasource_id: i64,
        measurement_obid: i64,
    },
}

impl SingleQuery {
    pub fn ref_id(&self) -> &str {
        match self {
            SingleQuery::StatisticLink { ref_id, .. }
            | SingleQuery::MetricData { ref_id, .. }
            | SingleQuery::TestDatasource { ref_id, .. }
            | SingleQuery::Devices { ref_id, .. }
            | SingleQuery::Measurements { ref_id, .. }
            | SingleQuery::MetricNames { ref_id, .. } => ref_id,
        }
    }
}

/// Time span of a query batch, millisecond epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from_ms: i64,
    pub to_ms: i64,
}

/// The POST body sent to the backend. `from`/`to` are millisecond-epoch
/// decimal strings, present only for time-series batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub queries: Vec<SingleQuery>,
}

impl QueryRequest {
    pub fn time_series(range: TimeRange, queries: Vec<SingleQuery>) -> Self {
        Self {
            from: Some(range.from_ms.to_string()),
            to: Some(range.to_ms.to_string()),
            queries,
        }
    }

    pub fn metadata(query: SingleQuery) -> Self {
        Self {
            from: None,
            to: None,
            queries: vec![query],
        }
    }
}
