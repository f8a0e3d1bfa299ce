// Backend response wire contract and normalized output
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named time series as the backend returns it: rows of
/// `[value, epochMillis]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// Tabular metadata rows (device/measurement/metric listings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// Result for one refId. Time-series queries fill `series`, metadata
/// queries fill `tables`; a failed query carries `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub ref_id: String,
    #[serde(default)]
    pub series: Option<Vec<Series>>,
    #[serde(default)]
    pub tables: Option<Vec<TableData>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The backend's response envelope, keyed by refId. A BTreeMap keeps
/// iteration deterministic (sorted by refId) rather than leaving series
/// order to map-iteration luck.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: BTreeMap<String, QueryResult>,
}

/// Normalized output unit consumed by the chart layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetDatapoints {
    pub target: String,
    pub datapoints: Vec<[f64; 2]>,
}

/// Outcome of the connectivity probe, shaped the way the host expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub status: String,
    pub message: String,
    pub title: String,
}

impl TestResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            title: "Success".to_string(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            title: "Failure".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_deserializes_optional_fields() {
        let response: QueryResponse = serde_json::from_str(
            r#"{
                "results": {
                    "A": {
                        "refId": "A",
                        "series": [{"name": "cpu", "points": [[0.5, 1500000000000]]}]
                    },
                    "B": {"refId": "B"}
                }
            }"#,
        )
        .unwrap();

        let first = &response.results["A"];
        assert_eq!(first.series.as_ref().unwrap()[0].name, "cpu");
        assert!(response.results["B"].series.is_none());
        assert!(response.results["B"].error.is_none());
    }

    #[test]
    fn test_test_result_shapes() {
        let ok = TestResult::success("connected");
        assert_eq!(ok.status, "success");
        assert_eq!(ok.title, "Success");

        let failed = TestResult::failure("connection refused");
        assert_eq!(failed.status, "error");
        assert_eq!(failed.title, "Failure");
    }
}
