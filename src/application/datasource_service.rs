// Datasource service - Use cases for querying and metadata lookup
use crate::application::query_assembler::{assemble, QueryContext};
use crate::application::query_backend::QueryBackend;
use crate::application::response_normalizer::normalize;
use crate::domain::query::{QueryRequest, SingleQuery, TimeRange};
use crate::domain::response::{QueryResponse, TargetDatapoints, TestResult};
use crate::domain::target::{LabelValue, Metric, Target};
use std::sync::Arc;

#[derive(Clone)]
pub struct DatasourceService {
    backend: Arc<dyn QueryBackend>,
    datasource_id: i64,
}

/// refIds correlate request queries with response entries by batch
/// position: "A", "B", ... "Z", then "Q26", "Q27", ...
fn ref_id_for(index: usize) -> String {
    if index < 26 {
        ((b'A' + index as u8) as char).to_string()
    } else {
        format!("Q{}", index)
    }
}

impl DatasourceService {
    pub fn new(backend: Arc<dyn QueryBackend>, datasource_id: i64) -> Self {
        Self {
            backend,
            datasource_id,
        }
    }

    /// Assembles one batch from the given targets (left-to-right, order
    /// preserved) and returns the normalized series. A batch that
    /// assembles to zero queries returns empty without touching the
    /// backend.
    pub async fn query(
        &self,
        targets: &[Target],
        range: TimeRange,
        fallback_interval_ms: f64,
    ) -> anyhow::Result<Vec<TargetDatapoints>> {
        let mut queries = Vec::new();
        for (index, target) in targets.iter().enumerate() {
            let ctx = QueryContext {
                ref_id: ref_id_for(index),
                datasource_id: self.datasource_id,
                fallback_interval_ms,
            };
            if let Some(query) = assemble(target, &ctx) {
                queries.push(query);
            }
        }

        if queries.is_empty() {
            tracing::debug!("No assemblable targets in batch, skipping backend request");
            return Ok(Vec::new());
        }

        let request = QueryRequest::time_series(range, queries);
        let response = self.backend.execute(&request).await?;
        Ok(normalize(&response))
    }

    /// Connectivity probe. Failure is data, not an Err: transport and
    /// backend errors map to the uniform error-result shape.
    pub async fn test_datasource(&self) -> TestResult {
        let request = QueryRequest::metadata(SingleQuery::TestDatasource {
            ref_id: "A".to_string(),
            datasource_id: self.datasource_id,
        });
        match self.backend.execute(&request).await {
            Ok(_) => TestResult::success("Data source is working and can connect to StableNet®."),
            Err(error) => TestResult::failure(error.to_string()),
        }
    }

    /// Device dropdown options. The backend list always gets the
    /// `{label: "none", value: -1}` sentinel appended.
    pub async fn query_devices(&self, filter: &str) -> anyhow::Result<Vec<LabelValue>> {
        let request = QueryRequest::metadata(SingleQuery::Devices {
            ref_id: "A".to_string(),
            datasource_id: self.datasource_id,
            filter: filter.to_string(),
        });
        let response = self.backend.execute(&request).await?;

        let mut options = label_value_rows(&response);
        options.push(LabelValue::new("none", -1));
        Ok(options)
    }

    pub async fn find_measurements_for_device(
        &self,
        device_obid: i64,
        filter: &str,
    ) -> anyhow::Result<Vec<LabelValue>> {
        let request = QueryRequest::metadata(SingleQuery::Measurements {
            ref_id: "A".to_string(),
            datasource_id: self.datasource_id,
            device_obid,
            filter: filter.to_string(),
        });
        let response = self.backend.execute(&request).await?;
        Ok(label_value_rows(&response))
    }

    /// Candidate metrics for a measurement, ready to merge into a target.
    pub async fn find_metrics_for_measurement(
        &self,
        measurement_obid: i64,
    ) -> anyhow::Result<Vec<Metric>> {
        let request = QueryRequest::metadata(SingleQuery::MetricNames {
            ref_id: "A".to_string(),
            datasource_id: self.datasource_id,
            measurement_obid,
        });
        let response = self.backend.execute(&request).await?;

        let mut metrics = Vec::new();
        for row in table_rows(&response) {
            if row.len() < 2 {
                continue;
            }
            if let (Some(key), Some(text)) = (row[0].as_str(), row[1].as_str()) {
                metrics.push(Metric {
                    key: key.to_string(),
                    text: text.to_string(),
                    measurement_obid,
                });
            }
        }
        Ok(metrics)
    }
}

/// Metadata results arrive as table rows of `[obid, name]`. Rows that do
/// not fit that shape are skipped.
fn label_value_rows(response: &QueryResponse) -> Vec<LabelValue> {
    let mut options = Vec::new();
    for row in table_rows(response) {
        if row.len() < 2 {
            continue;
        }
        if let (Some(obid), Some(name)) = (row[0].as_i64(), row[1].as_str()) {
            options.push(LabelValue::new(name, obid));
        }
    }
    options
}

fn table_rows(response: &QueryResponse) -> impl Iterator<Item = &Vec<serde_json::Value>> {
    response
        .results
        .values()
        .filter_map(|result| result.tables.as_ref())
        .flatten()
        .flat_map(|table| table.rows.iter())
}
