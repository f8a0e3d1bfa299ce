use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasourceError {
    #[error("Chosen metric {0:?} has no entry in the candidate metric list")]
    MetricNotFound(String),

    #[error("Invalid time range bound: {0}")]
    InvalidTimeRange(String),
}
