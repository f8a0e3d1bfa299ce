// Response normalizer - Flattens the backend's keyed results into series
use crate::domain::response::{QueryResponse, TargetDatapoints};

/// Flattens the refId-keyed result map into one `TargetDatapoints` per
/// series, results in refId order, series in backend-provided order.
/// Results without a `series` field contribute nothing; datapoints are
/// passed through untouched.
pub fn normalize(response: &QueryResponse) -> Vec<TargetDatapoints> {
    let mut flattened = Vec::new();
    for result in response.results.values() {
        let Some(series_list) = &result.series else {
            continue;
        };
        for series in series_list {
            flattened.push(TargetDatapoints {
                target: series.name.clone(),
                datapoints: series.points.clone(),
            });
        }
    }
    flattened
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::response::{QueryResult, Series};

    fn result_with_series(ref_id: &str, series: Vec<Series>) -> QueryResult {
        QueryResult {
            ref_id: ref_id.to_string(),
            series: Some(series),
            ..QueryResult::default()
        }
    }

    #[test]
    fn test_single_series_passes_through() {
        let mut response = QueryResponse::default();
        response.results.insert(
            "A".to_string(),
            result_with_series(
                "A",
                vec![Series {
                    name: "A".to_string(),
                    points: vec![[1.0, 100.0], [2.0, 200.0]],
                }],
            ),
        );

        assert_eq!(
            normalize(&response),
            vec![TargetDatapoints {
                target: "A".to_string(),
                datapoints: vec![[1.0, 100.0], [2.0, 200.0]],
            }]
        );
    }

    #[test]
    fn test_empty_results_normalize_to_empty() {
        assert!(normalize(&QueryResponse::default()).is_empty());
    }

    #[test]
    fn test_result_without_series_contributes_nothing() {
        let mut response = QueryResponse::default();
        response.results.insert(
            "A".to_string(),
            QueryResult {
                ref_id: "A".to_string(),
                ..QueryResult::default()
            },
        );

        assert!(normalize(&response).is_empty());
    }

    #[test]
    fn test_results_flatten_in_ref_id_order() {
        let mut response = QueryResponse::default();
        response.results.insert(
            "B".to_string(),
            result_with_series(
                "B",
                vec![Series {
                    name: "downlink".to_string(),
                    points: vec![[4.0, 400.0]],
                }],
            ),
        );
        response.results.insert(
            "A".to_string(),
            result_with_series(
                "A",
                vec![
                    Series {
                        name: "uplink min".to_string(),
                        points: vec![[1.0, 100.0]],
                    },
                    Series {
                        name: "uplink max".to_string(),
                        points: vec![[2.0, 100.0]],
                    },
                ],
            ),
        );

        let normalized = normalize(&response);
        let names: Vec<&str> = normalized
            .iter()
            .map(|entry| entry.target.as_str())
            .collect();
        assert_eq!(names, vec!["uplink min", "uplink max", "downlink"]);
    }
}
