// Query assembler - Turns one target into zero or one backend query
use crate::domain::query::{MeasurementQuery, MetricSpec, SingleQuery};
use crate::domain::target::{QueryMode, Target};
use crate::error::DatasourceError;

/// Shared per-batch context for one target: its refId, the datasource id,
/// and the interval to fall back on when no custom average is set.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub ref_id: String,
    pub datasource_id: i64,
    pub fallback_interval_ms: f64,
}

/// A target queries through a statistic link iff it is in statistic-link
/// mode and the link is non-empty. The link is otherwise opaque; no URL
/// syntax check is made.
pub fn is_valid_statistic_link_mode(target: &Target) -> bool {
    target.mode == QueryMode::StatisticLink && !target.statistic_link.is_empty()
}

/// True when no metric key maps to `true` - such a target contributes no
/// query at all.
pub fn has_empty_metrics(target: &Target) -> bool {
    !target.chosen_metrics.values().any(|&chosen| chosen)
}

/// Resolves the sampling interval. A custom average multiplies the
/// user-typed period by the unit's millisecond factor; a period that does
/// not parse as a base-10 integer yields NaN, which is passed through to
/// the backend unguarded.
pub fn resolve_interval_ms(target: &Target, fallback_interval_ms: f64) -> f64 {
    if !target.use_custom_average {
        return fallback_interval_ms;
    }
    match target.average_period.trim().parse::<i64>() {
        Ok(period) => (period * target.average_unit.millis()) as f64,
        Err(_) => f64::NAN,
    }
}

/// Materializes a statistic-link query. Callers check
/// `is_valid_statistic_link_mode` first.
pub fn to_statistic_link_query(target: &Target, ctx: &QueryContext) -> SingleQuery {
    SingleQuery::StatisticLink {
        ref_id: ctx.ref_id.clone(),
        datasource_id: ctx.datasource_id,
        statistic_link: target.statistic_link.clone(),
        interval_ms: resolve_interval_ms(target, ctx.fallback_interval_ms),
        include_min_stats: target.include_min_stats,
        include_avg_stats: target.include_avg_stats,
        include_max_stats: target.include_max_stats,
    }
}

/// Materializes a device/metric query. Chosen keys are resolved against the
/// candidate list in stored map order; a key without a candidate is skipped
/// with a warning rather than failing the whole query.
pub fn to_device_query(target: &Target, ctx: &QueryContext) -> SingleQuery {
    let measurement_obid = target
        .selected_measurement
        .as_ref()
        .map_or(-1, |measurement| measurement.value);

    let mut metrics = Vec::new();
    for (key, &chosen) in &target.chosen_metrics {
        if !chosen {
            continue;
        }
        match resolve_metric(target, key) {
            Ok(spec) => metrics.push(spec),
            Err(error) => tracing::warn!("{}", error),
        }
    }

    SingleQuery::MetricData {
        ref_id: ctx.ref_id.clone(),
        datasource_id: ctx.datasource_id,
        request_data: vec![MeasurementQuery {
            measurement_obid,
            metrics,
        }],
        interval_ms: resolve_interval_ms(target, ctx.fallback_interval_ms),
        include_min_stats: target.include_min_stats,
        include_avg_stats: target.include_avg_stats,
        include_max_stats: target.include_max_stats,
    }
}

fn resolve_metric(target: &Target, key: &str) -> Result<MetricSpec, DatasourceError> {
    let metric = target
        .metrics
        .iter()
        .find(|candidate| candidate.key == key)
        .ok_or_else(|| DatasourceError::MetricNotFound(key.to_string()))?;

    Ok(MetricSpec {
        key: key.to_string(),
        name: format!("{} {}", target.metric_prefix, metric.text),
    })
}

/// The per-target state machine: statistic-link targets emit a link query,
/// measurement targets with no selected metric emit nothing, everything
/// else emits a device/metric query.
pub fn assemble(target: &Target, ctx: &QueryContext) -> Option<SingleQuery> {
    if is_valid_statistic_link_mode(target) {
        return Some(to_statistic_link_query(target, ctx));
    }
    if has_empty_metrics(target) {
        return None;
    }
    Some(to_device_query(target, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::target::{AverageUnit, LabelValue, Metric};

    fn ctx() -> QueryContext {
        QueryContext {
            ref_id: "A".to_string(),
            datasource_id: 7,
            fallback_interval_ms: 30_000.0,
        }
    }

    fn measurement_target() -> Target {
        Target {
            selected_measurement: Some(LabelValue::new("CPU Load", 3701)),
            metric_prefix: "XY".to_string(),
            metrics: vec![
                Metric {
                    key: "SNMP_1".to_string(),
                    text: "cpu-load 1min".to_string(),
                    measurement_obid: 3701,
                },
                Metric {
                    key: "SNMP_2".to_string(),
                    text: "cpu-load 5min".to_string(),
                    measurement_obid: 3701,
                },
            ],
            ..Target::default()
        }
    }

    #[test]
    fn test_statistic_link_mode_requires_mode_and_link() {
        let valid = Target {
            mode: QueryMode::StatisticLink,
            statistic_link: "https://stablenet.example/link/42".to_string(),
            ..Target::default()
        };
        assert!(is_valid_statistic_link_mode(&valid));

        let empty_link = Target {
            mode: QueryMode::StatisticLink,
            ..Target::default()
        };
        assert!(!is_valid_statistic_link_mode(&empty_link));

        let wrong_mode = Target {
            mode: QueryMode::Measurement,
            statistic_link: "https://stablenet.example/link/42".to_string(),
            ..Target::default()
        };
        assert!(!is_valid_statistic_link_mode(&wrong_mode));
    }

    #[test]
    fn test_empty_metrics_truth_table() {
        assert!(has_empty_metrics(&Target::default()));

        let all_false = Target::default().with_metric_chosen("SNMP_1", false);
        assert!(has_empty_metrics(&all_false));

        let one_true = all_false.with_metric_chosen("SNMP_2", true);
        assert!(!has_empty_metrics(&one_true));
    }

    #[test]
    fn test_custom_average_in_minutes() {
        let target = Target {
            use_custom_average: true,
            average_period: "10".to_string(),
            average_unit: AverageUnit::Minutes,
            ..Target::default()
        };
        assert_eq!(resolve_interval_ms(&target, 30_000.0), 600_000.0);
    }

    #[test]
    fn test_custom_average_in_seconds() {
        let target = Target {
            use_custom_average: true,
            average_period: "10".to_string(),
            average_unit: AverageUnit::Seconds,
            ..Target::default()
        };
        assert_eq!(resolve_interval_ms(&target, 30_000.0), 10_000.0);
    }

    #[test]
    fn test_malformed_average_period_yields_nan() {
        let target = Target {
            use_custom_average: true,
            average_period: "not-a-number".to_string(),
            average_unit: AverageUnit::Minutes,
            ..Target::default()
        };
        assert!(resolve_interval_ms(&target, 30_000.0).is_nan());
    }

    #[test]
    fn test_fallback_interval_passes_through_unchanged() {
        let target = Target {
            average_period: "10".to_string(),
            ..Target::default()
        };
        assert_eq!(resolve_interval_ms(&target, 0.0), 0.0);
        assert_eq!(resolve_interval_ms(&target, 30_000.0), 30_000.0);
    }

    #[test]
    fn test_device_query_resolves_chosen_metrics() {
        let target = measurement_target().with_metric_chosen("SNMP_1", true);
        let query = to_device_query(&target, &ctx());

        let SingleQuery::MetricData {
            ref_id,
            request_data,
            interval_ms,
            ..
        } = query
        else {
            panic!("expected a metricData query");
        };
        assert_eq!(ref_id, "A");
        assert_eq!(interval_ms, 30_000.0);
        assert_eq!(request_data.len(), 1);
        assert_eq!(request_data[0].measurement_obid, 3701);
        assert_eq!(
            request_data[0].metrics,
            vec![MetricSpec {
                key: "SNMP_1".to_string(),
                name: "XY cpu-load 1min".to_string(),
            }]
        );
    }

    #[test]
    fn test_device_query_with_all_false_metrics_keeps_empty_list() {
        let target = measurement_target().with_metric_chosen("SNMP_1", false);
        let query = to_device_query(&target, &ctx());

        let SingleQuery::MetricData { request_data, .. } = query else {
            panic!("expected a metricData query");
        };
        assert_eq!(request_data.len(), 1);
        assert_eq!(request_data[0].measurement_obid, 3701);
        assert!(request_data[0].metrics.is_empty());
    }

    #[test]
    fn test_stale_chosen_key_is_skipped() {
        let target = measurement_target()
            .with_metric_chosen("SNMP_1", true)
            .with_metric_chosen("GONE_AFTER_MEASUREMENT_CHANGE", true);
        let query = to_device_query(&target, &ctx());

        let SingleQuery::MetricData { request_data, .. } = query else {
            panic!("expected a metricData query");
        };
        let keys: Vec<&str> = request_data[0]
            .metrics
            .iter()
            .map(|metric| metric.key.as_str())
            .collect();
        assert_eq!(keys, vec!["SNMP_1"]);
    }

    #[test]
    fn test_statistic_link_query_carries_link_and_stats() {
        let target = Target {
            mode: QueryMode::StatisticLink,
            statistic_link: "https://stablenet.example/link/42".to_string(),
            include_avg_stats: true,
            ..Target::default()
        };
        let query = to_statistic_link_query(&target, &ctx());

        assert_eq!(
            query,
            SingleQuery::StatisticLink {
                ref_id: "A".to_string(),
                datasource_id: 7,
                statistic_link: "https://stablenet.example/link/42".to_string(),
                interval_ms: 30_000.0,
                include_min_stats: false,
                include_avg_stats: true,
                include_max_stats: false,
            }
        );
    }

    #[test]
    fn test_assemble_prefers_statistic_link() {
        let target = Target {
            mode: QueryMode::StatisticLink,
            statistic_link: "https://stablenet.example/link/42".to_string(),
            ..measurement_target().with_metric_chosen("SNMP_1", true)
        };
        let query = assemble(&target, &ctx()).unwrap();
        assert!(matches!(query, SingleQuery::StatisticLink { .. }));
    }

    #[test]
    fn test_assemble_emits_nothing_for_empty_metrics() {
        assert!(assemble(&measurement_target(), &ctx()).is_none());
    }

    #[test]
    fn test_assemble_emits_device_query_otherwise() {
        let target = measurement_target().with_metric_chosen("SNMP_2", true);
        let query = assemble(&target, &ctx()).unwrap();
        assert!(matches!(query, SingleQuery::MetricData { .. }));
    }
}
