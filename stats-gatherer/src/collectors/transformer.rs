//! Turns columnar entity records into normalized points.
//!
//! Every function here is pure: problems with the input are reported as
//! [`Diagnostic`]s next to the points that could still be produced, and
//! logging is left to the caller.

use crate::{
    error::Diagnostic,
    metrics::{
        CompositeId,
        EntityRecord,
        NormalizedPoint,
        Tags,
        UUID_TAG,
    },
};
use chrono::{
    DateTime,
    Utc,
};

/// Result of transforming one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordOutcome {
    pub points: Vec<NormalizedPoint>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RecordOutcome {
    fn skipped(diagnostic: Diagnostic) -> Self {
        Self {
            points: Vec::new(),
            diagnostics: vec![diagnostic],
        }
    }

    /// True when the composite id was unusable and nothing was emitted.
    pub fn is_skipped(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::MalformedCompositeId { .. }))
    }

    pub fn dropped_values(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::UnparsableValue { .. }))
            .count()
    }
}

/// Parses one `YYYY-MM-DD HH:MM:SS` token as a UTC instant.
pub fn parse_sample_timestamp(token: &str) -> Option<DateTime<Utc>> {
    let (date, time) = token.split_once(' ')?;
    if date.is_empty() || time.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(&format!("{date}T{time}Z"))
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Parses the shared sample axis. Unparsable entries stay in place as `None`
/// so indices keep lining up with the value columns.
pub fn parse_sample_axis(sample_info: &str, diagnostics: &mut Vec<Diagnostic>) -> Vec<Option<DateTime<Utc>>> {
    split_csv(sample_info)
        .enumerate()
        .map(|(index, token)| {
            let parsed = parse_sample_timestamp(token);
            if parsed.is_none() {
                diagnostics.push(Diagnostic::UnparsableTimestamp {
                    index,
                    raw: token.to_string(),
                });
            }
            parsed
        })
        .collect()
}

/// Coerces a value token with single-precision tolerance. Non-finite values
/// are rejected.
pub fn parse_value(token: &str) -> Option<f64> {
    token.parse::<f32>().ok().filter(|v| v.is_finite()).map(f64::from)
}

/// Transforms one record. `tags` is the invocation-wide tag set; it is
/// copied and extended with the record's `uuid`, never modified.
pub fn transform_record(record: &EntityRecord, tags: &Tags) -> RecordOutcome {
    let id = match CompositeId::parse(&record.entity_ref_id) {
        Ok(id) => id,
        Err(diagnostic) => return RecordOutcome::skipped(diagnostic),
    };

    let mut diagnostics = Vec::new();
    let axis = parse_sample_axis(&record.sample_info, &mut diagnostics);

    let mut record_tags = tags.clone();
    record_tags.insert(UUID_TAG.to_string(), id.uuid().to_string());

    let mut points = Vec::new();
    for series in &record.series {
        let field = id.field_name(series.label());
        let values = split_csv(&series.values).collect::<Vec<_>>();
        if values.len() != axis.len() {
            diagnostics.push(Diagnostic::LengthMismatch {
                metric: series.label().to_string(),
                samples: axis.len(),
                values: values.len(),
            });
        }

        for (index, (token, timestamp)) in values.iter().zip(&axis).enumerate() {
            let Some(timestamp) = timestamp else {
                continue;
            };
            match parse_value(token) {
                Some(value) => points.push(NormalizedPoint::new(field.clone(), record_tags.clone(), *timestamp, value)),
                None => diagnostics.push(Diagnostic::UnparsableValue {
                    metric: series.label().to_string(),
                    index,
                    raw: token.to_string(),
                }),
            }
        }
    }

    RecordOutcome { points, diagnostics }
}

/// An empty string is an empty sequence rather than one empty token.
fn split_csv(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').filter(move |_| !raw.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{
        MetricSeries,
        VSAN_MEASUREMENT,
    };
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const AXIS: &str = "2017-06-14 23:10:00,2017-06-14 23:15:00,2017-06-14 23:20:00";

    fn cluster_tags() -> Tags {
        Tags::from([
            ("clustername".to_string(), "prod".to_string()),
            ("vcenter".to_string(), "vc01".to_string()),
        ])
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 6, 14, 23, minute, 0).unwrap()
    }

    fn count_for(outcome: &RecordOutcome, field: &str) -> usize {
        outcome.points.iter().filter(|p| p.field == field).count()
    }

    #[test]
    fn parses_sample_timestamp_as_utc() {
        assert_eq!(parse_sample_timestamp("2017-06-14 23:10:00"), Some(at(10)));
        assert_eq!(
            parse_sample_timestamp("2017-06-15 00:00:00"),
            Some(Utc.with_ymd_and_hms(2017, 6, 15, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn rejects_malformed_timestamps() {
        for token in ["2017-06-14T23:10:00", "2017-06-14", " 23:10:00", "2017-06-14 ", "2017-13-40 25:00:00", ""] {
            assert_eq!(parse_sample_timestamp(token), None, "{token:?}");
        }
    }

    #[test]
    fn parses_values_with_single_precision() {
        assert_eq!(parse_value("1.5"), Some(1.5));
        assert_eq!(parse_value("42"), Some(42.0));
        assert_eq!(parse_value("0.1"), Some(f64::from(0.1_f32)));
        assert_eq!(parse_value("NaNgarbage"), None);
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value(""), None);
    }

    #[test]
    fn emits_one_point_per_metric_and_sample() {
        let record = EntityRecord::new(
            "host-domclient:abc-123",
            AXIS,
            vec![MetricSeries::new("iopsRead", "1,2,3"), MetricSeries::new("iopsWrite", "4,5,6")],
        );

        let outcome = transform_record(&record, &cluster_tags());

        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.points.len(), 6);
        let first = &outcome.points[0];
        assert_eq!(first.measurement, VSAN_MEASUREMENT);
        assert_eq!(first.field, "host-domclient_iopsRead");
        assert_eq!(first.timestamp, at(10));
        assert_eq!(first.value, 1.0);
        assert_eq!(first.tags.get("uuid").map(String::as_str), Some("abc-123"));
        assert_eq!(first.tags.get("clustername").map(String::as_str), Some("prod"));
        let last = &outcome.points[5];
        assert_eq!(last.field, "host-domclient_iopsWrite");
        assert_eq!(last.timestamp, at(20));
        assert_eq!(last.value, 6.0);
    }

    #[test]
    fn malformed_value_drops_only_that_point() {
        let record = EntityRecord::new(
            "cluster-domclient:5270dc4d",
            AXIS,
            vec![
                MetricSeries::new("iopsRead", "1,1,1"),
                MetricSeries::new("iopsWrite", "2,NaNgarbage,2"),
            ],
        );

        let outcome = transform_record(&record, &cluster_tags());

        assert_eq!(count_for(&outcome, "cluster-domclient_iopsRead"), 3);
        assert_eq!(count_for(&outcome, "cluster-domclient_iopsWrite"), 2);
        assert_eq!(
            outcome.diagnostics,
            vec![Diagnostic::UnparsableValue {
                metric: "iopsWrite".to_string(),
                index: 1,
                raw: "NaNgarbage".to_string(),
            }]
        );
        assert_eq!(outcome.dropped_values(), 1);
        let write_times = outcome
            .points
            .iter()
            .filter(|p| p.field == "cluster-domclient_iopsWrite")
            .map(|p| p.timestamp)
            .collect::<Vec<_>>();
        assert_eq!(write_times, vec![at(10), at(20)]);
    }

    #[test]
    fn malformed_timestamp_drops_index_for_all_series() {
        let record = EntityRecord::new(
            "cache-disk:disk-1",
            "2017-06-14 23:10:00,2017-06-14T23:15:00,2017-06-14 23:20:00",
            vec![MetricSeries::new("latencyRead", "1,2,3"), MetricSeries::new("latencyWrite", "4,5,6")],
        );

        let outcome = transform_record(&record, &cluster_tags());

        assert_eq!(outcome.points.len(), 4);
        assert!(outcome.points.iter().all(|p| p.timestamp != at(15)));
        assert_eq!(
            outcome.diagnostics,
            vec![Diagnostic::UnparsableTimestamp {
                index: 1,
                raw: "2017-06-14T23:15:00".to_string(),
            }]
        );
    }

    #[test]
    fn malformed_composite_id_skips_record() {
        let record = EntityRecord::new("cache-disk", AXIS, vec![MetricSeries::new("iopsRead", "1,2,3")]);

        let outcome = transform_record(&record, &cluster_tags());

        assert!(outcome.points.is_empty());
        assert!(outcome.is_skipped());
    }

    #[test]
    fn length_mismatch_is_bounded_by_shorter_sequence() {
        let record = EntityRecord::new(
            "vsan-vnic-net:vmk1",
            AXIS,
            vec![
                MetricSeries::new("rxThroughput", "1,2"),
                MetricSeries::new("txThroughput", "1,2,3,4,5"),
            ],
        );

        let outcome = transform_record(&record, &cluster_tags());

        assert_eq!(count_for(&outcome, "vsan-vnic-net_rxThroughput"), 2);
        assert_eq!(count_for(&outcome, "vsan-vnic-net_txThroughput"), 3);
        assert_eq!(
            outcome.diagnostics,
            vec![
                Diagnostic::LengthMismatch {
                    metric: "rxThroughput".to_string(),
                    samples: 3,
                    values: 2,
                },
                Diagnostic::LengthMismatch {
                    metric: "txThroughput".to_string(),
                    samples: 3,
                    values: 5,
                },
            ]
        );
    }

    #[test]
    fn empty_sample_axis_emits_nothing() {
        let record = EntityRecord::new("vsan-pnic-net:vmnic0", "", vec![MetricSeries::new("rxThroughput", "")]);

        let outcome = transform_record(&record, &cluster_tags());

        assert!(outcome.points.is_empty());
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn shared_tags_are_not_modified() {
        let tags = cluster_tags();
        let record = EntityRecord::new("host-domclient:abc-123", AXIS, vec![MetricSeries::new("iopsRead", "1,2,3")]);

        transform_record(&record, &tags);

        assert_eq!(tags, cluster_tags());
        assert!(!tags.contains_key("uuid"));
    }
}
