use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::{
    invariants::{ElapsedSeconds, Endpoint},
    models::{AccessRecord, MetricsReport},
};

/// Per-endpoint accumulator filled in a single pass over the dataset; all
/// four rankings and both full series derive from this one map.
#[derive(Debug)]
struct EndpointStats {
    total_ms: u64,
    max_ms: u64,
    max_size: u64,
    count: usize,
    first_seen: usize,
}

impl EndpointStats {
    fn new(first_seen: usize) -> Self {
        Self {
            total_ms: 0,
            max_ms: 0,
            max_size: 0,
            count: 0,
            first_seen,
        }
    }

    fn observe(&mut self, record: &AccessRecord) {
        self.total_ms += record.response_time_ms;
        self.max_ms = self.max_ms.max(record.response_time_ms);
        self.max_size = self.max_size.max(record.response_size_bytes);
        self.count += 1;
    }

    fn avg_ms(&self) -> f64 {
        self.total_ms as f64 / self.count as f64
    }
}

/// Computes the metrics report for a parsed dataset. `None` is the explicit
/// "no data" outcome for an empty dataset; every figure below is otherwise
/// well-defined, including when no record carries a timestamp.
pub fn aggregate(records: &[AccessRecord], top_n: usize) -> Option<MetricsReport> {
    if records.is_empty() {
        return None;
    }

    let elapsed = ElapsedSeconds::from_window(time_window(records));
    let total_calls = records.len();
    let total_ms: u64 = records.iter().map(|r| r.response_time_ms).sum();

    let calls_per_second = total_calls as f64 / elapsed.secs();
    // Latency budget consumed per wall-clock second; with no usable window
    // this degrades to the plain mean instead of a sum over a fake second.
    let avg_response_time_per_second = if elapsed.is_fallback() {
        total_ms as f64 / total_calls as f64
    } else {
        total_ms as f64 / elapsed.secs()
    };

    let mut groups: HashMap<Endpoint, EndpointStats> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        groups
            .entry(Endpoint::from(record.endpoint.as_str()))
            .or_insert_with(|| EndpointStats::new(index))
            .observe(record);
    }

    Some(MetricsReport {
        calls_per_second,
        avg_response_time_per_second,
        top_by_avg_response_time: rank_by_avg(&groups, top_n),
        top_by_max_response_time: rank_by(&groups, top_n, |stats| stats.max_ms),
        top_by_max_response_size: rank_by(&groups, top_n, |stats| stats.max_size),
        top_by_call_count: rank_by(&groups, top_n, |stats| stats.count),
        avg_response_time_ms_by_endpoint: groups
            .iter()
            .map(|(endpoint, stats)| (endpoint.to_string(), stats.avg_ms()))
            .collect(),
        call_count_by_endpoint: groups
            .iter()
            .map(|(endpoint, stats)| (endpoint.to_string(), stats.count))
            .collect(),
    })
}

// Window over the non-null timestamps only; records without one still count
// toward every other statistic.
fn time_window(records: &[AccessRecord]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let mut stamps = records.iter().filter_map(|r| r.timestamp);
    let first = stamps.next()?;
    Some(stamps.fold((first, first), |(min, max), ts| {
        (min.min(ts), max.max(ts))
    }))
}

// Descending by the statistic; ties resolve to the endpoint encountered
// first, which makes the truncated ranking deterministic.
fn rank_by<T, F>(
    groups: &HashMap<Endpoint, EndpointStats>,
    top_n: usize,
    stat: F,
) -> Vec<(String, T)>
where
    T: Ord + Copy,
    F: Fn(&EndpointStats) -> T,
{
    let mut entries: Vec<_> = groups
        .iter()
        .map(|(endpoint, stats)| (endpoint, stat(stats), stats.first_seen))
        .collect();
    entries.sort_unstable_by_key(|&(_, value, first_seen)| (Reverse(value), first_seen));
    entries.truncate(top_n);
    entries
        .into_iter()
        .map(|(endpoint, value, _)| (endpoint.to_string(), value))
        .collect()
}

fn rank_by_avg(groups: &HashMap<Endpoint, EndpointStats>, top_n: usize) -> Vec<(String, f64)> {
    let mut entries: Vec<_> = groups
        .iter()
        .map(|(endpoint, stats)| (endpoint, stats.avg_ms(), stats.first_seen))
        .collect();
    entries.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then(a.2.cmp(&b.2)));
    entries.truncate(top_n);
    entries
        .into_iter()
        .map(|(endpoint, avg, _)| (endpoint.to_string(), avg))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use asserting::prelude::*;
    use chrono::{Duration, NaiveDate};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 10, 10)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn record(
        endpoint: &str,
        response_time_ms: u64,
        response_size_bytes: u64,
        timestamp: Option<NaiveDateTime>,
    ) -> AccessRecord {
        AccessRecord {
            endpoint: endpoint.into(),
            method: "GET".into(),
            status: 200,
            response_size_bytes,
            response_time_ms,
            timestamp,
        }
    }

    #[test]
    fn empty_dataset_reports_no_data() {
        assert!(aggregate(&[], 10).is_none());
    }

    #[test]
    fn throughput_over_a_ten_second_window() {
        let start = at(13, 55, 0);
        // 50 records spanning exactly start..start+10s.
        let records: Vec<_> = (0..50i64)
            .map(|i| record("/api", 40, 100, Some(start + Duration::seconds(i * 10 / 49))))
            .collect();

        let report = aggregate(&records, 10).unwrap();
        assert_eq!(report.calls_per_second, 5.0);
        assert_eq!(report.avg_response_time_per_second, 200.0);
    }

    #[test]
    fn missing_timestamps_fall_back_to_the_mean() {
        let records = vec![
            record("/a", 100, 10, None),
            record("/a", 200, 10, None),
            record("/b", 300, 10, None),
            record("/b", 400, 10, None),
        ];
        let report = aggregate(&records, 10).unwrap();
        assert_eq!(report.calls_per_second, 4.0);
        assert_eq!(report.avg_response_time_per_second, 250.0);
    }

    #[test]
    fn identical_timestamps_fall_back_to_the_mean() {
        let ts = Some(at(13, 55, 36));
        let records = vec![record("/a", 100, 10, ts), record("/a", 300, 10, ts)];
        let report = aggregate(&records, 10).unwrap();
        assert_eq!(report.calls_per_second, 2.0);
        assert_eq!(report.avg_response_time_per_second, 200.0);
    }

    #[test]
    fn window_ignores_null_timestamps() {
        let records = vec![
            record("/a", 100, 10, Some(at(13, 55, 30))),
            record("/a", 100, 10, None),
            record("/a", 100, 10, Some(at(13, 55, 40))),
        ];
        let report = aggregate(&records, 10).unwrap();
        assert_eq!(report.calls_per_second, 0.3);
        assert_eq!(report.avg_response_time_per_second, 30.0);
    }

    #[test]
    fn per_endpoint_statistics() {
        let records = vec![
            record("/api/v1/a", 100, 50, None),
            record("/api/v1/a", 300, 70, None),
            record("/api/v1/b", 200, 10, None),
        ];
        let report = aggregate(&records, 10).unwrap();

        assert_eq!(
            report.avg_response_time_ms_by_endpoint.get("/api/v1/a"),
            Some(&200.0)
        );
        assert_eq!(
            report.avg_response_time_ms_by_endpoint.get("/api/v1/b"),
            Some(&200.0)
        );
        assert_eq!(report.call_count_by_endpoint.get("/api/v1/a"), Some(&2));
        assert_eq!(report.call_count_by_endpoint.get("/api/v1/b"), Some(&1));

        assert_eq!(
            report.top_by_max_response_time[0],
            ("/api/v1/a".to_string(), 300)
        );
        assert_eq!(
            report.top_by_max_response_size,
            vec![("/api/v1/a".to_string(), 70), ("/api/v1/b".to_string(), 10)]
        );
        assert_eq!(
            report.top_by_call_count,
            vec![("/api/v1/a".to_string(), 2), ("/api/v1/b".to_string(), 1)]
        );
        // Equal averages: the endpoint seen first ranks first.
        assert_eq!(
            report.top_by_avg_response_time,
            vec![
                ("/api/v1/a".to_string(), 200.0),
                ("/api/v1/b".to_string(), 200.0)
            ]
        );
    }

    #[test]
    fn rankings_truncate_to_top_n() {
        let mut records = Vec::new();
        for i in 0..12 {
            for _ in 0..=i {
                records.push(record(&format!("/e{i}"), 10 * (i as u64 + 1), 1, None));
            }
        }
        let report = aggregate(&records, 10).unwrap();

        assert_that!(report.top_by_call_count.len()).is_equal_to(10);
        assert_eq!(report.top_by_call_count[0], ("/e11".to_string(), 12));
        assert_eq!(report.top_by_call_count[9], ("/e2".to_string(), 3));
        // Nothing excluded outranks anything included.
        let cutoff = report.top_by_call_count[9].1;
        for excluded in ["/e0", "/e1"] {
            assert!(report.call_count_by_endpoint[excluded] < cutoff);
        }
        // The unranked series still carries every endpoint.
        assert_eq!(report.avg_response_time_ms_by_endpoint.len(), 12);
        assert_eq!(report.call_count_by_endpoint.len(), 12);
    }

    #[test]
    fn call_count_ties_break_by_first_encountered() {
        let records = vec![
            record("/x", 10, 1, None),
            record("/y", 10, 1, None),
            record("/y", 10, 1, None),
            record("/x", 10, 1, None),
        ];
        let report = aggregate(&records, 10).unwrap();
        assert_eq!(
            report.top_by_call_count,
            vec![("/x".to_string(), 2), ("/y".to_string(), 2)]
        );
    }
}
