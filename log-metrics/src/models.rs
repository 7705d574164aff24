use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

/// One successfully parsed access-log line. The timestamp is parsed
/// independently of the record grammar and may be absent even when every
/// other field is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRecord {
    pub endpoint: String,
    pub method: String,
    pub status: u16,
    pub response_size_bytes: u64,
    pub response_time_ms: u64,
    pub timestamp: Option<NaiveDateTime>,
}

/// Aggregated view of a dataset: overall throughput figures, four ranked
/// top-N tables, and the full per-endpoint series the charts draw from.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub calls_per_second: f64,
    pub avg_response_time_per_second: f64,
    pub top_by_avg_response_time: Vec<(String, f64)>,
    pub top_by_max_response_time: Vec<(String, u64)>,
    pub top_by_max_response_size: Vec<(String, u64)>,
    pub top_by_call_count: Vec<(String, usize)>,
    pub avg_response_time_ms_by_endpoint: HashMap<String, f64>,
    pub call_count_by_endpoint: HashMap<String, usize>,
}
