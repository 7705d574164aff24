use chrono::NaiveDateTime;
use derive_more::{Debug, Display};

/// Grouping key for per-endpoint statistics. Two records belong to the same
/// group exactly when their path strings are byte-identical.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(String);

impl From<&str> for Endpoint {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Wall-clock span of a dataset's timestamps. An undefined span (no
/// timestamps at all) or a zero-width one collapses to a one-second
/// denominator so the throughput formulas stay well-defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElapsedSeconds {
    secs: f64,
    fallback: bool,
}

impl ElapsedSeconds {
    pub fn from_window(window: Option<(NaiveDateTime, NaiveDateTime)>) -> Self {
        match window {
            Some((min, max)) if min != max => Self {
                secs: (max - min).num_seconds() as f64,
                fallback: false,
            },
            _ => Self {
                secs: 1.0,
                fallback: true,
            },
        }
    }

    pub fn secs(self) -> f64 {
        self.secs
    }

    pub fn is_fallback(self) -> bool {
        self.fallback
    }
}
