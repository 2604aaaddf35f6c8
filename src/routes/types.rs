use serde::{Deserialize, Serialize};
use std::fmt;

/// The per-flight metrics written for every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    DepartedOn,
    DelayInMinutes,
    DelayRatio,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::DepartedOn, Metric::DelayInMinutes, Metric::DelayRatio];

    /// Name used in column file names, e.g. `delayInMinutes`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::DepartedOn => "departedOn",
            Metric::DelayInMinutes => "delayInMinutes",
            Metric::DelayRatio => "delayRatio",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered origin→destination pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteKey {
    pub src: String,
    pub dst: String,
}

impl RouteKey {
    pub fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
        }
    }

    /// Route codes containing `-` cannot be told apart once joined into a file name.
    pub fn has_ambiguous_name(&self) -> bool {
        self.src.contains('-') || self.dst.contains('-')
    }
}

/// Identifies a single metric column of a single route.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnKey {
    pub route: RouteKey,
    pub metric: Metric,
}

impl ColumnKey {
    pub fn new(route: RouteKey, metric: Metric) -> Self {
        Self { route, metric }
    }

    /// `p-{src}-{dst}-{metric}.json`
    pub fn file_name(&self) -> String {
        format!(
            "p-{}-{}-{}.json",
            self.route.src, self.route.dst, self.metric
        )
    }
}

/// A column value. Integral values are kept as integers so they serialize
/// without a fractional part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Decimal(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(i) => i as f64,
            Number::Decimal(d) => d,
        }
    }
}
