use chrono::Duration;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Target bucket sizes accepted by the resampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Min1,
    Min5,
    Min10,
    Min15,
    Min30,
    Hour1,
    Hour4,
    Day1,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown interval {0:?}")]
pub struct UnknownInterval(pub String);

impl Interval {
    pub const ALL: [Interval; 8] = [
        Interval::Min1,
        Interval::Min5,
        Interval::Min10,
        Interval::Min15,
        Interval::Min30,
        Interval::Hour1,
        Interval::Hour4,
        Interval::Day1,
    ];

    pub fn minutes(&self) -> i64 {
        match self {
            Interval::Min1 => 1,
            Interval::Min5 => 5,
            Interval::Min10 => 10,
            Interval::Min15 => 15,
            Interval::Min30 => 30,
            Interval::Hour1 => 60,
            Interval::Hour4 => 240,
            Interval::Day1 => 1440,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(self.minutes())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Min1 => "1m",
            Interval::Min5 => "5m",
            Interval::Min10 => "10m",
            Interval::Min15 => "15m",
            Interval::Min30 => "30m",
            Interval::Hour1 => "1h",
            Interval::Hour4 => "4h",
            Interval::Day1 => "1d",
        }
    }

    /// Calendar-day buckets follow local dates instead of a fixed 24h step.
    pub fn is_daily(&self) -> bool {
        matches!(self, Interval::Day1)
    }
}

impl FromStr for Interval {
    type Err = UnknownInterval;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .into_iter()
            .find(|interval| interval.as_str() == s)
            .ok_or_else(|| UnknownInterval(s.to_string()))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
