//! Timezone-anchored candle resampling.
//!
//! Base candles are grouped into buckets whose boundaries are laid out on the
//! wall clock of the requested timezone. Intraday buckets step in fixed
//! durations from local midnight of the first candle's day; daily buckets are
//! local calendar dates, so DST days span 23 or 25 hours. Empty buckets are
//! never emitted.

use crate::data::Candle;
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub mod interval;
pub mod timezone;

pub use interval::Interval;
pub use timezone::resolve_timezone;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResampledCandle {
    #[serde(flatten)]
    pub candle: Candle,
    /// Bucket open rendered in the requested timezone. `None` for pass-through output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_time: Option<String>,
}

impl ResampledCandle {
    pub fn passthrough(candle: Candle) -> Self {
        ResampledCandle {
            candle,
            local_time: None,
        }
    }
}

/// Resamples base candles to `interval` on `timezone`'s wall clock.
///
/// An unrecognised interval returns the candles untouched; an unrecognised
/// timezone is treated as UTC.
pub fn resample(candles: &[Candle], interval: &str, timezone: &str) -> Vec<ResampledCandle> {
    match interval.parse::<Interval>() {
        Ok(interval) => resample_to(candles, interval, resolve_timezone(timezone)),
        Err(err) => {
            log::debug!("{}, returning candles unchanged", err);
            candles
                .iter()
                .copied()
                .map(ResampledCandle::passthrough)
                .collect()
        }
    }
}

pub fn resample_to(candles: &[Candle], interval: Interval, tz: Tz) -> Vec<ResampledCandle> {
    if candles.is_empty() {
        return Vec::new();
    }

    let mut sorted = candles.to_vec();
    sorted.sort_by_key(|c| c.time);

    let Some(buckets) = Buckets::anchored_at(sorted[0].time, interval, tz) else {
        return Vec::new();
    };

    let mut resampled = Vec::new();
    let mut current: Option<(i64, Candle)> = None;

    for candle in &sorted {
        let Some(start) = buckets.start_of(candle.time) else {
            log::warn!("skipping candle with out-of-range time {}", candle.time);
            continue;
        };

        match current.as_mut() {
            Some((bucket_start, agg)) if *bucket_start == start => {
                agg.high = agg.high.max(candle.high);
                agg.low = agg.low.min(candle.low);
                agg.close = candle.close;
                agg.volume += candle.volume;
            }
            _ => {
                if let Some((bucket_start, agg)) = current.take() {
                    resampled.push(buckets.finish(bucket_start, agg));
                }
                current = Some((start, *candle));
            }
        }
    }

    if let Some((bucket_start, agg)) = current {
        resampled.push(buckets.finish(bucket_start, agg));
    }

    resampled
}

/// Bucket layout for one resampling run.
struct Buckets {
    interval: Interval,
    tz: Tz,
    /// UTC epoch seconds of local midnight on the first candle's day.
    origin: i64,
}

impl Buckets {
    fn anchored_at(first_time: i64, interval: Interval, tz: Tz) -> Option<Self> {
        let first_local = DateTime::from_timestamp(first_time, 0)?.with_timezone(&tz);
        let origin = timezone::local_midnight(first_local.date_naive(), tz).timestamp();
        Some(Buckets {
            interval,
            tz,
            origin,
        })
    }

    /// Left edge, in UTC epoch seconds, of the bucket holding `time`.
    fn start_of(&self, time: i64) -> Option<i64> {
        if self.interval.is_daily() {
            let local = DateTime::from_timestamp(time, 0)?.with_timezone(&self.tz);
            return Some(timezone::local_midnight(local.date_naive(), self.tz).timestamp());
        }

        let step = self.interval.duration().num_seconds();
        Some(self.origin + (time - self.origin).div_euclid(step) * step)
    }

    fn finish(&self, start: i64, mut agg: Candle) -> ResampledCandle {
        agg.time = start;
        let local_time = DateTime::<Utc>::from_timestamp(start, 0).map(|utc| {
            utc.with_timezone(&self.tz)
                .to_rfc3339_opts(SecondsFormat::Secs, false)
        });
        ResampledCandle {
            candle: agg,
            local_time,
        }
    }
}
