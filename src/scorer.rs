//! Breakout heuristic over a resampled series.
//!
//! A fixed linear model over three features (recent momentum, volatility of
//! returns, last-bar volume spike) squashed through the logistic function.

use crate::data::Candle;
use crate::engine::ResampledCandle;
use serde::Serialize;

pub const MIN_HISTORY: usize = 6;
pub const WINDOW: usize = 20;
pub const MOMENTUM_LOOKBACK: usize = 5;

const W_MOMENTUM: f64 = 2.5;
const W_VOLATILITY: f64 = -4.0;
const W_VOLUME_SPIKE: f64 = 1.8;
const VOLUME_SPIKE_FACTOR: f64 = 1.5;

const BULLISH_ABOVE: f64 = 0.62;
const BEARISH_BELOW: f64 = 0.38;
const MOMENTUM_THRESHOLD: f64 = 0.001;
const HIGH_VOLATILITY: f64 = 0.02;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Prediction {
    #[serde(rename = "prob")]
    pub probability: f64,
    pub label: Label,
    pub reason: String,
}

impl Prediction {
    fn not_enough_history() -> Self {
        Prediction {
            probability: 0.5,
            label: Label::Neutral,
            reason: "not enough history".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub avg_return: f64,
    pub volatility: f64,
    pub volume_spike: f64,
}

impl Features {
    /// Extracts features from the trailing window. Empty and single-candle windows
    /// yield zero momentum and volatility.
    pub fn from_window(window: &[Candle]) -> Self {
        let returns: Vec<f64> = window
            .iter()
            .map(|c| {
                if c.open == 0.0 {
                    0.0
                } else {
                    (c.close - c.open) / c.open
                }
            })
            .collect();

        let recent = &returns[returns.len().saturating_sub(MOMENTUM_LOOKBACK)..];
        let avg_return = mean(recent);
        let volatility = sample_std(&returns);

        let mean_volume = mean(&window.iter().map(|c| c.volume).collect::<Vec<_>>());
        let latest_volume = window.last().map(|c| c.volume).unwrap_or(0.0);
        let volume_spike = if mean_volume > 0.0 && latest_volume > mean_volume * VOLUME_SPIKE_FACTOR
        {
            1.0
        } else {
            0.0
        };

        Features {
            avg_return,
            volatility,
            volume_spike,
        }
    }

    pub fn score(&self) -> f64 {
        W_MOMENTUM * self.avg_return
            + W_VOLATILITY * self.volatility
            + W_VOLUME_SPIKE * self.volume_spike
    }

    fn reasons(&self) -> Vec<&'static str> {
        let mut reasons = Vec::new();
        if self.avg_return > MOMENTUM_THRESHOLD {
            reasons.push("positive near-term momentum");
        }
        if self.avg_return < -MOMENTUM_THRESHOLD {
            reasons.push("negative near-term momentum");
        }
        if self.volatility > HIGH_VOLATILITY {
            reasons.push("high short-term volatility");
        }
        if self.volume_spike == 1.0 {
            reasons.push("volume spike");
        }
        if reasons.is_empty() {
            reasons.push("mixed signals");
        }
        reasons
    }
}

pub fn predict(candles: &[ResampledCandle]) -> Prediction {
    if candles.len() < MIN_HISTORY {
        return Prediction::not_enough_history();
    }

    let window: Vec<Candle> = candles[candles.len() - WINDOW.min(candles.len())..]
        .iter()
        .map(|c| c.candle)
        .collect();

    let features = Features::from_window(&window);
    let probability = logistic(features.score());

    let label = if probability > BULLISH_ABOVE {
        Label::Bullish
    } else if probability < BEARISH_BELOW {
        Label::Bearish
    } else {
        Label::Neutral
    };

    Prediction {
        probability,
        label,
        reason: features.reasons().join("; "),
    }
}

pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bar(i: usize, open: f64, close: f64, volume: f64) -> ResampledCandle {
        ResampledCandle::passthrough(Candle {
            time: 1_700_000_000 + 900 * i as i64,
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume,
        })
    }

    #[test]
    fn short_history_is_neutral_regardless_of_content() {
        let wild: Vec<ResampledCandle> = (0..5)
            .map(|i| bar(i, 1.0, 50.0, 1e9 * i as f64))
            .collect();

        for len in 0..MIN_HISTORY {
            assert_eq!(
                predict(&wild[..len.min(wild.len())]),
                Prediction {
                    probability: 0.5,
                    label: Label::Neutral,
                    reason: "not enough history".to_string(),
                }
            );
        }
    }

    #[test]
    fn rising_closes_with_volume_spike_is_bullish() {
        let mut series: Vec<ResampledCandle> = (0..20)
            .map(|i| {
                let open = 100.0 * 1.003f64.powi(i as i32);
                bar(i, open, open * 1.003, 100.0 + 5.0 * i as f64)
            })
            .collect();
        let last_open = series[19].candle.close;
        series.push(bar(20, last_open, last_open * 1.003, 1_000.0));

        let prediction = predict(&series);
        assert_eq!(prediction.label, Label::Bullish);
        assert!(prediction.reason.contains("positive near-term momentum"));
        assert!(prediction.reason.contains("volume spike"));
        assert_eq!(prediction.reason, "positive near-term momentum; volume spike");
        assert!(prediction.probability > BULLISH_ABOVE);
    }

    #[test]
    fn falling_volatile_series_is_bearish() {
        let series: Vec<ResampledCandle> = (0..12)
            .map(|i| {
                let (open, close) = if i % 2 == 0 { (100.0, 60.0) } else { (100.0, 99.0) };
                bar(i, open, close, 10.0)
            })
            .collect();

        let prediction = predict(&series);
        assert_eq!(prediction.label, Label::Bearish);
        assert_eq!(
            prediction.reason,
            "negative near-term momentum; high short-term volatility"
        );
    }

    #[test]
    fn flat_series_has_mixed_signals() {
        let series: Vec<ResampledCandle> = (0..8).map(|i| bar(i, 100.0, 100.0, 10.0)).collect();

        let prediction = predict(&series);
        assert_eq!(prediction.label, Label::Neutral);
        assert_eq!(prediction.reason, "mixed signals");
        assert_relative_eq!(prediction.probability, 0.5);
    }

    #[test]
    fn zero_open_counts_as_zero_return() {
        let mut series: Vec<ResampledCandle> = (0..6).map(|i| bar(i, 100.0, 100.0, 0.0)).collect();
        series[5] = bar(5, 0.0, 10.0, 0.0);

        let prediction = predict(&series);
        assert_relative_eq!(prediction.probability, 0.5);
        assert_eq!(prediction.reason, "mixed signals");
    }

    #[test]
    fn only_the_last_twenty_bars_matter() {
        let tail: Vec<ResampledCandle> = (0..20)
            .map(|i| bar(i + 30, 100.0, 100.2, 10.0))
            .collect();
        let mut long = (0..30)
            .map(|i| bar(i, 100.0, 60.0, 5_000.0))
            .collect::<Vec<_>>();
        long.extend(tail.iter().cloned());

        assert_eq!(predict(&long), predict(&tail));
    }

    #[test]
    fn features_match_hand_computation() {
        let prices = [
            (100.0, 101.0),
            (100.0, 99.0),
            (100.0, 102.0),
            (100.0, 100.0),
            (100.0, 101.0),
            (100.0, 100.0),
        ];
        let window: Vec<Candle> = prices
            .iter()
            .enumerate()
            .map(|(i, &(open, close))| Candle {
                time: i as i64 * 60,
                open,
                high: 103.0,
                low: 98.0,
                close,
                volume: if i == 5 { 40.0 } else { 10.0 },
            })
            .collect();

        let features = Features::from_window(&window);
        // Returns: .01, -.01, .02, 0, .01, 0; last five average .004.
        assert_relative_eq!(features.avg_return, 0.004, epsilon = 1e-12);
        // Mean .005, squared deviations sum 5.5e-4, sample variance 1.1e-4.
        assert_relative_eq!(features.volatility, 1.1e-4f64.sqrt(), epsilon = 1e-12);
        // Mean volume 15, last is 40 > 22.5.
        assert_eq!(features.volume_spike, 1.0);
        assert_relative_eq!(
            features.score(),
            2.5 * 0.004 - 4.0 * 1.1e-4f64.sqrt() + 1.8,
            epsilon = 1e-12
        );
    }

    #[test]
    fn serializes_with_wire_names() {
        let value = serde_json::to_value(Prediction::not_enough_history()).unwrap();
        assert_eq!(value["prob"], 0.5);
        assert_eq!(value["label"], "neutral");
        assert_eq!(value["reason"], "not enough history");
    }

    #[test]
    fn logistic_is_centered() {
        assert_relative_eq!(logistic(0.0), 0.5);
        assert!(logistic(10.0) > 0.99);
        assert!(logistic(-10.0) < 0.01);
    }

    #[test]
    fn tiny_windows_have_zero_features() {
        let empty = Features::from_window(&[]);
        assert_eq!(empty.avg_return, 0.0);
        assert_eq!(empty.volatility, 0.0);
        assert_eq!(empty.volume_spike, 0.0);

        let single = Features::from_window(&[bar(0, 100.0, 101.0, 5.0).candle]);
        assert_relative_eq!(single.avg_return, 0.01);
        assert_eq!(single.volatility, 0.0);
        assert_eq!(single.volume_spike, 0.0);
    }
}
