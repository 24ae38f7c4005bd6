use crate::error::AppError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One OHLCV bar. `time` is the UTC open instant in epoch seconds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Fetches the most recent 1-minute klines for `symbol` from a Binance-style REST API.
pub async fn fetch_klines(
    client: &Client,
    base_url: &str,
    symbol: &str,
    limit: u32,
) -> Result<Vec<Candle>, AppError> {
    let url = format!("{}/api/v3/klines", base_url);
    let limit = limit.to_string();

    let response = client
        .get(&url)
        .query(&[("symbol", symbol), ("interval", "1m"), ("limit", limit.as_str())])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AppError::Upstream {
            status: response.status().as_u16(),
            url,
        });
    }

    let body = response.json::<Value>().await?;
    parse_klines(&body)
}

pub fn parse_klines(body: &Value) -> Result<Vec<Candle>, AppError> {
    let rows = body.as_array().ok_or_else(|| AppError::MalformedKline {
        row: 0,
        reason: "response is not an array".to_string(),
    })?;

    let mut data = Vec::with_capacity(rows.len());
    for (row, entry) in rows.iter().enumerate() {
        let fields = entry.as_array().ok_or_else(|| AppError::MalformedKline {
            row,
            reason: "row is not an array".to_string(),
        })?;

        let field = |idx: usize, name: &str| -> Result<f64, AppError> {
            fields
                .get(idx)
                .and_then(as_number)
                .ok_or_else(|| AppError::MalformedKline {
                    row,
                    reason: format!("missing or invalid {}", name),
                })
        };

        let open_time_ms = field(0, "open time")? as i64;
        let volume = match fields.get(5) {
            Some(_) => field(5, "volume")?,
            None => 0.0,
        };

        data.push(Candle {
            time: open_time_ms / 1000,
            open: field(1, "open")?,
            high: field(2, "high")?,
            low: field(3, "low")?,
            close: field(4, "close")?,
            volume,
        });
    }

    Ok(data)
}

// Binance sends prices as strings and timestamps as numbers.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
