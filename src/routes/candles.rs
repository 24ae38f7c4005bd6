use super::{AppState, Response};
use crate::data::fetch_klines;
use crate::engine::{resample, Interval, ResampledCandle};
use crate::error::AppError;
use axum::extract::{Query, State};
use axum::{http::StatusCode, Json};
use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
pub struct MarketQuery {
    pub interval: Option<String>,
    pub timezone: Option<String>,
    pub symbol: Option<String>,
}

impl MarketQuery {
    pub fn interval_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.interval.as_deref().unwrap_or(default)
    }

    /// Empty and `auto` are left for the engine to map to UTC.
    pub fn timezone(&self) -> &str {
        self.timezone.as_deref().unwrap_or("UTC")
    }
}

/// Fetches 1m klines and resamples them for the query.
pub async fn load_resampled(
    state: &AppState,
    query: &MarketQuery,
    default_interval: &str,
) -> Result<Vec<ResampledCandle>, AppError> {
    let symbol = query.symbol.as_deref().unwrap_or(&state.config.symbol);
    let raw = fetch_klines(
        &state.client,
        &state.config.exchange_base_url,
        symbol,
        state.config.kline_limit,
    )
    .await?;

    let interval = query.interval_or(default_interval);
    let candles = resample(&raw, interval, query.timezone());
    match interval.parse::<Interval>() {
        Ok(parsed) => log::info!(
            "{} {} {}: {} base candles -> {}",
            symbol,
            parsed,
            query.timezone(),
            raw.len(),
            candles.len()
        ),
        Err(err) => log::info!("{}: {}, {} candles passed through", symbol, err, raw.len()),
    }
    Ok(candles)
}

pub async fn candles(
    State(state): State<AppState>,
    Query(query): Query<MarketQuery>,
) -> (StatusCode, Json<Response<Vec<ResampledCandle>>>) {
    match load_resampled(&state, &query, "1m").await {
        Ok(candles) => (StatusCode::OK, Json(Response::Success(candles))),
        Err(err) => {
            log::error!("candles request failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Response::error(err)),
            )
        }
    }
}
