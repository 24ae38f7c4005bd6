use crate::config::Config;
use crate::error::AppError;
use axum::http::{header, HeaderValue};
use axum::{middleware, routing::get, Router};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;

pub mod assets;
pub mod candles;
pub mod headlines;
pub mod predict;

#[derive(Clone)]
pub struct AppState {
    pub client: Client,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("btc-pulse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(AppState {
            client,
            config: Arc::new(config),
        })
    }
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
pub enum Response<T> {
    Success(T),
    Error { error: String },
}

impl<T> Response<T> {
    pub fn error(err: impl ToString) -> Self {
        Response::Error {
            error: err.to_string(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/candles", get(candles::candles))
        .route("/api/predict", get(predict::predict))
        .route("/api/btc_news", get(headlines::btc_news))
        .route("/favicon.ico", get(assets::favicon))
        .fallback(assets::serve_static)
        .layer(middleware::map_response(allow_any_origin))
        .with_state(state)
}

async fn allow_any_origin(mut response: axum::response::Response) -> axum::response::Response {
    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

/// State whose exchange and news feed refuse connections.
#[cfg(test)]
pub(crate) fn unreachable_state() -> AppState {
    let config = Config::from_lookup(|key| match key {
        "EXCHANGE_BASE_URL" | "NEWS_FEED_URL" => Some("http://127.0.0.1:1".to_string()),
        "HTTP_TIMEOUT_SECS" => Some("2".to_string()),
        _ => None,
    })
    .unwrap();
    AppState::new(config).unwrap()
}
