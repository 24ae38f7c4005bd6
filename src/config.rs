use crate::error::AppError;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SYMBOL: &str = "BTCUSDT";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub exchange_base_url: String,
    pub symbol: String,
    pub kline_limit: u32,
    pub news_feed_url: String,
    pub static_dir: String,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            bind_addr: text("BIND_ADDR", "0.0.0.0"),
            port: parse_or(&lookup, "PORT", 8000)?,
            exchange_base_url: text("EXCHANGE_BASE_URL", "https://api.binance.com")
                .trim_end_matches('/')
                .to_string(),
            symbol: text("SYMBOL", DEFAULT_SYMBOL),
            kline_limit: parse_or(&lookup, "KLINE_LIMIT", 1500)?,
            news_feed_url: text(
                "NEWS_FEED_URL",
                "https://www.coindesk.com/arc/outboundfeeds/rss/",
            ),
            static_dir: text("STATIC_DIR", "static"),
            http_timeout: Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", 10)?),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| AppError::Config {
            key,
            reason: format!("{raw:?}: {e}"),
        }),
        None => Ok(default),
    }
}
