use crate::error::AppError;
use chrono::DateTime;
use reqwest::Client;
use serde::Serialize;

pub mod rss;
pub mod sentiment;

pub use sentiment::{sentiment, Sentiment};

const TOPIC_KEYWORDS: [&str; 3] = ["bitcoin", "btc", "crypto"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    pub link: String,
    pub pub_date: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TaggedHeadline {
    pub title: String,
    pub link: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    pub sentiment: Sentiment,
}

impl From<Headline> for TaggedHeadline {
    fn from(headline: Headline) -> Self {
        TaggedHeadline {
            sentiment: sentiment(&headline.title),
            title: headline.title,
            link: headline.link,
            pub_date: headline.pub_date,
        }
    }
}

pub async fn fetch_headlines(
    client: &Client,
    feed_url: &str,
    count: usize,
) -> Result<Vec<Headline>, AppError> {
    let response = client.get(feed_url).send().await?;
    if !response.status().is_success() {
        return Err(AppError::Upstream {
            status: response.status().as_u16(),
            url: feed_url.to_string(),
        });
    }

    let body = response.text().await?;
    headlines_from_feed(&body, count)
}

/// Parses a feed and keeps up to `count` headlines, preferring ones about Bitcoin.
pub fn headlines_from_feed(xml: &str, count: usize) -> Result<Vec<Headline>, AppError> {
    let items: Vec<Headline> = rss::parse_items(xml)?
        .into_iter()
        .map(|item| Headline {
            title: item.title,
            link: item.link,
            pub_date: normalize_pub_date(&item.pub_date),
        })
        .collect();

    let on_topic: Vec<Headline> = items
        .iter()
        .filter(|h| is_on_topic(&h.title))
        .cloned()
        .collect();

    let mut selected = if on_topic.is_empty() { items } else { on_topic };
    selected.truncate(count);
    Ok(selected)
}

fn is_on_topic(title: &str) -> bool {
    let title = title.to_lowercase();
    TOPIC_KEYWORDS.iter().any(|k| title.contains(k))
}

/// RFC 2822 dates become RFC 3339; anything unparseable is kept as-is.
fn normalize_pub_date(raw: &str) -> String {
    DateTime::parse_from_rfc2822(raw)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|_| raw.to_string())
}
