use super::{AppState, Response};
use crate::news::{fetch_headlines, TaggedHeadline};
use axum::extract::State;
use axum::{http::StatusCode, Json};

const FETCH_COUNT: usize = 20;
const MAX_HEADLINES: usize = 5;

/// Latest Bitcoin headlines with keyword sentiment. Feed failures yield an empty list.
pub async fn btc_news(
    State(state): State<AppState>,
) -> (StatusCode, Json<Response<Vec<TaggedHeadline>>>) {
    let feed = fetch_headlines(&state.client, &state.config.news_feed_url, FETCH_COUNT).await;
    let headlines = match feed {
        Ok(headlines) => headlines,
        Err(err) => {
            log::warn!("news feed unavailable: {}", err);
            Vec::new()
        }
    };

    let tagged: Vec<TaggedHeadline> = headlines
        .into_iter()
        .take(MAX_HEADLINES)
        .map(TaggedHeadline::from)
        .collect();

    (StatusCode::OK, Json(Response::Success(tagged)))
}
