use super::candles::{load_resampled, MarketQuery};
use super::{AppState, Response};
use crate::scorer::{self, Prediction};
use axum::extract::{Query, State};
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct PredictionBody {
    pub prediction: Prediction,
}

pub async fn predict(
    State(state): State<AppState>,
    Query(query): Query<MarketQuery>,
) -> (StatusCode, Json<Response<PredictionBody>>) {
    match load_resampled(&state, &query, "15m").await {
        Ok(candles) => {
            let prediction = scorer::predict(&candles);
            log::info!(
                "prediction {:?} p={:.3} ({})",
                prediction.label,
                prediction.probability,
                prediction.reason
            );
            (
                StatusCode::OK,
                Json(Response::Success(PredictionBody { prediction })),
            )
        }
        Err(err) => {
            log::error!("predict request failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Response::error(err)),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exchange_failure_is_reported_as_500() {
        let state = crate::routes::unreachable_state();
        let (status, Json(body)) = predict(State(state), Query(MarketQuery::default())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::to_value(body).unwrap();
        assert!(body["error"].is_string());
        assert!(body.get("prediction").is_none());
    }

    #[test]
    fn prediction_is_wrapped() {
        let body = PredictionBody {
            prediction: scorer::predict(&[]),
        };
        let value = serde_json::to_value(Response::Success(body)).unwrap();
        assert_eq!(value["prediction"]["label"], "neutral");
        assert_eq!(value["prediction"]["reason"], "not enough history");
    }
}
