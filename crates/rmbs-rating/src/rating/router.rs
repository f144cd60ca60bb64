use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use super::domain::RmbsPayload;
use super::engine::RatingError;
use super::observer::RatingObserver;
use super::service::RatingService;

pub const CREDIT_RATING_ENDPOINT: &str = "/api/calculate_credit_rating";

pub const SUCCESS_MSG: &str = "Credit rating calculation successful";
pub const VALIDATION_FAILED_MSG: &str = "Validation failed";
pub const EMPTY_PORTFOLIO_MSG: &str = "At least one mortgage is required";
pub const MALFORMED_PAYLOAD_MSG: &str = "Malformed request payload";
pub const UNEXPECTED_ERROR_MSG: &str = "An unexpected error occurred.";

/// Envelope shared by every response of the rating endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub message: String,
    pub status_code: u16,
    pub data: Value,
}

impl ApiResponse {
    pub fn new(status: StatusCode, message: impl Into<String>, data: Value) -> Self {
        Self {
            message: message.into(),
            status_code: status.as_u16(),
            data,
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for RatingError {
    fn into_response(self) -> Response {
        let envelope = match &self {
            RatingError::Validation(errors) => ApiResponse::new(
                StatusCode::BAD_REQUEST,
                VALIDATION_FAILED_MSG,
                json!({ "category": self.category(), "errors": errors.messages() }),
            ),
            RatingError::EmptyPortfolio => ApiResponse::new(
                StatusCode::BAD_REQUEST,
                EMPTY_PORTFOLIO_MSG,
                json!({ "category": self.category(), "errors": [self.to_string()] }),
            ),
            RatingError::Computation(_) => ApiResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                UNEXPECTED_ERROR_MSG,
                json!({}),
            ),
        };
        envelope.into_response()
    }
}

/// Router exposing the rating endpoint.
pub fn rating_router<O>(service: Arc<RatingService<O>>) -> Router
where
    O: RatingObserver + 'static,
{
    Router::new()
        .route(CREDIT_RATING_ENDPOINT, post(rate_handler::<O>))
        .with_state(service)
}

pub(crate) async fn rate_handler<O>(
    State(service): State<Arc<RatingService<O>>>,
    payload: Result<Json<RmbsPayload>, JsonRejection>,
) -> Response
where
    O: RatingObserver + 'static,
{
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected malformed rating payload");
            return ApiResponse::new(
                StatusCode::BAD_REQUEST,
                MALFORMED_PAYLOAD_MSG,
                json!({ "category": "validation_error", "errors": [rejection.body_text()] }),
            )
            .into_response();
        }
    };

    match service.rate_payload(payload) {
        Ok(outcome) => ApiResponse::new(
            StatusCode::OK,
            SUCCESS_MSG,
            json!({ "credit_rating": outcome.rating }),
        )
        .into_response(),
        Err(err) => err.into_response(),
    }
}
