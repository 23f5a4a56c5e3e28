use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failure categories surfaced to callers. The rate limiter itself never
/// fails; `RateLimited` is the handler translating its boolean rejection.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Rate limit exceeded. Try again later.")]
    RateLimited,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Server misconfigured: {0}")]
    MissingConfig(&'static str),

    #[error("Upstream model API error: {0}")]
    Upstream(String),

    #[error("Request queue unavailable")]
    QueueClosed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::QueueClosed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_are_distinct_per_category() {
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::MissingField("keyword").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::MissingConfig("OPENAI_API_KEY").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Upstream("timeout".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn missing_field_message_names_the_field() {
        assert_eq!(
            ApiError::MissingField("city").to_string(),
            "Missing required field: city"
        );
    }
}
