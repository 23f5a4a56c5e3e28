use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::metrics::{RATE_LIMITED_TOTAL, REQUEST_LATENCY, REQUEST_TOTAL};
use crate::models::{AnalyzeRequest, AnalyzeResponse, QueuedJob};
use crate::prompt::build_prompt;
use crate::state::AppState;

/// Caller identity for rate limiting: first hop of `x-forwarded-for`,
/// or the shared `"unknown"` bucket when the header is absent/garbled.
fn client_identity(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    REQUEST_TOTAL.inc();

    // rate limit before any other work
    let identity = client_identity(&headers);
    if !state.rate_limiter.check(&identity) {
        RATE_LIMITED_TOTAL.inc();
        warn!(%identity, "rate limit exceeded");
        return Err(ApiError::RateLimited);
    }

    payload.validate()?;

    let prompt = build_prompt(&payload);
    debug!(%identity, keyword = %payload.keyword, "queueing analysis");

    let start_time = Instant::now();

    let (response_tx, response_rx) = oneshot::channel();

    let job = QueuedJob {
        prompt,
        response_tx,
    };

    state
        .job_tx
        .send(job)
        .await
        .map_err(|_| ApiError::QueueClosed)?;

    let result = response_rx.await.map_err(|_| ApiError::QueueClosed)?;

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    result.map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn identity_takes_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.2"),
        );
        assert_eq!(client_identity(&headers), "203.0.113.7");
    }

    #[test]
    fn missing_header_falls_back_to_unknown() {
        assert_eq!(client_identity(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn unreadable_header_falls_back_to_unknown() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_bytes(b"\xff\xfe").unwrap(),
        );
        assert_eq!(client_identity(&headers), "unknown");
    }

    #[test]
    fn blank_header_falls_back_to_unknown() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("   "));
        assert_eq!(client_identity(&headers), "unknown");
    }
}
