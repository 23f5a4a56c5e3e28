use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::ApiError;

// Analysis request payload
#[derive(Deserialize, Serialize, Clone)]
pub struct AnalyzeRequest {
    pub keyword: String,
    pub city: String,
    pub state: String,
    // the page currently outranking the caller
    pub top_url: String,
    // the caller's own page to improve
    pub target_url: String,
    // also ask the model for a rewritten content draft
    #[serde(default)]
    pub include_rewrite: bool,
}

impl AnalyzeRequest {
    /// All five text fields are required and must be non-blank.
    /// Returns the name of the first missing field.
    pub fn validate(&self) -> Result<(), ApiError> {
        for (name, value) in [
            ("keyword", &self.keyword),
            ("city", &self.city),
            ("state", &self.state),
            ("top_url", &self.top_url),
            ("target_url", &self.target_url),
        ] {
            if value.trim().is_empty() {
                return Err(ApiError::MissingField(name));
            }
        }
        Ok(())
    }
}

// Response relayed back to the caller
#[derive(Deserialize, Serialize, Clone)]
pub struct AnalyzeResponse {
    pub model: String,
    pub analysis: String,
}

// Queued job - holds the prompt + response channel
pub struct QueuedJob {
    pub prompt: String,
    pub response_tx: oneshot::Sender<Result<AnalyzeResponse, ApiError>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> AnalyzeRequest {
        AnalyzeRequest {
            keyword: "emergency plumber".into(),
            city: "Austin".into(),
            state: "TX".into(),
            top_url: "https://rival.example/plumbing".into(),
            target_url: "https://mine.example/services".into(),
            include_rewrite: false,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn blank_keyword_is_named() {
        let mut req = valid_request();
        req.keyword = "   ".into();
        match req.validate() {
            Err(ApiError::MissingField(name)) => assert_eq!(name, "keyword"),
            other => panic!("expected MissingField, got {:?}", other.err()),
        }
    }

    #[test]
    fn each_field_is_checked() {
        for field in ["keyword", "city", "state", "top_url", "target_url"] {
            let mut req = valid_request();
            match field {
                "keyword" => req.keyword = String::new(),
                "city" => req.city = String::new(),
                "state" => req.state = String::new(),
                "top_url" => req.top_url = String::new(),
                _ => req.target_url = String::new(),
            }
            match req.validate() {
                Err(ApiError::MissingField(name)) => assert_eq!(name, field),
                other => panic!("expected MissingField, got {:?}", other.err()),
            }
        }
    }

    #[test]
    fn include_rewrite_defaults_off() {
        let req: AnalyzeRequest = serde_json::from_str(
            r#"{"keyword":"k","city":"c","state":"s","top_url":"u1","target_url":"u2"}"#,
        )
        .unwrap();
        assert!(!req.include_rewrite);
    }
}
