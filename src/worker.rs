use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, make_cache_key};
use crate::error::ApiError;
use crate::metrics::{CACHE_HITS, CACHE_MISSES, CACHE_SIZE};
use crate::models::{AnalyzeResponse, QueuedJob};

/// Upstream chat-completions connection details.
pub struct UpstreamConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
}

// OpenAI-compatible request/response shapes
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    model: String,
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

// Background worker -> processes analysis jobs from the queue one by one.
// Sequential draining keeps at most one upstream call in flight.
pub async fn analysis_worker(
    mut rx: mpsc::Receiver<QueuedJob>,
    client: reqwest::Client,
    upstream: UpstreamConfig,
    ttl: Duration,
) {
    info!("analysis worker started, processing jobs sequentially");

    let cache: DashMap<String, CacheEntry> = DashMap::new();

    while let Some(job) = rx.recv().await {
        let cache_key = make_cache_key(&upstream.model, &job.prompt);

        // check cache first
        if let Some(entry) = cache.get(&cache_key) {
            if entry.created_at.elapsed() < ttl {
                CACHE_HITS.inc();
                debug!("cache hit");
                if let Ok(response) = serde_json::from_str(&entry.response) {
                    let _ = job.response_tx.send(Ok(response));
                    continue;
                }
            }
        }
        CACHE_MISSES.inc();
        debug!("cache miss, calling model API");

        let result = call_upstream(&client, &upstream, &job.prompt).await;

        if let Ok(body) = &result {
            if let Ok(json) = serde_json::to_string(body) {
                cache.insert(
                    cache_key,
                    CacheEntry {
                        response: json,
                        created_at: Instant::now(),
                    },
                );
                CACHE_SIZE.set(cache.len() as f64);
            }
        }

        // Send response back to handler
        let _ = job.response_tx.send(result);
    }
}

async fn call_upstream(
    client: &reqwest::Client,
    upstream: &UpstreamConfig,
    prompt: &str,
) -> Result<AnalyzeResponse, ApiError> {
    let api_key = upstream
        .api_key
        .as_deref()
        .ok_or(ApiError::MissingConfig("OPENAI_API_KEY is not set"))?;

    let body = ChatRequest {
        model: &upstream.model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
    };

    let result = client
        .post(format!("{}/v1/chat/completions", upstream.api_base))
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await;

    let res = match result {
        Ok(res) => res,
        Err(e) => {
            warn!(error = %e, "model API request failed");
            return Err(ApiError::Upstream(format!("request failed: {e}")));
        }
    };

    if !res.status().is_success() {
        let status = res.status();
        warn!(%status, "model API returned an error status");
        return Err(ApiError::Upstream(format!("status {status}")));
    }

    let parsed: ChatResponse = res
        .json()
        .await
        .map_err(|e| ApiError::Upstream(format!("parse error: {e}")))?;

    let analysis = parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| ApiError::Upstream("response contained no choices".to_string()))?;

    Ok(AnalyzeResponse {
        model: parsed.model,
        analysis,
    })
}
