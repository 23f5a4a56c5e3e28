use axum::{
    Router,
    routing::{get, post},
};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cache;
mod config;
mod error;
mod handlers;
mod metrics;
mod models;
mod prompt;
mod rate_limit;
mod state;
mod worker;

use config::Args;
use handlers::{analyze_handler, health_handler, metrics_handler};
use models::QueuedJob;
use rate_limit::RateLimiter;
use state::AppState;
use worker::{UpstreamConfig, analysis_worker};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // parse cli arguments
    let args = Args::parse();
    let (job_tx, job_rx) = mpsc::channel::<QueuedJob>(100);

    // creating shared state
    let state = Arc::new(AppState {
        rate_limiter: RateLimiter::new(args.rate_limit, (args.rate_window * 1000) as i64),
        job_tx,
    });

    // spawn the background worker
    let upstream = UpstreamConfig {
        api_base: args.api_base.clone(),
        api_key: Args::api_key(),
        model: args.model.clone(),
    };
    let ttl = Duration::from_secs(args.cache_ttl);
    tokio::spawn(async move {
        analysis_worker(job_rx, reqwest::Client::new(), upstream, ttl).await;
    });

    // creating the router with routes
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!("rankgap running on http://localhost:{}", args.port);
    info!("forwarding prompts to {} (model {})", args.api_base, args.model);
    info!(
        "rate limit: {} requests per {} seconds",
        args.rate_limit, args.rate_window
    );
    if Args::api_key().is_none() {
        tracing::warn!("OPENAI_API_KEY is not set, analysis requests will fail");
    }

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server exited");
        std::process::exit(1);
    }
}
