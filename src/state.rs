use tokio::sync::mpsc;

use crate::models::QueuedJob;
use crate::rate_limit::RateLimiter;

// app's shared state
pub struct AppState {
    pub rate_limiter: RateLimiter,
    pub job_tx: mpsc::Sender<QueuedJob>,
}
