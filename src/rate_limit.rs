use dashmap::DashMap;

/// Sliding-window rate limiter keyed by caller identity.
///
/// Each identity maps to the epoch-millisecond timestamps of its admitted
/// requests inside the trailing window. Rejected attempts are never
/// recorded, so hammering the endpoint while over quota does not push the
/// reset further out.
pub struct RateLimiter {
    entries: DashMap<String, Vec<i64>>,
    quota: usize,
    window_ms: i64,
}

impl RateLimiter {
    pub fn new(quota: usize, window_ms: i64) -> Self {
        Self {
            entries: DashMap::new(),
            quota,
            window_ms,
        }
    }

    /// Check against the wall clock.
    pub fn check(&self, identity: &str) -> bool {
        self.check_at(identity, chrono::Utc::now().timestamp_millis())
    }

    /// Check at an explicit timestamp (milliseconds since epoch).
    ///
    /// Admits and records `now_ms` if the identity has fewer than `quota`
    /// admitted requests newer than `now_ms - window_ms`, otherwise rejects
    /// without touching stored state. The whole read-modify-write runs under
    /// the DashMap entry guard, so parallel requests for the same identity
    /// cannot race past the quota.
    pub fn check_at(&self, identity: &str, now_ms: i64) -> bool {
        let cutoff = now_ms - self.window_ms;

        let mut entry = self.entries.entry(identity.to_string()).or_default();

        let in_window = entry.iter().filter(|&&ts| ts > cutoff).count();
        if in_window >= self.quota {
            return false;
        }

        entry.retain(|&ts| ts > cutoff);
        entry.push(now_ms);
        true
    }
}
