use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::AppState;

/// Fixed-window limiter keyed by client and path. In-memory, so limits are
/// per process.
#[derive(Clone)]
pub struct RateLimitState {
    entries: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
    max_requests: u32,
    window: Duration,
}

struct RateLimitEntry {
    count: u32,
    window_start: Instant,
}

impl RateLimitState {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    /// Returns `Ok(remaining)` or `Err(retry_after)` once the window is exhausted.
    pub async fn check(&self, key: &str) -> Result<u32, Duration> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let entry = entries.entry(key.to_string()).or_insert(RateLimitEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) > self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= self.max_requests {
            let retry_after = self
                .window
                .saturating_sub(now.duration_since(entry.window_start));
            return Err(retry_after);
        }

        entry.count += 1;
        Ok(self.max_requests - entry.count)
    }

    /// Drops entries whose window ended long ago.
    pub async fn cleanup(&self) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let keep_for = self.window * 2;

        entries.retain(|_, entry| now.duration_since(entry.window_start) < keep_for);
    }

    pub fn spawn_cleanup_worker(&self) {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(limiter.window.max(Duration::from_secs(1)) * 2);
            loop {
                ticker.tick().await;
                limiter.cleanup().await;
            }
        });
    }
}

/// Rate limiting for register/login.
pub async fn rate_limit_auth(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".into());
    let path = req.uri().path().to_string();

    // Separate budgets for /login and /register
    let key = format!("{}:{}", ip, path);

    match state.rate_limiter.check(&key).await {
        Ok(remaining) => {
            tracing::debug!(ip = %ip, path = %path, remaining = remaining, "Rate limit check passed");
            Ok(next.run(req).await)
        }
        Err(retry_after) => {
            tracing::warn!(
                ip = %ip,
                path = %path,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            Err(AppError::RateLimited)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u32 = 5;

    fn limiter() -> RateLimitState {
        RateLimitState::new(MAX, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_rate_limit_allows_under_limit() {
        let limiter = limiter();

        for i in 0..MAX {
            let result = limiter.check("test_key").await;
            assert!(result.is_ok(), "Request {} should be allowed", i + 1);
        }
    }

    #[tokio::test]
    async fn test_rate_limit_blocks_over_limit() {
        let limiter = limiter();

        for _ in 0..MAX {
            let _ = limiter.check("test_key").await;
        }

        let result = limiter.check("test_key").await;
        assert!(result.is_err(), "Request over limit should be blocked");
    }

    #[tokio::test]
    async fn test_different_keys_have_separate_limits() {
        let limiter = limiter();

        for _ in 0..MAX {
            let _ = limiter.check("key1").await;
        }

        let result = limiter.check("key2").await;
        assert!(result.is_ok(), "Different key should have separate limit");
    }

    #[tokio::test]
    async fn test_window_expiry_resets_count() {
        let limiter = RateLimitState::new(1, Duration::from_millis(20));
        assert!(limiter.check("k").await.is_ok());
        assert!(limiter.check("k").await.is_err());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(limiter.check("k").await.is_ok());
    }
}
