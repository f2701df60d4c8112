use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::state::AppState;

/// Endpoint groups with independent counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Auth,
    Posts,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    index: u64,
    count: u32,
}

#[derive(Default)]
struct Counters {
    map: HashMap<(IpAddr, Scope), Window>,
    swept_at: u64,
}

/// Fixed-window request counters keyed by client IP and scope.
///
/// The window index is `unix_seconds / window_secs`; counters reset when the
/// index advances, so the limit applies per wall-clock interval rather than
/// per sliding window. Entries left over from earlier windows are swept out
/// the first time a new window is seen, keeping the map bounded by the
/// clients active in the current window.
pub struct RateLimiter {
    counters: RwLock<Counters>,
    window_secs: u64,
}

impl RateLimiter {
    pub fn new(window_secs: u64) -> Self {
        Self {
            counters: RwLock::new(Counters::default()),
            window_secs: window_secs.max(1),
        }
    }

    pub async fn check(&self, addr: IpAddr, scope: Scope, limit: u32) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.check_at(addr, scope, limit, now).await
    }

    async fn check_at(&self, addr: IpAddr, scope: Scope, limit: u32, now: u64) -> bool {
        let index = now / self.window_secs;
        let mut counters = self.counters.write().await;

        if counters.swept_at != index {
            counters.map.retain(|_, w| w.index == index);
            counters.swept_at = index;
        }

        let window = counters
            .map
            .entry((addr, scope))
            .or_insert(Window { index, count: 0 });

        if window.index != index {
            window.index = index;
            window.count = 0;
        }

        if window.count < limit {
            window.count += 1;
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    async fn tracked_keys(&self) -> usize {
        self.counters.read().await.map.len()
    }
}

pub async fn limit_auth(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let limit = state.config.rate_limit.auth_per_window;
    if !state.limiter.check(addr.ip(), Scope::Auth, limit).await {
        tracing::warn!(client = %addr.ip(), "auth rate limit exceeded");
        return Err(ApiError::RateLimited);
    }
    Ok(next.run(req).await)
}

pub async fn limit_posts(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let limit = state.config.rate_limit.posts_per_window;
    if !state.limiter.check(addr.ip(), Scope::Posts, limit).await {
        tracing::warn!(client = %addr.ip(), "posts rate limit exceeded");
        return Err(ApiError::RateLimited);
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[tokio::test]
    async fn allows_up_to_limit_then_denies() {
        let limiter = RateLimiter::new(60);
        for _ in 0..5 {
            assert!(limiter.check_at(ip(1), Scope::Auth, 5, 1_000).await);
        }
        assert!(!limiter.check_at(ip(1), Scope::Auth, 5, 1_000).await);
    }

    #[tokio::test]
    async fn resets_at_window_boundary() {
        let limiter = RateLimiter::new(60);
        for _ in 0..5 {
            assert!(limiter.check_at(ip(1), Scope::Auth, 5, 1_000).await);
        }
        assert!(!limiter.check_at(ip(1), Scope::Auth, 5, 1_019).await);
        // 1_020 / 60 starts the next window
        assert!(limiter.check_at(ip(1), Scope::Auth, 5, 1_020).await);
    }

    #[tokio::test]
    async fn scopes_and_clients_are_independent() {
        let limiter = RateLimiter::new(60);
        for _ in 0..5 {
            assert!(limiter.check_at(ip(1), Scope::Auth, 5, 0).await);
        }
        assert!(!limiter.check_at(ip(1), Scope::Auth, 5, 0).await);
        assert!(limiter.check_at(ip(1), Scope::Posts, 10, 0).await);
        assert!(limiter.check_at(ip(2), Scope::Auth, 5, 0).await);
    }

    #[tokio::test]
    async fn departed_clients_are_swept_on_window_change() {
        let limiter = RateLimiter::new(60);
        limiter.check_at(ip(1), Scope::Auth, 5, 0).await;
        limiter.check_at(ip(2), Scope::Auth, 5, 0).await;
        limiter.check_at(ip(3), Scope::Posts, 10, 0).await;
        assert_eq!(limiter.tracked_keys().await, 3);

        // First call in the next window drops everyone else's counters.
        limiter.check_at(ip(1), Scope::Auth, 5, 60).await;
        assert_eq!(limiter.tracked_keys().await, 1);
    }
}
