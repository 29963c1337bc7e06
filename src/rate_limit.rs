use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Mutex,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

struct Window {
    started: Instant,
    count: u32,
}

struct Table {
    windows: HashMap<IpAddr, Window>,
    last_pruned: Instant,
}

/// Fixed-window request counter per client IP.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    table: Mutex<Table>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            table: Mutex::new(Table {
                windows: HashMap::new(),
                last_pruned: Instant::now(),
            }),
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn check(&self, ip: IpAddr) -> Decision {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> Decision {
        let mut table = self.table.lock().unwrap_or_else(|p| p.into_inner());

        // At most one sweep per window, however many live clients there are.
        if table.windows.len() >= PRUNE_THRESHOLD
            && now.saturating_duration_since(table.last_pruned) >= self.window
        {
            let window = self.window;
            table
                .windows
                .retain(|_, w| now.saturating_duration_since(w.started) < window);
            table.last_pruned = now;
        }

        let entry = table.windows.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count >= self.max_requests {
            let elapsed = now.duration_since(entry.started);
            return Decision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }
        entry.count += 1;
        Decision::Allowed {
            remaining: self.max_requests - entry.count,
        }
    }
}

fn client_ip(req: &Request) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

pub async fn enforce_rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let ip = client_ip(&req);
    match state.limiter.check(ip) {
        Decision::Allowed { remaining } => {
            let mut res = next.run(req).await;
            let headers = res.headers_mut();
            headers.insert("x-ratelimit-limit", HeaderValue::from(state.limiter.max_requests()));
            headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
            res
        }
        Decision::Limited { retry_after } => {
            warn!(%ip, "rate limit exceeded");
            let mut res = ApiError::RateLimited.into_response();
            // Round up so clients never retry early.
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            res.headers_mut().insert(RETRY_AFTER, HeaderValue::from(secs));
            res
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
    const B: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

    #[test]
    fn limits_per_ip_within_window() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let t0 = Instant::now();
        assert_eq!(limiter.check_at(A, t0), Decision::Allowed { remaining: 1 });
        assert_eq!(limiter.check_at(A, t0), Decision::Allowed { remaining: 0 });
        assert!(matches!(limiter.check_at(A, t0), Decision::Limited { .. }));
        assert_eq!(limiter.check_at(B, t0), Decision::Allowed { remaining: 1 });
    }

    #[test]
    fn window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let t0 = Instant::now();
        limiter.check_at(A, t0);
        match limiter.check_at(A, t0 + Duration::from_secs(20)) {
            Decision::Limited { retry_after } => assert_eq!(retry_after, Duration::from_secs(40)),
            other => panic!("expected limit, got {other:?}"),
        }
        assert_eq!(
            limiter.check_at(A, t0 + Duration::from_secs(60)),
            Decision::Allowed { remaining: 0 }
        );
    }

    fn tracked(limiter: &RateLimiter) -> usize {
        limiter.table.lock().unwrap().windows.len()
    }

    #[test]
    fn prunes_at_most_once_per_window() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        let t0 = Instant::now();
        for i in 0..PRUNE_THRESHOLD as u32 {
            limiter.check_at(IpAddr::V4(Ipv4Addr::from(0x0b00_0000 + i)), t0);
        }
        assert_eq!(tracked(&limiter), PRUNE_THRESHOLD);

        // Table is full but nothing has expired and no window has passed.
        limiter.check_at(B, t0 + Duration::from_secs(1));
        assert_eq!(tracked(&limiter), PRUNE_THRESHOLD + 1);
        limiter.check_at(A, t0 + Duration::from_secs(2));
        assert_eq!(tracked(&limiter), PRUNE_THRESHOLD + 2);

        // A window later every stale entry is swept.
        let later = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1));
        limiter.check_at(later, t0 + Duration::from_secs(62));
        assert_eq!(tracked(&limiter), 1);
    }

    #[tokio::test]
    async fn app_returns_429_past_the_limit() {
        use axum_test::TestServer;
        use std::sync::Arc;

        let mut config = AppState::test_config();
        config.rate_limit.max_requests = 2;
        let state = AppState::fake_with(
            config,
            Arc::new(crate::testing::ScriptedWeather::temperature(20.0)),
        );
        let server = TestServer::new(crate::app::build_app(state)).unwrap();

        let first = server.get("/").await;
        first.assert_status_ok();
        assert_eq!(first.headers().get("x-ratelimit-remaining").unwrap(), "1");
        server.get("/api/crops").await.assert_status_ok();

        let limited = server.get("/").await;
        limited.assert_status(axum::http::StatusCode::TOO_MANY_REQUESTS);
        assert!(limited.headers().contains_key(RETRY_AFTER));
        let body: serde_json::Value = limited.json();
        assert_eq!(body["message"], "Too many requests, please try again later.");
    }
}
