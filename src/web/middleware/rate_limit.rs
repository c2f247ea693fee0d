//! Per-IP rate limiting for the public endpoints.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    num::NonZeroU32,
    sync::{Arc, Mutex, RwLock},
    time::{Duration, Instant},
};

use crate::config::WebConfig;
use crate::web::error::ApiError;

/// Per-IP rate limiter using Governor.
pub type IpRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Interval between sweeps of idle limiters.
const CLEANUP_INTERVAL_SECS: u64 = 300;

/// Idle time after which a limiter's budget is fully replenished.
const QUOTA_WINDOW: Duration = Duration::from_secs(60);

/// A limiter and the last time it was consulted.
struct TrackedLimiter {
    limiter: IpRateLimiter,
    last_seen: Mutex<Instant>,
}

impl TrackedLimiter {
    fn touch(&self) {
        *self
            .last_seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .elapsed()
    }
}

/// State for rate limiting.
#[derive(Clone)]
pub struct RateLimitState {
    /// Per-IP rate limiters for the public endpoints.
    limiters: Arc<RwLock<HashMap<String, Arc<TrackedLimiter>>>>,
    /// Requests per minute per IP.
    requests_per_minute: u32,
    /// Whether forwarded headers identify the client.
    trust_forwarded_headers: bool,
}

impl RateLimitState {
    /// Create a new rate limit state keyed on the peer address.
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            limiters: Arc::new(RwLock::new(HashMap::new())),
            requests_per_minute,
            trust_forwarded_headers: false,
        }
    }

    /// Create a rate limit state from the web configuration.
    pub fn from_config(config: &WebConfig) -> Self {
        Self::new(config.public_rate_limit).with_forwarded_headers(config.trust_forwarded_headers)
    }

    /// Key on `X-Forwarded-For`/`X-Real-IP` when `trust` is set.
    pub fn with_forwarded_headers(mut self, trust: bool) -> Self {
        self.trust_forwarded_headers = trust;
        self
    }

    /// Get or create a rate limiter for the given IP.
    fn limiter_for(&self, ip: &str) -> Arc<TrackedLimiter> {
        {
            let read_guard = self
                .limiters
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(tracked) = read_guard.get(ip) {
                return tracked.clone();
            }
        }

        let mut write_guard = self
            .limiters
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Double-check after acquiring write lock
        if let Some(tracked) = write_guard.get(ip) {
            return tracked.clone();
        }

        let quota = Quota::per_minute(
            NonZeroU32::new(self.requests_per_minute).unwrap_or(NonZeroU32::MIN),
        );
        let tracked = Arc::new(TrackedLimiter {
            limiter: RateLimiter::direct(quota),
            last_seen: Mutex::new(Instant::now()),
        });
        write_guard.insert(ip.to_string(), tracked.clone());
        tracked
    }

    /// Check if a request from `ip` is allowed.
    pub fn check(&self, ip: &str) -> bool {
        let tracked = self.limiter_for(ip);
        tracked.touch();
        tracked.limiter.check().is_ok()
    }

    /// Number of tracked IPs.
    pub fn tracked(&self) -> usize {
        self.limiters
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Drop limiters idle long enough that their budget has refilled.
    pub fn cleanup(&self) {
        self.cleanup_idle(QUOTA_WINDOW);
    }

    /// Drop limiters not consulted within `max_idle`.
    pub fn cleanup_idle(&self, max_idle: Duration) {
        let mut guard = self
            .limiters
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.retain(|_, tracked| tracked.idle_for() < max_idle);
    }

    /// Start a background task to periodically clean up old entries.
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(CLEANUP_INTERVAL_SECS));
            // Skip the first immediate tick
            interval.tick().await;
            loop {
                interval.tick().await;
                self.cleanup();
            }
        });
    }

    /// Rate limit key for a request.
    pub fn client_key(&self, req: &Request<Body>) -> String {
        get_client_ip(req, self.trust_forwarded_headers)
    }
}

/// Extract client IP from request.
///
/// Forwarded headers are client-controlled, so they are only read when
/// `trust_forwarded` is set.
fn get_client_ip(req: &Request<Body>, trust_forwarded: bool) -> String {
    if trust_forwarded {
        // Take the first IP in the chain
        if let Some(ip) = req
            .headers()
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return ip.to_string();
        }

        if let Some(real_ip) = req
            .headers()
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return real_ip.to_string();
        }
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

/// Rate limiting middleware for the public endpoints.
pub async fn public_rate_limit(
    state: Arc<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = state.client_key(&req);

    if !state.check(&ip) {
        tracing::warn!(ip = %ip, "Public API rate limit exceeded");
        return ApiError::too_many_requests("Too many requests. Please try again later.")
            .into_response();
    }

    next.run(req).await
}
