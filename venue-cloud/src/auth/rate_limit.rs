//! Application-layer rate limiting for login and password reset routes
//!
//! Counters live in process memory, keyed by `(action, identity)`. A counter
//! is reset lazily by the first attempt after its window expires. State is
//! lost on restart and is not shared between instances, so this throttles
//! brute force on a single node and nothing more.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, FromRequestParts};
use http::request::Parts;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Expired counters of an action are swept at most this often
const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Attempt budget for one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Attempts allowed per window
    pub max_attempts: u32,
    /// Window length, measured from the first attempt
    pub window: Duration,
}

/// Result of a single [`RateLimiter::attempt`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitOutcome {
    pub success: bool,
    /// Seconds until the window resets (rounded up); 0 when allowed
    pub reset_in: u64,
}

struct Counter {
    count: u32,
    expires_at: Instant,
}

/// Counters of one action, keyed by identity
struct ActionCounters {
    counters: HashMap<String, Counter>,
    next_prune: Instant,
}

impl ActionCounters {
    fn new(now: Instant) -> Self {
        Self {
            counters: HashMap::new(),
            next_prune: now + PRUNE_INTERVAL,
        }
    }

    /// Drop expired counters once per [`PRUNE_INTERVAL`]
    fn prune(&mut self, now: Instant) {
        if now < self.next_prune {
            return;
        }
        self.counters.retain(|_, c| c.expires_at > now);
        self.next_prune = now + PRUNE_INTERVAL;
    }
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    inner: Arc<Mutex<HashMap<&'static str, ActionCounters>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one attempt for `(identity, action)` and decide whether it is allowed.
    pub async fn attempt(
        &self,
        identity: &str,
        action: &'static str,
        config: &RateLimitConfig,
    ) -> RateLimitOutcome {
        let mut map = self.inner.lock().await;
        let now = Instant::now();
        let action_counters = map
            .entry(action)
            .or_insert_with(|| ActionCounters::new(now));
        action_counters.prune(now);
        let counters = &mut action_counters.counters;

        match counters.get_mut(identity) {
            Some(counter) if counter.expires_at > now => {
                counter.count = counter.count.saturating_add(1);
                if counter.count > config.max_attempts {
                    let remaining = counter.expires_at.saturating_duration_since(now);
                    let reset_in = remaining.as_millis().div_ceil(1000).max(1) as u64;
                    return RateLimitOutcome {
                        success: false,
                        reset_in,
                    };
                }
            }
            _ => {
                counters.insert(
                    identity.to_owned(),
                    Counter {
                        count: 1,
                        expires_at: now + config.window,
                    },
                );
            }
        }

        RateLimitOutcome {
            success: true,
            reset_in: 0,
        }
    }
}

#[cfg(test)]
impl RateLimiter {
    /// Counters currently held for `action`, expired ones included
    async fn tracked(&self, action: &'static str) -> usize {
        self.inner
            .lock()
            .await
            .get(action)
            .map_or(0, |a| a.counters.len())
    }
}

/// Client IP: X-Forwarded-For first (load balancer), then the peer address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(forwarded) = parts.headers.get("x-forwarded-for")
            && let Ok(val) = forwarded.to_str()
        {
            // X-Forwarded-For can be comma-separated; first entry is the original client
            if let Some(first) = val.split(',').next() {
                let ip = first.trim();
                if !ip.is_empty() {
                    return Ok(Self(ip.to_owned()));
                }
            }
        }

        Ok(Self(
            parts
                .extensions
                .get::<ConnectInfo<std::net::SocketAddr>>()
                .map(|ci| ci.0.ip().to_string())
                .unwrap_or_else(|| "unknown".to_owned()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_per_minute() -> RateLimitConfig {
        RateLimitConfig {
            max_attempts: 5,
            window: Duration::from_secs(60),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_allows_up_to_max_attempts() {
        let limiter = RateLimiter::new();
        for _ in 0..5 {
            let outcome = limiter
                .attempt("a@b.com", "admin_login", &five_per_minute())
                .await;
            assert!(outcome.success);
            assert_eq!(outcome.reset_in, 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sixth_attempt_is_rejected_with_positive_reset() {
        let limiter = RateLimiter::new();
        for _ in 0..5 {
            limiter
                .attempt("a@b.com", "admin_login", &five_per_minute())
                .await;
        }
        tokio::time::advance(Duration::from_millis(20_500)).await;

        let outcome = limiter
            .attempt("a@b.com", "admin_login", &five_per_minute())
            .await;
        assert!(!outcome.success);
        // 39.5s left, rounded up
        assert_eq!(outcome.reset_in, 40);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_expiry_resets_counter() {
        let limiter = RateLimiter::new();
        for _ in 0..6 {
            limiter
                .attempt("10.0.0.1", "admin_login", &five_per_minute())
                .await;
        }
        tokio::time::advance(Duration::from_secs(60)).await;

        let outcome = limiter
            .attempt("10.0.0.1", "admin_login", &five_per_minute())
            .await;
        assert!(outcome.success);

        // Fresh window: four more are fine, the sixth is not
        for _ in 0..4 {
            assert!(
                limiter
                    .attempt("10.0.0.1", "admin_login", &five_per_minute())
                    .await
                    .success
            );
        }
        assert!(
            !limiter
                .attempt("10.0.0.1", "admin_login", &five_per_minute())
                .await
                .success
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_identities_and_actions_are_independent() {
        let limiter = RateLimiter::new();
        let config = RateLimitConfig {
            max_attempts: 1,
            window: Duration::from_secs(60),
        };

        assert!(limiter.attempt("ip:1", "admin_login", &config).await.success);
        assert!(!limiter.attempt("ip:1", "admin_login", &config).await.success);

        assert!(limiter.attempt("ip:2", "admin_login", &config).await.success);
        assert!(limiter.attempt("ip:1", "password_reset", &config).await.success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_in_is_at_least_one_second() {
        let limiter = RateLimiter::new();
        let config = RateLimitConfig {
            max_attempts: 1,
            window: Duration::from_millis(1500),
        };
        limiter.attempt("k", "a", &config).await;
        tokio::time::advance(Duration::from_millis(1400)).await;

        let outcome = limiter.attempt("k", "a", &config).await;
        assert!(!outcome.success);
        assert_eq!(outcome.reset_in, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_counters_are_swept_once_per_interval() {
        let limiter = RateLimiter::new();
        let config = RateLimitConfig {
            max_attempts: 5,
            window: Duration::from_secs(10),
        };
        for i in 0..100 {
            limiter.attempt(&format!("ip:{i}"), "admin_login", &config).await;
        }
        assert_eq!(limiter.tracked("admin_login").await, 100);

        // Windows are over but the sweep interval is not
        tokio::time::advance(Duration::from_secs(30)).await;
        limiter.attempt("ip:fresh", "admin_login", &config).await;
        assert_eq!(limiter.tracked("admin_login").await, 101);

        tokio::time::advance(PRUNE_INTERVAL).await;
        limiter.attempt("ip:later", "admin_login", &config).await;
        assert_eq!(limiter.tracked("admin_login").await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_attempts_are_not_lost() {
        let limiter = RateLimiter::new();
        let config = RateLimitConfig {
            max_attempts: 50,
            window: Duration::from_secs(600),
        };

        let mut handles = Vec::new();
        for _ in 0..100 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                limiter.attempt("shared", "admin_login", &config).await.success
            }));
        }

        let mut allowed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 50);
    }

    #[tokio::test]
    async fn test_client_ip_prefers_forwarded_header() {
        let request = http::Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        let ClientIp(ip) = ClientIp::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ip, "203.0.113.7");
    }

    #[tokio::test]
    async fn test_client_ip_falls_back_to_unknown() {
        let request = http::Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        let ClientIp(ip) = ClientIp::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ip, "unknown");
    }
}
