//! Inbound throttle for the assistant endpoint.
//!
//! DESIGN
//! ======
//! Each limit is a [`WindowLimit`]: at most `max` admissions inside any
//! trailing `span`. The limiter keeps one timestamp queue per remote address
//! and one shared queue for all visitors:
//! - Per-client: 10 assistant requests/min per remote address
//! - Global: 30 assistant requests/min across all visitors
//!
//! A refused request never reaches the credential ring, so one noisy address
//! cannot spend the provider quota for everyone else.

use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::config::env_parse;
use crate::error::ErrorCode;

const DEFAULT_PER_CLIENT_MAX: usize = 10;
const DEFAULT_GLOBAL_MAX: usize = 30;
const DEFAULT_WINDOW_SECS: u64 = 60;

/// Sweep idle addresses once this many are tracked.
const SWEEP_CLIENTS_ABOVE: usize = 4_096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLimit {
    pub max: usize,
    pub span: Duration,
}

impl WindowLimit {
    #[must_use]
    pub fn per_minute(max: usize) -> Self {
        Self { max, span: Duration::from_secs(DEFAULT_WINDOW_SECS) }
    }

    fn from_env(max_var: &str, span_var: &str, default_max: usize) -> Self {
        Self {
            max: env_parse(max_var, default_max),
            span: Duration::from_secs(env_parse(span_var, DEFAULT_WINDOW_SECS)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub per_client: WindowLimit,
    pub global: WindowLimit,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_client: WindowLimit::per_minute(DEFAULT_PER_CLIENT_MAX),
            global: WindowLimit::per_minute(DEFAULT_GLOBAL_MAX),
        }
    }
}

impl RateLimitConfig {
    /// Optional: `RATE_LIMIT_PER_CLIENT`, `RATE_LIMIT_PER_CLIENT_WINDOW_SECS`,
    /// `RATE_LIMIT_GLOBAL`, `RATE_LIMIT_GLOBAL_WINDOW_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            per_client: WindowLimit::from_env(
                "RATE_LIMIT_PER_CLIENT",
                "RATE_LIMIT_PER_CLIENT_WINDOW_SECS",
                DEFAULT_PER_CLIENT_MAX,
            ),
            global: WindowLimit::from_env("RATE_LIMIT_GLOBAL", "RATE_LIMIT_GLOBAL_WINDOW_SECS", DEFAULT_GLOBAL_MAX),
        }
    }
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitScope {
    Client,
    Global,
}

#[derive(Debug, thiserror::Error)]
#[error("{scope:?} limit reached: {max} requests per {}s", .span.as_secs())]
pub struct RateLimitError {
    pub scope: LimitScope,
    pub max: usize,
    pub span: Duration,
}

impl ErrorCode for RateLimitError {
    fn error_code(&self) -> &'static str {
        match self.scope {
            LimitScope::Client => "E_CLIENT_RATE_LIMITED",
            LimitScope::Global => "E_GLOBAL_RATE_LIMITED",
        }
    }

    fn retryable(&self) -> bool {
        true
    }
}

// =============================================================================
// RATE LIMITER
// =============================================================================

#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Arc<Mutex<Windows>>,
}

#[derive(Default)]
struct Windows {
    clients: HashMap<IpAddr, VecDeque<Instant>>,
    everyone: VecDeque<Instant>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self { config, windows: Arc::new(Mutex::new(Windows::default())) }
    }

    /// Admit one request from `client`, or refuse it without recording.
    ///
    /// # Errors
    ///
    /// Returns the global refusal first, then the per-client one.
    pub fn check_and_record(&self, client: IpAddr) -> Result<(), RateLimitError> {
        self.check_and_record_at(client, Instant::now())
    }

    fn check_and_record_at(&self, client: IpAddr, now: Instant) -> Result<(), RateLimitError> {
        let RateLimitConfig { per_client, global } = self.config;
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if is_full(&mut windows.everyone, now, global) {
            return Err(refusal(LimitScope::Global, global));
        }

        if windows.clients.len() > SWEEP_CLIENTS_ABOVE {
            windows.clients.retain(|_, hits| !is_idle(hits, now, per_client.span));
        }

        let hits = windows.clients.entry(client).or_default();
        if is_full(hits, now, per_client) {
            return Err(refusal(LimitScope::Client, per_client));
        }
        hits.push_back(now);
        windows.everyone.push_back(now);
        Ok(())
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clients
            .len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Drop hits older than `span`. A hit exactly `span` old still counts.
fn expire(hits: &mut VecDeque<Instant>, now: Instant, span: Duration) {
    while hits.front().is_some_and(|&hit| now.duration_since(hit) > span) {
        hits.pop_front();
    }
}

fn is_full(hits: &mut VecDeque<Instant>, now: Instant, limit: WindowLimit) -> bool {
    expire(hits, now, limit.span);
    hits.len() >= limit.max
}

fn is_idle(hits: &mut VecDeque<Instant>, now: Instant, span: Duration) -> bool {
    expire(hits, now, span);
    hits.is_empty()
}

fn refusal(scope: LimitScope, limit: WindowLimit) -> RateLimitError {
    RateLimitError { scope, max: limit.max, span: limit.span }
}

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
