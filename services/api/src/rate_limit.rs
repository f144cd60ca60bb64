use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use rmbs_rating::config::RateLimitConfig;
use rmbs_rating::rating::ApiResponse;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::warn;

pub(crate) const TOO_MANY_REQUESTS_MSG: &str = "Too many requests, please try again later.";

/// Number of tracked clients above which expired windows are swept, at most
/// once per window.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    started: Instant,
    requests: u32,
}

#[derive(Debug, Default)]
struct ClientTable {
    windows: HashMap<String, ClientWindow>,
    last_sweep: Option<Instant>,
}

impl ClientTable {
    fn sweep(&mut self, now: Instant, window: Duration) {
        if self.windows.len() <= SWEEP_THRESHOLD {
            return;
        }
        if let Some(last) = self.last_sweep {
            if now.duration_since(last) < window {
                return;
            }
        }
        self.windows.retain(|_, entry| now.duration_since(entry.started) < window);
        self.last_sweep = Some(now);
    }
}

/// Fixed-window request budget per client key.
#[derive(Debug)]
pub(crate) struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: Mutex<ClientTable>,
}

impl RateLimiter {
    pub(crate) fn new(config: RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: config.window,
            clients: Mutex::new(ClientTable::default()),
        }
    }

    /// Count one request for `client`. Returns the time until the window
    /// resets when the budget is already spent.
    pub(crate) fn check(&self, client: &str, now: Instant) -> Result<(), Duration> {
        let mut clients = self
            .clients
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        clients.sweep(now, self.window);

        let entry = clients.windows.entry(client.to_string()).or_insert(ClientWindow {
            started: now,
            requests: 0,
        });

        let elapsed = now.duration_since(entry.started);
        if elapsed >= self.window {
            *entry = ClientWindow {
                started: now,
                requests: 0,
            };
        }

        if entry.requests >= self.max_requests {
            return Err(self.window.saturating_sub(now.duration_since(entry.started)));
        }

        entry.requests += 1;
        Ok(())
    }
}

/// Client identity: first `X-Forwarded-For` hop, then the peer address.
pub(crate) fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub(crate) async fn enforce_rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_key(request.headers(), peer);

    match limiter.check(&client, Instant::now()) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            // Round up so clients never retry inside the current window.
            let seconds = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            warn!(%client, retry_after = seconds, "rate limit exceeded");
            too_many_requests(seconds)
        }
    }
}

fn too_many_requests(retry_after: u64) -> Response {
    let envelope = ApiResponse::new(
        StatusCode::TOO_MANY_REQUESTS,
        TOO_MANY_REQUESTS_MSG,
        json!({ "retry_after": retry_after }),
    );
    let mut response = envelope.into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}
