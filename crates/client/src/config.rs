//! Client configuration resolved from environment variables.
//!
//! | Env Var                    | Default                  |
//! |----------------------------|--------------------------|
//! | `SHORTS_API_BASE_URL`      | `http://localhost:8000`  |
//! | `SHORTS_GENERATE_PATH`     | `/api/shorts/generate/`  |
//! | `SHORTS_REQUEST_TIMEOUT_MS`| `120000`                 |
//! | `SHORTS_POLL_INTERVAL_MS`  | `3000`                   |
//! | `SHORTS_POLL_TIMEOUT_MS`   | `1800000`                |
//!
//! Resolution never fails: a malformed or non-positive override logs a
//! warning and falls back to the default, so the client always starts
//! with a complete configuration.

use std::time::Duration;

/// Base URL used when no override is present.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Path of the job creation endpoint.
pub const DEFAULT_GENERATE_PATH: &str = "/api/shorts/generate/";
/// Per-request HTTP timeout.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 120_000;
/// Delay between status polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;
/// Overall deadline for the poll loop.
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 1_800_000;

/// Resolved endpoint and timing settings for the shorts client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service origin, without a trailing slash requirement.
    pub base_url: String,
    /// Path of the creation endpoint, leading slash optional.
    pub generate_path: String,
    /// Upper bound on any single HTTP request.
    pub request_timeout: Duration,
    /// Sleep between consecutive status fetches.
    pub poll_interval: Duration,
    /// Logical deadline for the whole poll loop.
    pub poll_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            generate_path: DEFAULT_GENERATE_PATH.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            poll_timeout: Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("SHORTS_API_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            generate_path: std::env::var("SHORTS_GENERATE_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GENERATE_PATH.to_string()),
            request_timeout: resolve_ms(
                "SHORTS_REQUEST_TIMEOUT_MS",
                std::env::var("SHORTS_REQUEST_TIMEOUT_MS").ok(),
                DEFAULT_REQUEST_TIMEOUT_MS,
            ),
            poll_interval: resolve_ms(
                "SHORTS_POLL_INTERVAL_MS",
                std::env::var("SHORTS_POLL_INTERVAL_MS").ok(),
                DEFAULT_POLL_INTERVAL_MS,
            ),
            poll_timeout: resolve_ms(
                "SHORTS_POLL_TIMEOUT_MS",
                std::env::var("SHORTS_POLL_TIMEOUT_MS").ok(),
                DEFAULT_POLL_TIMEOUT_MS,
            ),
        }
    }

    /// Absolute URL of the job creation endpoint.
    pub fn generate_url(&self) -> String {
        join_url(&self.base_url, &self.generate_path)
    }

    /// Absolute URL of the status endpoint for one job.
    pub fn short_url(&self, id: i64) -> String {
        join_url(&self.base_url, &format!("/api/shorts/{id}/"))
    }
}

/// Resolve one millisecond setting from an optional override.
///
/// The override wins only if it parses to a positive integer; anything
/// else logs a warning and keeps the default.
fn resolve_ms(name: &str, raw: Option<String>, default_ms: u64) -> Duration {
    let ms = match raw {
        None => default_ms,
        Some(value) => match value.trim().parse::<u64>() {
            Ok(parsed) if parsed > 0 => parsed,
            _ => {
                tracing::warn!(
                    setting = name,
                    value = %value,
                    default_ms,
                    "Invalid timing override, using default",
                );
                default_ms
            }
        },
    };
    Duration::from_millis(ms)
}

/// Join a base URL and a path, normalising the slash between them.
fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.generate_path, "/api/shorts/generate/");
        assert_eq!(config.request_timeout, Duration::from_millis(120_000));
        assert_eq!(config.poll_interval, Duration::from_millis(3_000));
        assert_eq!(config.poll_timeout, Duration::from_millis(1_800_000));
    }

    #[test]
    fn resolve_ms_uses_valid_override() {
        let d = resolve_ms("X", Some("5000".to_string()), 3_000);
        assert_eq!(d, Duration::from_millis(5_000));
    }

    #[test]
    fn resolve_ms_falls_back_when_absent() {
        let d = resolve_ms("X", None, 3_000);
        assert_eq!(d, Duration::from_millis(3_000));
    }

    #[test]
    fn resolve_ms_rejects_garbage() {
        let d = resolve_ms("X", Some("soon".to_string()), 3_000);
        assert_eq!(d, Duration::from_millis(3_000));
    }

    #[test]
    fn resolve_ms_rejects_zero_and_negative() {
        assert_eq!(resolve_ms("X", Some("0".into()), 3_000), Duration::from_millis(3_000));
        assert_eq!(resolve_ms("X", Some("-200".into()), 3_000), Duration::from_millis(3_000));
    }

    #[test]
    fn join_url_normalises_slashes() {
        assert_eq!(
            join_url("http://localhost:8000/", "/api/shorts/generate/"),
            "http://localhost:8000/api/shorts/generate/"
        );
        assert_eq!(
            join_url("http://localhost:8000", "api/shorts/generate/"),
            "http://localhost:8000/api/shorts/generate/"
        );
    }

    #[test]
    fn short_url_embeds_id() {
        let config = ClientConfig::default();
        assert_eq!(config.short_url(42), "http://localhost:8000/api/shorts/42/");
    }
}
