//! `shorts-cli` -- submit one generation job and watch it to completion.
//!
//! Usage: `shorts <youtube_url> <duration_secs> [start_time_secs]`
//!
//! # Environment variables
//!
//! | Variable                    | Required | Default                 |
//! |-----------------------------|----------|-------------------------|
//! | `SHORTS_API_BASE_URL`       | no       | `http://localhost:8000` |
//! | `SHORTS_GENERATE_PATH`      | no       | `/api/shorts/generate/` |
//! | `SHORTS_REQUEST_TIMEOUT_MS` | no       | `120000`                |
//! | `SHORTS_POLL_INTERVAL_MS`   | no       | `3000`                  |
//! | `SHORTS_POLL_TIMEOUT_MS`    | no       | `1800000`               |

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shorts_client::{ClientConfig, GenerateController, ShortsApi};
use shorts_core::GenerationRequest;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shorts_cli=info,shorts_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let request = parse_args(std::env::args().skip(1).collect())?;

    let config = ClientConfig::from_env();
    tracing::info!(
        base_url = %config.base_url,
        poll_interval_ms = config.poll_interval.as_millis() as u64,
        "Submitting generation request",
    );

    let transport = Arc::new(ShortsApi::new(config.clone()));
    let controller = GenerateController::new(transport, &config);

    // Print status transitions while the submission runs.
    let mut rx = controller.subscribe();
    let watcher = tokio::spawn(async move {
        let mut last_status: Option<String> = None;
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            if let Some(job) = &state.job {
                let status = job.status.to_string();
                if last_status.as_deref() != Some(&status) {
                    tracing::info!(id = job.id, %status, "Job update");
                    last_status = Some(status);
                }
            }
        }
    });

    controller.submit(request).await;
    watcher.abort();

    let state = controller.state();
    if let Some(error) = state.error {
        bail!("generation failed: {error}");
    }
    match state.job.and_then(|job| job.file_url) {
        Some(file_url) => println!("{file_url}"),
        None => tracing::warn!("Job completed but no file URL was reported"),
    }
    Ok(())
}

/// Parse and validate positional arguments into a request payload.
///
/// The controller only accepts pre-validated requests, so argument
/// checks happen here.
fn parse_args(args: Vec<String>) -> anyhow::Result<GenerationRequest> {
    if args.len() < 2 || args.len() > 3 {
        bail!("usage: shorts <youtube_url> <duration_secs> [start_time_secs]");
    }

    let youtube_url = args[0].clone();
    if !youtube_url.starts_with("http://") && !youtube_url.starts_with("https://") {
        bail!("<youtube_url> must be an http(s) URL");
    }

    let duration: u32 = args[1]
        .parse()
        .context("<duration_secs> must be a positive integer")?;
    if duration == 0 {
        bail!("<duration_secs> must be greater than zero");
    }

    let start_time = match args.get(2) {
        None => None,
        Some(raw) => {
            let parsed: f64 = raw
                .parse()
                .context("[start_time_secs] must be a number")?;
            if !parsed.is_finite() || parsed < 0.0 {
                bail!("[start_time_secs] must be non-negative");
            }
            Some(parsed)
        }
    };

    Ok(GenerationRequest {
        youtube_url,
        duration,
        start_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_url_and_duration() {
        let request = parse_args(args(&["https://youtu.be/abc", "30"])).unwrap();
        assert_eq!(request.youtube_url, "https://youtu.be/abc");
        assert_eq!(request.duration, 30);
        assert_eq!(request.start_time, None);
    }

    #[test]
    fn parses_optional_start_time() {
        let request = parse_args(args(&["https://youtu.be/abc", "30", "12.5"])).unwrap();
        assert_eq!(request.start_time, Some(12.5));
    }

    #[test]
    fn rejects_zero_duration() {
        assert!(parse_args(args(&["https://youtu.be/abc", "0"])).is_err());
    }

    #[test]
    fn rejects_negative_start_time() {
        assert!(parse_args(args(&["https://youtu.be/abc", "30", "-1"])).is_err());
    }

    #[test]
    fn rejects_non_url_source() {
        assert!(parse_args(args(&["abc", "30"])).is_err());
    }

    #[test]
    fn rejects_missing_arguments() {
        assert!(parse_args(args(&["https://youtu.be/abc"])).is_err());
    }
}
