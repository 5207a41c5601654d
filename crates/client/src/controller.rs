//! Submission-and-polling controller for a single generation job.
//!
//! [`GenerateController`] owns the lifecycle of one in-flight job: it
//! creates the job over HTTP, then polls its status at a fixed interval
//! until the service reports `completed` or `failed`, or the poll
//! deadline passes. Progress is published through a [`watch`] channel as
//! a [`ControllerState`] tuple that presentation code renders directly.
//!
//! Supersession is cooperative. Every `submit` (and `reset`) mints a new
//! request token from a monotonic counter; each asynchronous step
//! re-checks that its captured token is still current before touching
//! shared state. A continuation holding a stale token exits silently --
//! no cancellation signal is sent, an in-flight request or sleep simply
//! finds its result unwanted when it resumes. State mutations go through
//! a single `send_modify` with the token re-checked inside the closure,
//! so check-and-mutate is atomic and no stale snapshot can overwrite a
//! fresher one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use shorts_core::{ControllerState, GenerationRequest, JobStatus, ShortJob};

use crate::api::{Transport, TransportError};
use crate::config::ClientConfig;

/// Message shown when the poll deadline passes without a terminal status.
pub const TIMEOUT_MESSAGE: &str =
    "Timed out while waiting for the short to finish processing.";

/// Ways a submission chain can end without a terminal job snapshot.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// A create or poll request failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The poll deadline passed before the job reached a terminal status.
    #[error("poll deadline exceeded before job completion")]
    TimedOut,

    /// A newer request took over; this chain's result was discarded.
    /// Never surfaced to the presentation layer.
    #[error("superseded by a newer request")]
    Superseded,
}

/// Drives one logical generation job at a time.
///
/// Cheap to share: submission runs on the caller's task, state flows out
/// through [`subscribe`](Self::subscribe), and a later `submit` or
/// [`reset`](Self::reset) supersedes whatever is in flight.
pub struct GenerateController {
    transport: Arc<dyn Transport>,
    poll_interval: Duration,
    poll_timeout: Duration,
    /// Monotonic token counter; the latest minted value is "current".
    token: AtomicU64,
    state: watch::Sender<ControllerState>,
}

impl GenerateController {
    /// Create a controller in the idle state.
    pub fn new(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        let (state, _) = watch::channel(ControllerState::default());
        Self {
            transport,
            poll_interval: config.poll_interval,
            poll_timeout: config.poll_timeout,
            token: AtomicU64::new(0),
            state,
        }
    }

    /// Snapshot of the current controller state.
    pub fn state(&self) -> ControllerState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.state.subscribe()
    }

    /// Submit a pre-validated generation request and drive it to rest.
    ///
    /// Returns once the job reaches a terminal status, the submission
    /// fails, the poll deadline passes, or a newer request supersedes
    /// this one. All outcomes are published through the state channel;
    /// a superseded chain publishes nothing.
    pub async fn submit(&self, request: GenerationRequest) {
        let token = self.mint_token();
        self.update_if_current(token, |state| {
            state.is_loading = true;
            state.error = None;
        });

        match self.run_submission(token, &request).await {
            Ok(()) => {}
            Err(GenerateError::Superseded) => {
                tracing::debug!(token, "Submission superseded by a newer request");
            }
            Err(GenerateError::Transport(e)) => {
                self.fail(token, e.user_message(), &e);
            }
            Err(e @ GenerateError::TimedOut) => {
                self.fail(token, TIMEOUT_MESSAGE.to_string(), &e);
            }
        }

        // Counterpart of the create/poll loading flag above; a stale
        // token means a newer submission owns the flag now.
        self.update_if_current(token, |state| state.is_loading = false);
    }

    /// Drop any in-flight work and return to the idle state.
    ///
    /// Synchronous and idempotent: the new token strands every earlier
    /// continuation, and the published state is always the default.
    pub fn reset(&self) {
        self.mint_token();
        self.state.send_replace(ControllerState::default());
        tracing::debug!("Controller reset to idle");
    }

    /// Publish a failure outcome, unless a newer request owns the state.
    ///
    /// `message` is always a non-empty user-facing sentence; superseded
    /// chains never reach this path.
    fn fail(&self, token: u64, message: String, error: &dyn std::fmt::Display) {
        tracing::warn!(token, error = %error, "Short generation failed");
        self.update_if_current(token, |state| {
            state.job = None;
            state.error = Some(message);
        });
    }

    /// Create the job and, when necessary, poll it to a terminal status.
    async fn run_submission(
        &self,
        token: u64,
        request: &GenerationRequest,
    ) -> Result<(), GenerateError> {
        let created = self.transport.create_short(request).await?;
        if !self.update_if_current(token, |state| state.job = Some(created.clone())) {
            return Err(GenerateError::Superseded);
        }

        let job = if created.status.is_terminal() {
            created
        } else {
            self.poll_until_terminal(token, created.id).await?
        };

        self.update_if_current(token, |state| {
            state.is_loading = false;
            if job.status == JobStatus::Failed && !job.error_message.is_empty() {
                state.error = Some(job.error_message.clone());
            }
        });
        Ok(())
    }

    /// Poll the job at a fixed interval until it reaches a terminal
    /// status or the deadline passes.
    ///
    /// Every snapshot is published, terminal or not, so observers can
    /// show intermediate progress. Poll request failures propagate; they
    /// are not swallowed.
    async fn poll_until_terminal(
        &self,
        token: u64,
        id: i64,
    ) -> Result<ShortJob, GenerateError> {
        let deadline = Instant::now() + self.poll_timeout;

        while Instant::now() < deadline {
            tokio::time::sleep(self.poll_interval).await;

            if !self.is_current(token) {
                return Err(GenerateError::Superseded);
            }

            let latest = self.transport.fetch_short(id).await?;
            if !self.update_if_current(token, |state| state.job = Some(latest.clone())) {
                return Err(GenerateError::Superseded);
            }

            if latest.status.is_terminal() {
                tracing::info!(id, status = %latest.status, "Job reached terminal status");
                return Ok(latest);
            }
            tracing::debug!(id, status = %latest.status, "Job still in progress");
        }

        tracing::warn!(id, "Poll deadline exceeded");
        Err(GenerateError::TimedOut)
    }

    /// Mint a fresh token, making it the current one.
    fn mint_token(&self) -> u64 {
        self.token.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.token.load(Ordering::SeqCst) == token
    }

    /// Apply a state mutation only if `token` is still current.
    ///
    /// The check runs inside the watch channel's modify lock, so a stale
    /// continuation can never overwrite state a newer request owns.
    /// Receivers are only notified when the mutation was applied; a
    /// stale token neither mutates nor wakes subscribers.
    /// Returns whether the mutation was applied.
    fn update_if_current(
        &self,
        token: u64,
        mutate: impl FnOnce(&mut ControllerState),
    ) -> bool {
        let mut applied = false;
        self.state.send_if_modified(|state| {
            if self.token.load(Ordering::SeqCst) == token {
                mutate(state);
                applied = true;
            }
            applied
        });
        applied
    }
}
