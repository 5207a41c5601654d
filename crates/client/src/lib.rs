//! `shorts-client` -- async client for the shorts generation service.
//!
//! Three layers, leaf first:
//!
//! - [`config`] resolves endpoint and timing settings from environment
//!   overrides with hardcoded fallbacks; it never fails.
//! - [`api`] is the thin HTTP layer: one call to create a job, one to
//!   fetch it by ID, both bounded by the configured request timeout.
//! - [`controller`] drives a submitted job to a terminal status with a
//!   bounded poll loop and publishes progress through a watch channel.
//!   A newer `submit` always supersedes an older one; stale results are
//!   discarded via a monotonic request token.

pub mod api;
pub mod config;
pub mod controller;

pub use api::{ShortsApi, Transport, TransportError};
pub use config::ClientConfig;
pub use controller::{GenerateController, GenerateError};
