//! `shorts-core` -- shared domain types for the shorts generation client.
//!
//! Pure data definitions with no I/O: the generation request payload,
//! the job snapshot returned by the remote service, and the state tuple
//! the controller exposes to presentation code.

pub mod types;

pub use types::{ControllerState, GenerationRequest, JobStatus, ShortJob};
