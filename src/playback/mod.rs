//! Per-guild single-flight playback.
//!
//! [`Scheduler::submit`] either starts a session for an idle guild or queues
//! the request behind the running one. The session drains the queue over a
//! single connection and releases the guild once it stays empty through the
//! grace delay.

pub mod request;
pub mod scheduler;
mod session;
pub mod state;

pub use request::PlayRequest;
pub use scheduler::Scheduler;
pub use state::{SessionEnd, SessionState, SubmitOutcome};
