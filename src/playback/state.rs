use std::fmt;

use crate::common::errors::TransportError;

/// Phase of a playback session. Sessions only move forward, except that
/// Draining and Closing loop back to Streaming while requests keep arriving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Joining,
    Jittering,
    Streaming,
    Draining,
    Closing,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Joining => "joining",
            Self::Jittering => "jittering",
            Self::Streaming => "streaming",
            Self::Draining => "draining",
            Self::Closing => "closing",
        };
        f.write_str(name)
    }
}

/// How a session finished.
#[derive(Debug)]
pub enum SessionEnd {
    /// Queue stayed empty through the grace delay.
    Drained { plays: usize },
    /// The transport failed; the guild's pending requests were discarded.
    Aborted {
        plays: usize,
        dropped: usize,
        error: TransportError,
    },
}

impl SessionEnd {
    pub fn plays(&self) -> usize {
        match self {
            Self::Drained { plays } | Self::Aborted { plays, .. } => *plays,
        }
    }
}

/// What happened to a submitted request.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The guild was idle; the caller ran the session to completion.
    Ran(SessionEnd),
    /// Appended behind the active session at this 1-based position.
    Queued { position: usize },
    /// The guild's queue was full.
    Dropped,
}
