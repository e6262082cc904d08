//! Where play requests come from.
//!
//! A chat message becomes a [`Trigger`], the [`Dispatcher`] resolves the
//! issuer's voice channel through a [`ChannelLocator`] and hands the result to
//! the scheduler.

pub mod command;
pub mod console;
pub mod dispatcher;
pub mod locator;

pub use command::{AirhornCommand, parse_command};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use locator::{ChannelLocator, VoiceStateCache};

use crate::common::types::{GuildId, UserId};

/// A recognised command, before its voice channel is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub guild: GuildId,
    pub issuer: UserId,
    /// Requested sound name, if the command named one.
    pub sound: Option<String>,
}
