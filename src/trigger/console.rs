//! Line-oriented trigger source for running without a chat gateway.
//!
//! ```text
//! voice <guild> <user> <channel|->   user joined/moved/left voice
//! msg <guild> <user> <text...>       chat message from user
//! ```

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use super::{dispatcher::Dispatcher, locator::VoiceStateCache};
use crate::common::types::{ChannelId, GuildId, UserId};

#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleLine {
    Voice {
        guild: GuildId,
        user: UserId,
        channel: Option<ChannelId>,
    },
    Message {
        guild: GuildId,
        user: UserId,
        content: String,
    },
    Blank,
}

pub fn parse_line(line: &str) -> Result<ConsoleLine, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(ConsoleLine::Blank);
    }

    let mut parts = line.splitn(4, ' ');
    let kind = parts.next().unwrap_or_default();
    let guild = parse_id::<GuildId>(parts.next(), "guild")?;
    let user = parse_id::<UserId>(parts.next(), "user")?;
    let rest = parts.next().map(str::trim).unwrap_or_default();

    match kind {
        "voice" => {
            let channel = match rest {
                "" => return Err("missing channel (use '-' to leave)".into()),
                "-" => None,
                id => Some(parse_id::<ChannelId>(Some(id), "channel")?),
            };
            Ok(ConsoleLine::Voice {
                guild,
                user,
                channel,
            })
        }
        "msg" => Ok(ConsoleLine::Message {
            guild,
            user,
            content: rest.to_string(),
        }),
        other => Err(format!("unknown command '{}'", other)),
    }
}

fn parse_id<T: std::str::FromStr>(part: Option<&str>, what: &str) -> Result<T, String> {
    let part = part.ok_or_else(|| format!("missing {}", what))?;
    part.parse()
        .map_err(|_| format!("invalid {} id '{}'", what, part))
}

/// Feed every line of `input` to the cache or the dispatcher until EOF.
pub async fn run<R>(input: R, cache: Arc<VoiceStateCache>, dispatcher: Dispatcher)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Console input failed: {}", e);
                break;
            }
        };

        match parse_line(&line) {
            Ok(ConsoleLine::Voice {
                guild,
                user,
                channel,
            }) => {
                debug!("[{}] Voice state of {} -> {:?}", guild, user, channel);
                cache.update(guild, user, channel);
            }
            Ok(ConsoleLine::Message {
                guild,
                user,
                content,
            }) => {
                dispatcher.handle_message(guild, user, &content);
            }
            Ok(ConsoleLine::Blank) => {}
            Err(e) => warn!("Ignoring console line '{}': {}", line, e),
        }
    }
    info!("Console input closed");
}
