use std::sync::Arc;

use bytes::Bytes;

/// A generic boxed error type, used by process startup glue.
pub type AnyError = Box<dyn std::error::Error + Send + Sync>;

/// A convenient Result alias returning `AnyError`.
pub type AnyResult<T> = std::result::Result<T, AnyError>;

/// One opaque 20 ms compressed audio frame.
///
/// `Bytes` clones are reference counted, so every session streaming the same
/// sound shares one buffer.
pub type Frame = Bytes;

/// Read-only, shareable frame buffer of a loaded sound.
pub type FrameBuffer = Arc<[Frame]>;

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl From<u64> for $name {
            fn from(u: u64) -> Self {
                Self(u)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

snowflake_id!(
    /// Destination group (a guild). Single-flight playback is tracked per group.
    GuildId
);
snowflake_id!(
    /// Voice channel inside a guild.
    ChannelId
);
snowflake_id!(UserId);
