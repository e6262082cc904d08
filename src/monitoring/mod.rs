pub mod stats;

pub use stats::{PlayStats, StatsSink, StatsSnapshot};
