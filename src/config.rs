//! Streamer configuration.
//!
//! Every setting is fixed for the lifetime of the process. The CLI defaults
//! reproduce the feed's well-known setup: `Life expectancy.csv` replayed to
//! `localhost:9999` every three seconds, with a copy kept in `out9.txt`.

mod duration;

pub use duration::parse_duration;

use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INPUT: &str = "Life expectancy.csv";
pub const DEFAULT_OUTPUT: &str = "out9.txt";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 9999;
pub const DEFAULT_DELAY: Duration = Duration::from_secs(3);

/// Immutable settings handed to the streaming loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamerConfig {
    /// Dataset to replay
    pub input: PathBuf,
    /// Local copy of every transmitted message (truncated at start)
    pub output: PathBuf,
    /// Destination host
    pub host: String,
    /// Destination port
    pub port: u16,
    /// Pause between passes over the dataset
    pub delay: Duration,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            delay: DEFAULT_DELAY,
        }
    }
}

/// Command-line arguments for the streamer.
#[derive(Args, Clone, Debug)]
pub struct StreamerArgs {
    /// CSV dataset to replay (first line is a header)
    #[arg(long, short = 'i', env = "ROW_STREAMER_INPUT", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// File receiving a copy of every transmitted message
    #[arg(long, short = 'o', env = "ROW_STREAMER_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Destination host
    #[arg(long, env = "ROW_STREAMER_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Destination UDP port
    #[arg(long, env = "ROW_STREAMER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Pause between passes (e.g. "3s", "500ms")
    #[arg(long, env = "ROW_STREAMER_DELAY", default_value = "3s", value_parser = parse_duration)]
    pub delay: Duration,
}

impl From<StreamerArgs> for StreamerConfig {
    fn from(args: StreamerArgs) -> Self {
        Self {
            input: args.input,
            output: args.output,
            host: args.host,
            port: args.port,
            delay: args.delay,
        }
    }
}
