//! Replays a static CSV dataset as a live UDP feed.
//!
//! The dataset is loaded once. Each row is formatted as a bracketed text
//! message, sent as a single datagram to a fixed destination and copied to a
//! local output file. After the last row the streamer pauses and starts
//! again from the first, until interrupted.
//!
//! # Example
//!
//! ```ignore
//! use row_streamer::{run, StreamerConfig};
//!
//! let passes = run(StreamerConfig::default()).await?;
//! ```

pub mod config;
pub mod error;
pub mod recorder;
pub mod streamer;
pub mod transmitter;

pub use config::{StreamerArgs, StreamerConfig};
pub use error::StreamError;
pub use recorder::{bytes_literal, Recorder};
pub use streamer::{run, stream, PassStats, Streamer};
pub use transmitter::{resolve_destination, UdpTransmitter};
