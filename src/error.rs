//! Error types for the streaming loop.

use row_streamer_csv::CsvRowsError;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the stream. None of them are retried.
#[derive(Error, Debug)]
pub enum StreamError {
    /// Dataset could not be opened, parsed, or a row had the wrong arity.
    #[error(transparent)]
    Rows(#[from] CsvRowsError),

    /// Destination host lookup failed.
    #[error("Failed to resolve destination {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// Destination host resolved to nothing.
    #[error("No address found for destination {host}:{port}")]
    NoAddress { host: String, port: u16 },

    /// Outbound socket could not be created.
    #[error("Failed to bind UDP socket: {0}")]
    Bind(#[source] std::io::Error),

    /// Datagram send failed.
    #[error("Failed to send to {destination}: {source}")]
    Send {
        destination: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Output copy could not be created or written.
    #[error("Failed to write '{}': {source}", path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StreamError>;
