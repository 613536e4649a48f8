//! The replay loop: load once, then send every row, pause, and start over.

use crate::config::StreamerConfig;
use crate::error::Result;
use crate::recorder::{bytes_literal, Recorder};
use crate::transmitter::{resolve_destination, UdpTransmitter};
use row_streamer_csv::{CsvRowsError, Dataset, Record};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Totals for one pass over the dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Datagrams sent.
    pub records: usize,
    /// Payload bytes sent.
    pub bytes: usize,
}

/// Owns the dataset, the outbound socket and the output copy for the
/// lifetime of the loop.
pub struct Streamer {
    config: StreamerConfig,
    dataset: Dataset,
    recorder: Recorder,
    transmitter: UdpTransmitter,
}

impl Streamer {
    /// Load the dataset, truncate the output copy and bind the socket.
    pub async fn open(config: StreamerConfig) -> Result<Self> {
        info!(
            "Starting to stream data from {} to {}:{}.",
            config.input.display(),
            config.host,
            config.port
        );

        let data = tokio::fs::read(&config.input)
            .await
            .map_err(|source| CsvRowsError::Open {
                path: config.input.clone(),
                source,
            })?;
        info!("Opened for reading: {}", config.input.display());
        let dataset = Dataset::from_bytes(&data)?;
        let recorder = Recorder::create(&config.output).await?;
        let destination = resolve_destination(&config.host, config.port).await?;
        let transmitter = UdpTransmitter::bind(destination).await?;

        Ok(Self {
            config,
            dataset,
            recorder,
            transmitter,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Send every row once, from the first, in load order.
    pub async fn run_pass(&mut self) -> Result<PassStats> {
        let never = CancellationToken::new();
        Ok(self.pass(&never).await?.unwrap_or_default())
    }

    /// Replay the dataset until `shutdown` is cancelled.
    ///
    /// Cancellation is observed between rows and during the pause, so a
    /// message is always both sent and recorded, or neither. Returns the
    /// number of completed passes.
    pub async fn run_until(&mut self, shutdown: CancellationToken) -> Result<u64> {
        let mut passes = 0u64;
        loop {
            let Some(stats) = self.pass(&shutdown).await? else {
                return Ok(passes);
            };
            passes += 1;
            info!(
                "Pass {} complete: {} records, {} bytes",
                passes, stats.records, stats.bytes
            );

            tokio::select! {
                _ = shutdown.cancelled() => return Ok(passes),
                _ = tokio::time::sleep(self.config.delay) => {}
            }
        }
    }

    /// One pass; `None` if cancelled part way.
    async fn pass(&mut self, shutdown: &CancellationToken) -> Result<Option<PassStats>> {
        let mut stats = PassStats::default();
        for row in self.dataset.rows() {
            if shutdown.is_cancelled() {
                return Ok(None);
            }

            let record = Record::try_from_row(row)?;
            let message = record.to_bytes();
            self.transmitter.send(&message).await?;
            self.recorder.append(&message).await?;
            info!(
                "Sent and wrote: {} on port {}. Hit CTRL-c to stop.",
                bytes_literal(&message),
                self.config.port
            );

            stats.records += 1;
            stats.bytes += message.len();
        }
        Ok(Some(stats))
    }
}

/// Stream forever, stopping cleanly on Ctrl-C.
pub async fn run(config: StreamerConfig) -> Result<u64> {
    let shutdown = CancellationToken::new();
    let on_interrupt = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping.");
            on_interrupt.cancel();
        }
    });
    // Let the watcher install its handler before the dataset is loaded.
    tokio::task::yield_now().await;

    stream(config, shutdown).await
}

/// Open the streamer and replay until `shutdown` is cancelled, including
/// while the dataset is still loading. Returns the completed passes.
pub async fn stream(config: StreamerConfig, shutdown: CancellationToken) -> Result<u64> {
    let mut streamer = tokio::select! {
        biased;
        _ = shutdown.cancelled() => return Ok(0),
        streamer = Streamer::open(config) => streamer?,
    };
    streamer.run_until(shutdown).await
}
