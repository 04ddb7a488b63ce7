//! TCP ingestion server.

use std::sync::Arc;

use lis_hl7::{BatchOutcome, MessageProcessor};
use lis_types::DeviceMessage;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// One failure entry in a batch summary.
#[derive(Debug, Serialize)]
pub struct FailureSummary {
    /// Content block the failure belongs to.
    pub block_index: usize,
    /// Frame within the block, when framing got that far.
    pub frame_index: Option<usize>,
    /// Human-readable reason.
    pub reason: String,
}

/// Reply sent to the gateway for each received envelope.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    /// Whether the envelope itself was accepted for processing.
    pub accepted: bool,
    /// Number of records decoded successfully.
    pub processed: usize,
    /// Number of isolated per-message failures.
    pub failed: usize,
    /// Details of each isolated failure.
    pub failures: Vec<FailureSummary>,
    /// Reason the envelope was rejected outright, when `accepted` is false.
    pub reason: Option<String>,
}

impl BatchSummary {
    fn from_outcome(outcome: &BatchOutcome) -> Self {
        Self {
            accepted: true,
            processed: outcome.records.len(),
            failed: outcome.failures.len(),
            failures: outcome
                .failures
                .iter()
                .map(|failure| FailureSummary {
                    block_index: failure.block_index,
                    frame_index: failure.frame_index,
                    reason: failure.error.to_string(),
                })
                .collect(),
            reason: None,
        }
    }

    fn rejected(reason: String) -> Self {
        Self {
            accepted: false,
            processed: 0,
            failed: 0,
            failures: Vec::new(),
            reason: Some(reason),
        }
    }
}

/// LIS ingestion server.
///
/// Accepts gateway connections and serves each on its own task; the
/// processor is immutable and shared across all of them.
#[derive(Clone)]
pub struct LisServer {
    processor: Arc<MessageProcessor>,
}

impl LisServer {
    /// Creates a new server around the given processor.
    pub fn new(processor: MessageProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
        }
    }

    /// Returns a reference to the processor.
    pub fn processor(&self) -> &MessageProcessor {
        &self.processor
    }

    /// Serves connections from the listener until an accept error.
    pub async fn serve(&self, listener: TcpListener) -> std::io::Result<()> {
        loop {
            let (socket, peer) = listener.accept().await?;
            tracing::info!(%peer, "gateway connected");
            let processor = Arc::clone(&self.processor);
            tokio::spawn(async move {
                match handle_connection(socket, processor).await {
                    Ok(()) => tracing::info!(%peer, "gateway disconnected"),
                    Err(error) => tracing::warn!(%peer, %error, "connection failed"),
                }
            });
        }
    }
}

/// Reads newline-delimited JSON envelopes and answers each with a summary.
async fn handle_connection(
    socket: TcpStream,
    processor: Arc<MessageProcessor>,
) -> std::io::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let summary = process_envelope(&processor, &line);
        let mut payload = serde_json::to_string(&summary)
            .map_err(|error| std::io::Error::new(std::io::ErrorKind::InvalidData, error))?;
        payload.push('\n');
        writer.write_all(payload.as_bytes()).await?;
    }
    Ok(())
}

fn process_envelope(processor: &MessageProcessor, line: &str) -> BatchSummary {
    let device_message: DeviceMessage = match serde_json::from_str(line) {
        Ok(message) => message,
        Err(error) => {
            tracing::warn!(%error, "rejected undecodable envelope");
            return BatchSummary::rejected(format!("invalid envelope: {error}"));
        }
    };

    match processor.process_message(&device_message) {
        Ok(outcome) => {
            tracing::info!(
                client = %device_message.client_id,
                category = %device_message.device_category,
                processed = outcome.records.len(),
                failed = outcome.failures.len(),
                "processed device message"
            );
            BatchSummary::from_outcome(&outcome)
        }
        Err(error) => {
            tracing::warn!(
                client = %device_message.client_id,
                %error,
                "rejected device message"
            );
            BatchSummary::rejected(error.to_string())
        }
    }
}
