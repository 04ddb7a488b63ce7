//! Batch message processor.
//!
//! Drives the full pipeline for one device transmission: framing splitter,
//! tokenizer and category decoder for every framed message in every
//! content block, assembling one combined record per decoded message.
//! Failures are isolated per block and per frame; the only fatal condition
//! is an envelope whose category tag matches no decoder.

use lis_types::{DeviceMessage, PatientDiagnosticRecord};

use crate::decoder::Hl7Decoder;
use crate::framing::MllpFrames;
use crate::message::Message;
use crate::types::{Hl7Error, Hl7Result, RoutingConfig};

/// One isolated per-message failure inside a batch.
#[derive(Debug)]
pub struct MessageFailure {
    /// Index of the content block the failure belongs to.
    pub block_index: usize,
    /// Index of the frame within the block, when framing got that far.
    pub frame_index: Option<usize>,
    /// What went wrong.
    pub error: Hl7Error,
}

/// Outcome of processing one device transmission: the records decoded
/// successfully, in input order, plus every isolated failure.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// One record per successfully decoded message, input order preserved.
    pub records: Vec<PatientDiagnosticRecord>,
    /// Per-block and per-frame failures, in discovery order.
    pub failures: Vec<MessageFailure>,
}

impl BatchOutcome {
    /// Returns true if every message in the batch decoded successfully.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Orchestrates splitter, tokenizer and decoder over device transmissions.
///
/// Holds the immutable routing identity stamped onto every report; safe to
/// share behind an `Arc` across concurrent callers.
///
/// # Examples
///
/// ```
/// use lis_hl7::{MessageProcessor, RoutingConfig};
/// use lis_types::DeviceMessage;
///
/// let processor = MessageProcessor::new(RoutingConfig::default());
/// let device_message = DeviceMessage {
///     client_id: "1234".to_string(),
///     device_category: "A".to_string(),
///     sending_facility: "Main Lab".to_string(),
///     message_type: "HL7".to_string(),
///     contents: vec!["\u{0b}MSH|^~\\&|cobasIT1000|POC\rPID|1||0003\u{1c}\r".to_string()],
/// };
/// let outcome = processor.process_message(&device_message)?;
/// assert_eq!(outcome.records.len(), 1);
/// # Ok::<(), lis_hl7::Hl7Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MessageProcessor {
    routing: RoutingConfig,
}

impl MessageProcessor {
    /// Creates a processor with the given routing identity.
    pub fn new(routing: RoutingConfig) -> Self {
        Self { routing }
    }

    /// The routing identity this processor stamps onto reports.
    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    /// Processes every content block of one device transmission.
    ///
    /// Never fails for a malformed block or frame — those are recorded in
    /// the outcome and their siblings continue.
    ///
    /// # Errors
    /// Returns `UnsupportedCategory` when the envelope's category tag
    /// matches no known decoder; nothing is processed in that case.
    pub fn process_message(&self, device_message: &DeviceMessage) -> Hl7Result<BatchOutcome> {
        let category = device_message
            .category()
            .ok_or_else(|| Hl7Error::UnsupportedCategory {
                tag: device_message.device_category.clone(),
            })?;
        let decoder = Hl7Decoder::new(category);

        let mut outcome = BatchOutcome::default();
        for (block_index, block) in device_message.contents.iter().enumerate() {
            let frames: Hl7Result<Vec<String>> = MllpFrames::new(block).collect();
            let frames = match frames {
                Ok(frames) => frames,
                Err(error) => {
                    tracing::warn!(
                        client = %device_message.client_id,
                        block = block_index,
                        %error,
                        "skipping content block with invalid framing"
                    );
                    outcome.failures.push(MessageFailure {
                        block_index,
                        frame_index: None,
                        error,
                    });
                    continue;
                }
            };

            for (frame_index, text) in frames.iter().enumerate() {
                match Message::parse(text) {
                    Ok(message) => {
                        outcome
                            .records
                            .push(self.assemble_record(&decoder, &message, device_message));
                    }
                    Err(error) => {
                        tracing::warn!(
                            client = %device_message.client_id,
                            block = block_index,
                            frame = frame_index,
                            %error,
                            "skipping malformed message"
                        );
                        outcome.failures.push(MessageFailure {
                            block_index,
                            frame_index: Some(frame_index),
                            error,
                        });
                    }
                }
            }
        }
        Ok(outcome)
    }

    /// Decodes one message and stamps routing identity and ownership.
    fn assemble_record(
        &self,
        decoder: &Hl7Decoder,
        message: &Message,
        device_message: &DeviceMessage,
    ) -> PatientDiagnosticRecord {
        let client_id = Some(device_message.client_id.clone());

        let mut patient = decoder.patient(message);
        if let Some(patient) = patient.as_mut() {
            patient.client_id = client_id.clone();
        }

        let mut report = decoder.diagnostic_report(message);
        if let Some(report) = report.as_mut() {
            report.client_id = client_id.clone();
            report.receiving_application = Some(self.routing.receiving_application.clone());
            report.receiving_facility = Some(self.routing.receiving_facility.clone());
        }

        let mut results = decoder.results(message);
        for result in &mut results {
            result.client_id = client_id.clone();
        }

        PatientDiagnosticRecord {
            patient,
            diagnostic_report: report,
            results,
        }
    }
}
