//! # lis-hl7
//!
//! Decoding pipeline for HL7 laboratory instrument messages.
//!
//! Takes the raw MLLP-framed transmissions carried by a
//! [`DeviceMessage`](lis_types::DeviceMessage) envelope and turns them into
//! combined clinical records:
//!
//! 1. [`MllpFrames`] strips the transport framing and splits a content
//!    block into individual message texts.
//! 2. [`Message::parse`] tokenizes one text into segments and fields using
//!    the encoding characters the message itself declares.
//! 3. [`Hl7Decoder`] maps the category-specific segment/field layout onto
//!    patient, report and result entities.
//! 4. [`MessageProcessor`] orchestrates the above for a whole batch,
//!    stamping routing identity and isolating per-message failures.
//!
//! ## Usage
//!
//! ```
//! use lis_hl7::{Hl7Decoder, Message};
//! use lis_types::DeviceCategory;
//!
//! let text = "MSH|^~\\&|cobasIT1000|POC\r\
//!             PID|1||0003||Fab^Cesc||19890811|M\r\
//!             OBX|1|NM|Glu2^Glucose||67|mg/dL\r";
//! let message = Message::parse(text)?;
//! let decoder = Hl7Decoder::new(DeviceCategory::CategoryA);
//!
//! let patient = decoder.patient(&message).unwrap();
//! assert_eq!(patient.family_name.as_deref(), Some("Fab"));
//!
//! let results = decoder.results(&message);
//! assert_eq!(results[0].value.as_deref(), Some("67"));
//! # Ok::<(), lis_hl7::Hl7Error>(())
//! ```

#![warn(missing_docs)]

pub mod datetime;
mod decoder;
mod encoding;
mod framing;
mod message;
mod processor;
mod profiles;
mod types;

// Re-export all public types at crate root
pub use decoder::Hl7Decoder;
pub use encoding::EncodingCharacters;
pub use framing::{MllpFrames, BLOCK_TERMINATOR, END_OF_BLOCK, START_OF_BLOCK};
pub use message::{FieldValue, Message, Segment, HEADER_SEGMENT};
pub use processor::{BatchOutcome, MessageFailure, MessageProcessor};
pub use profiles::{
    CommentConvention, DecoderProfile, PatientFields, RequestFields, ResultFields,
};
pub use types::{Hl7Error, Hl7Result, RoutingConfig};

// Re-export lis-types for convenience
pub use lis_types;
