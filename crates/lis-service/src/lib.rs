//! # lis-service
//!
//! Ingestion service for device-gateway message envelopes.
//!
//! This crate provides a TCP server that accepts newline-delimited JSON
//! [`DeviceMessage`](lis_types::DeviceMessage) envelopes from a device
//! gateway, runs them through the decoding pipeline in the `lis-hl7`
//! crate, and answers each envelope with a JSON batch summary.

#![warn(missing_docs)]

mod server;

pub use server::{BatchSummary, FailureSummary, LisServer};
