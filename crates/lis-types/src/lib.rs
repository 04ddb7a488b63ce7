//! # lis-types
//!
//! Type definitions for laboratory instrument connectivity.
//!
//! This crate provides the clinical record types produced by decoding
//! instrument messages: patient identity, diagnostic report metadata and
//! discrete test results, together with the device-side envelope types
//! that carry raw instrument transmissions into the pipeline.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage (chrono excepted).
//!
//! ## Usage
//!
//! ```rust
//! use lis_types::{DeviceCategory, DeviceMessage, Patient};
//!
//! let message = DeviceMessage {
//!     client_id: "1234".to_string(),
//!     device_category: DeviceCategory::CategoryA.tag().to_string(),
//!     sending_facility: "Main Lab".to_string(),
//!     message_type: "HL7".to_string(),
//!     contents: vec![],
//! };
//!
//! assert_eq!(DeviceCategory::from_tag(&message.device_category),
//!            Some(DeviceCategory::CategoryA));
//!
//! let patient = Patient::default();
//! assert!(patient.date_of_birth.is_none());
//! ```

#![warn(missing_docs)]

mod device;
mod patient;
mod record;
mod report;
mod result;

// Re-export all public types at crate root
pub use device::{DeviceCategory, DeviceMessage};
pub use patient::Patient;
pub use record::PatientDiagnosticRecord;
pub use report::DiagnosticReport;
pub use result::TestResult;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        // Verify all types are accessible from crate root
        let _patient = Patient::default();
        let _report = DiagnosticReport::default();
        let _result = TestResult::default();
        let _record = PatientDiagnosticRecord::default();
        let _category = DeviceCategory::CategoryA;
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let message = DeviceMessage {
            client_id: "1234".to_string(),
            device_category: "A".to_string(),
            sending_facility: "Main Lab".to_string(),
            message_type: "HL7".to_string(),
            contents: vec!["\u{0b}MSH|...\u{1c}\u{0d}".to_string()],
        };

        let json = serde_json::to_string(&message).unwrap();
        let parsed: DeviceMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(message, parsed);
    }
}
