//! Pipeline-wide types: error taxonomy and routing configuration.

use thiserror::Error;

/// Errors that can occur while decoding an instrument transmission.
///
/// Framing and malformed-message errors are per-message conditions: the
/// processor records them against the offending content block or frame and
/// continues with the rest of the batch. An unsupported category tag is the
/// one fatal condition — it means the envelope itself violates the API
/// contract, so nothing in the batch can be decoded.
#[derive(Error, Debug)]
pub enum Hl7Error {
    /// Content block lacks valid MLLP start/end sentinels.
    #[error("Invalid MLLP framing: {reason}")]
    Framing {
        /// What was wrong with the block.
        reason: String,
    },

    /// Message has no header segment or an invalid encoding declaration.
    #[error("Malformed HL7 message: {reason}")]
    MalformedMessage {
        /// What was wrong with the message.
        reason: String,
    },

    /// Device-category tag on the envelope matches no known decoder.
    #[error("Unsupported device category tag: {tag:?}")]
    UnsupportedCategory {
        /// The unrecognized tag.
        tag: String,
    },
}

impl Hl7Error {
    /// Shorthand for a framing error with the given reason.
    pub(crate) fn framing(reason: impl Into<String>) -> Self {
        Self::Framing {
            reason: reason.into(),
        }
    }

    /// Shorthand for a malformed-message error with the given reason.
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            reason: reason.into(),
        }
    }
}

/// Result type for decoding operations.
pub type Hl7Result<T> = Result<T, Hl7Error>;

/// Process-wide routing identity stamped onto every diagnostic report.
///
/// Loaded once at startup and immutable thereafter; the receiving
/// application and facility always come from here, never from whatever the
/// device wrote into its own message header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Name this processor answers as (MSH receiving application).
    pub receiving_application: String,
    /// Facility this processor receives for (MSH receiving facility).
    pub receiving_facility: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            receiving_application: "LISConnect".to_string(),
            receiving_facility: "Central Laboratory".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_config_default() {
        let config = RoutingConfig::default();
        assert_eq!(config.receiving_application, "LISConnect");
        assert_eq!(config.receiving_facility, "Central Laboratory");
    }

    #[test]
    fn test_error_messages() {
        let err = Hl7Error::framing("missing end-of-block");
        assert_eq!(
            err.to_string(),
            "Invalid MLLP framing: missing end-of-block"
        );

        let err = Hl7Error::UnsupportedCategory {
            tag: "Z".to_string(),
        };
        assert!(err.to_string().contains("\"Z\""));
    }
}
