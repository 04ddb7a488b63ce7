//! Diagnostic report metadata type.

use chrono::{NaiveDate, NaiveDateTime};

/// Metadata about the analytic run that produced a set of results.
///
/// Combines fields from the message header (sending application and
/// facility), the observation request (analyzer name and timestamp,
/// operator, test codes) and a flat duplicate of the patient demographics
/// for downstream consumers that need a single denormalized record.
///
/// The receiving application and facility are never taken from the device
/// message; the processor stamps them from process-wide routing
/// configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticReport {
    /// Application name declared in the message header.
    pub sending_application: Option<String>,
    /// Facility declared in the message header.
    pub sending_facility: Option<String>,
    /// Receiving application; stamped from routing configuration.
    pub receiving_application: Option<String>,
    /// Receiving facility; stamped from routing configuration.
    pub receiving_facility: Option<String>,
    /// Analyzer (instrument) name, e.g. model and serial.
    pub analyzer_name: Option<String>,
    /// Timestamp of the analytic run; `None` when absent or unparseable.
    pub analyzer_date_time: Option<NaiveDateTime>,
    /// Operator who ran the analysis.
    pub operator_id: Option<String>,
    /// Test code(s) covered by this report.
    pub test_codes: Option<String>,
    /// Patient identifier duplicated from the patient entity.
    pub patient_internal_id: Option<String>,
    /// Patient family name duplicated from the patient entity.
    pub family_name: Option<String>,
    /// Patient given name duplicated from the patient entity.
    pub given_name: Option<String>,
    /// Patient date of birth duplicated from the patient entity.
    pub date_of_birth: Option<NaiveDate>,
    /// Patient sex code duplicated from the patient entity.
    pub sex: Option<String>,
    /// Owning LIS client; stamped by the processor.
    pub client_id: Option<String>,
}
