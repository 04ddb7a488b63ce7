//! Per-category decoder layouts.
//!
//! Each instrument family maps attributes to fixed (segment, field,
//! component) positions and has its own date conventions. The layouts are
//! compiled-in interface tables consumed by the decoder engine; adding a
//! category means adding one constructor here plus its tag in
//! [`DeviceCategory`].

use lis_types::DeviceCategory;

/// Where a result's free-text comment is transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentConvention {
    /// In comment segments directly following the result segment; the
    /// given field of each holds the text.
    TrailingSegment {
        /// Comment segment id (e.g. `NTE`).
        id: &'static str,
        /// Field of the comment segment holding the text.
        field: usize,
    },
    /// Inline, in the given field of the result segment itself.
    ResultField(usize),
}

/// Field positions for the patient-identification segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatientFields {
    /// Patient segment id.
    pub segment: &'static str,
    /// Internal patient identifier field.
    pub internal_id: usize,
    /// Name field (family and given name as components).
    pub name: usize,
    /// Date-of-birth field.
    pub date_of_birth: usize,
    /// Administrative sex field.
    pub sex: usize,
    /// Account number field.
    pub account_number: usize,
}

/// Field positions for the observation-request segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestFields {
    /// Observation-request segment id.
    pub segment: &'static str,
    /// Test code field (code in the first component).
    pub test_code: usize,
    /// Analytic run timestamp field.
    pub observed_at: usize,
    /// Operator identifier field.
    pub operator_id: usize,
    /// Analyzer (instrument) name field.
    pub analyzer_name: usize,
}

/// Field positions for the result-observation segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultFields {
    /// Result segment id.
    pub segment: &'static str,
    /// Test code field (code in the first component).
    pub test_code: usize,
    /// Result value field.
    pub value: usize,
    /// Units field.
    pub units: usize,
    /// Reference range field.
    pub reference_range: usize,
    /// Observation timestamp field.
    pub observed_at: usize,
    /// Where the comment text lives.
    pub comments: CommentConvention,
}

/// Complete decoding layout for one instrument family.
///
/// # Examples
///
/// ```
/// use lis_hl7::DecoderProfile;
/// use lis_types::DeviceCategory;
///
/// let profile = DecoderProfile::for_category(DeviceCategory::CategoryA);
/// assert_eq!(profile.patient.segment, "PID");
/// assert_eq!(profile.date_of_birth_format, "%Y%m%d");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderProfile {
    /// The instrument family this layout belongs to.
    pub category: DeviceCategory,
    /// chrono format of date-of-birth fields.
    pub date_of_birth_format: &'static str,
    /// chrono format of run/result timestamp fields.
    pub timestamp_format: &'static str,
    /// Patient segment layout.
    pub patient: PatientFields,
    /// Observation-request segment layout.
    pub request: RequestFields,
    /// Result segment layout.
    pub result: ResultFields,
}

impl DecoderProfile {
    /// Returns the layout for the given category.
    pub fn for_category(category: DeviceCategory) -> Self {
        match category {
            DeviceCategory::CategoryA => Self::category_a(),
            DeviceCategory::CategoryB => Self::category_b(),
        }
    }

    /// Point-of-care analyzers: plain `yyyyMMdd` dates of birth, comments
    /// in trailing `NTE` segments.
    pub fn category_a() -> Self {
        Self {
            category: DeviceCategory::CategoryA,
            date_of_birth_format: "%Y%m%d",
            timestamp_format: "%Y%m%d%H%M%S",
            patient: PatientFields {
                segment: "PID",
                internal_id: 3,
                name: 5,
                date_of_birth: 7,
                sex: 8,
                account_number: 18,
            },
            request: RequestFields {
                segment: "OBR",
                test_code: 4,
                observed_at: 7,
                operator_id: 10,
                analyzer_name: 24,
            },
            result: ResultFields {
                segment: "OBX",
                test_code: 3,
                value: 5,
                units: 6,
                reference_range: 7,
                observed_at: 14,
                comments: CommentConvention::TrailingSegment { id: "NTE", field: 3 },
            },
        }
    }

    /// Bench analyzers: dates of birth carry a time-of-day, comments are
    /// inline in the result segment.
    pub fn category_b() -> Self {
        Self {
            category: DeviceCategory::CategoryB,
            date_of_birth_format: "%Y%m%d%H%M%S",
            timestamp_format: "%Y%m%d%H%M%S",
            patient: PatientFields {
                segment: "PID",
                internal_id: 3,
                name: 5,
                date_of_birth: 7,
                sex: 8,
                account_number: 18,
            },
            request: RequestFields {
                segment: "OBR",
                test_code: 4,
                observed_at: 7,
                operator_id: 10,
                analyzer_name: 24,
            },
            result: ResultFields {
                segment: "OBX",
                test_code: 3,
                value: 5,
                units: 6,
                reference_range: 7,
                observed_at: 14,
                comments: CommentConvention::ResultField(13),
            },
        }
    }
}
