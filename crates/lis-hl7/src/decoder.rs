//! Category decoder.
//!
//! Maps the fixed (segment, field, component) positions of a category's
//! [`DecoderProfile`] onto the clinical entities. All three extraction
//! operations are pure and total over a parsed message: an absent segment
//! produces an absent entity and an absent or unparseable field degrades
//! the single attribute, never the whole extraction.

use chrono::{NaiveDate, NaiveDateTime};
use lis_types::{DeviceCategory, DiagnosticReport, Patient, TestResult};

use crate::datetime;
use crate::message::{FieldValue, Message, Segment, HEADER_SEGMENT};
use crate::profiles::{CommentConvention, DecoderProfile};

/// Sending application position in the header segment.
const SENDING_APPLICATION_FIELD: usize = 3;
/// Sending facility position in the header segment.
const SENDING_FACILITY_FIELD: usize = 4;

/// Decoder for one instrument family.
///
/// # Examples
///
/// ```
/// use lis_hl7::{Hl7Decoder, Message};
/// use lis_types::DeviceCategory;
///
/// let decoder = Hl7Decoder::new(DeviceCategory::CategoryA);
/// let message = Message::parse("MSH|^~\\&|cobasIT1000|POC\rPID|1||0003||Fab^Cesc\r").unwrap();
///
/// let patient = decoder.patient(&message).unwrap();
/// assert_eq!(patient.internal_patient_id.as_deref(), Some("0003"));
/// assert_eq!(patient.family_name.as_deref(), Some("Fab"));
/// ```
#[derive(Debug, Clone)]
pub struct Hl7Decoder {
    profile: DecoderProfile,
}

impl Hl7Decoder {
    /// Creates a decoder for the given category.
    pub fn new(category: DeviceCategory) -> Self {
        Self {
            profile: DecoderProfile::for_category(category),
        }
    }

    /// Creates a decoder with an explicit layout.
    pub fn with_profile(profile: DecoderProfile) -> Self {
        Self { profile }
    }

    /// The layout this decoder applies.
    pub fn profile(&self) -> &DecoderProfile {
        &self.profile
    }

    /// Extracts the patient from the designated identification segment.
    ///
    /// Returns `None` when the message carries no patient segment.
    pub fn patient(&self, message: &Message) -> Option<Patient> {
        let layout = &self.profile.patient;
        let segment = message.segment(layout.segment, 0)?;
        let enc = message.encoding();

        let name = segment.field(layout.name);
        Some(Patient {
            internal_patient_id: segment
                .field(layout.internal_id)
                .component(0, enc)
                .display(enc),
            family_name: name.component(0, enc).display(enc),
            given_name: name.component(1, enc).display(enc),
            date_of_birth: self.date_attribute(
                segment.field(layout.date_of_birth),
                self.profile.date_of_birth_format,
                "date of birth",
            ),
            sex: segment.field(layout.sex).display(enc),
            account_number: segment.field(layout.account_number).display(enc),
            client_id: None,
        })
    }

    /// Extracts report metadata, merging the header, the observation
    /// request and a flat duplicate of the patient demographics.
    ///
    /// The receiving application/facility stay absent here; they belong to
    /// routing configuration, which the processor stamps.
    pub fn diagnostic_report(&self, message: &Message) -> Option<DiagnosticReport> {
        let header = message.segment(HEADER_SEGMENT, 0)?;
        let enc = message.encoding();

        let mut report = DiagnosticReport {
            sending_application: header.field(SENDING_APPLICATION_FIELD).display(enc),
            sending_facility: header.field(SENDING_FACILITY_FIELD).display(enc),
            ..Default::default()
        };

        let layout = &self.profile.request;
        if let Some(request) = message.segment(layout.segment, 0) {
            report.test_codes = request.field(layout.test_code).component(0, enc).display(enc);
            report.analyzer_name = request.field(layout.analyzer_name).display(enc);
            report.operator_id = request.field(layout.operator_id).component(0, enc).display(enc);
            report.analyzer_date_time = self.timestamp_attribute(
                request.field(layout.observed_at),
                "analyzer timestamp",
            );
        }

        if let Some(patient) = self.patient(message) {
            report.patient_internal_id = patient.internal_patient_id;
            report.family_name = patient.family_name;
            report.given_name = patient.given_name;
            report.date_of_birth = patient.date_of_birth;
            report.sex = patient.sex;
        }

        Some(report)
    }

    /// Extracts one result per result-segment occurrence, in source order.
    ///
    /// A message with no result segments yields an empty list. A result
    /// segment missing its value yields an entry with an absent value;
    /// omission is explicit, never a dropped entry.
    pub fn results(&self, message: &Message) -> Vec<TestResult> {
        let layout = &self.profile.result;
        let enc = message.encoding();
        let segments = message.segments();

        let mut results = Vec::new();
        for (index, segment) in segments.iter().enumerate() {
            if segment.id() != layout.segment {
                continue;
            }
            results.push(TestResult {
                test_code: segment.field(layout.test_code).component(0, enc).display(enc),
                value: segment.field(layout.value).display(enc),
                units: segment.field(layout.units).display(enc),
                reference_range: segment.field(layout.reference_range).display(enc),
                result_date_time: self.timestamp_attribute(
                    segment.field(layout.observed_at),
                    "result timestamp",
                ),
                comments: self.result_comments(message, segments, index),
                client_id: None,
            });
        }
        results
    }

    fn result_comments(
        &self,
        message: &Message,
        segments: &[Segment],
        result_index: usize,
    ) -> Option<String> {
        let enc = message.encoding();
        match self.profile.result.comments {
            CommentConvention::ResultField(field) => {
                segments[result_index].field(field).display(enc)
            }
            CommentConvention::TrailingSegment { id, field } => {
                let mut parts = Vec::new();
                for follower in &segments[result_index + 1..] {
                    if follower.id() != id {
                        break;
                    }
                    if let Some(text) = follower.field(field).display(enc) {
                        if !text.is_empty() {
                            parts.push(text);
                        }
                    }
                }
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("; "))
                }
            }
        }
    }

    fn date_attribute(
        &self,
        value: FieldValue<'_>,
        format: &str,
        attribute: &str,
    ) -> Option<NaiveDate> {
        let raw = value.as_str().filter(|raw| !raw.is_empty())?;
        let parsed = datetime::date(raw, format);
        if parsed.is_none() {
            tracing::warn!(value = raw, attribute, "unparseable date, leaving absent");
        }
        parsed
    }

    fn timestamp_attribute(
        &self,
        value: FieldValue<'_>,
        attribute: &str,
    ) -> Option<NaiveDateTime> {
        let raw = value.as_str().filter(|raw| !raw.is_empty())?;
        let parsed = datetime::datetime(raw, self.profile.timestamp_format);
        if parsed.is_none() {
            tracing::warn!(value = raw, attribute, "unparseable timestamp, leaving absent");
        }
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const CATEGORY_A_MESSAGE: &str =
        "MSH|^~\\&|cobasIT1000|POC|||20130514114122||ORU^R01|52|P|2.3\r\
         PID|1||0003||Fab^Cesc||19890811|M||||||||||V003\r\
         OBR|1|||Glu2^Glucose|||20130514114122|||ROCHE||||||||||||||ACI II UU13013667\r\
         OBX|1|NM|Glu2^Glucose||67|mg/dL|-|||||||20130514114122\r\
         NTE|1||Doctor Notified\r";

    fn decoder() -> Hl7Decoder {
        Hl7Decoder::new(DeviceCategory::CategoryA)
    }

    fn message() -> Message {
        Message::parse(CATEGORY_A_MESSAGE).unwrap()
    }

    #[test]
    fn test_patient() {
        let patient = decoder().patient(&message()).unwrap();
        assert_eq!(patient.internal_patient_id.as_deref(), Some("0003"));
        assert_eq!(patient.family_name.as_deref(), Some("Fab"));
        assert_eq!(patient.given_name.as_deref(), Some("Cesc"));
        assert_eq!(patient.date_of_birth, NaiveDate::from_ymd_opt(1989, 8, 11));
        assert_eq!(patient.sex.as_deref(), Some("M"));
        assert_eq!(patient.account_number.as_deref(), Some("V003"));
        assert!(patient.client_id.is_none());
    }

    #[test]
    fn test_patient_absent_segment() {
        let message = Message::parse("MSH|^~\\&|cobasIT1000|POC\rOBX|1|NM|Glu2||67\r").unwrap();
        assert!(decoder().patient(&message).is_none());
    }

    #[test]
    fn test_patient_unparseable_dob_degrades_to_absent() {
        let message =
            Message::parse("MSH|^~\\&|app\rPID|1||0003||Fab^Cesc||not-a-date|M\r").unwrap();
        let patient = decoder().patient(&message).unwrap();
        assert!(patient.date_of_birth.is_none());
        // the rest of the entity is still populated
        assert_eq!(patient.internal_patient_id.as_deref(), Some("0003"));
        assert_eq!(patient.sex.as_deref(), Some("M"));
    }

    #[test]
    fn test_diagnostic_report() {
        let report = decoder().diagnostic_report(&message()).unwrap();
        assert_eq!(report.sending_application.as_deref(), Some("cobasIT1000"));
        assert_eq!(report.sending_facility.as_deref(), Some("POC"));
        assert_eq!(report.analyzer_name.as_deref(), Some("ACI II UU13013667"));
        assert_eq!(
            report.analyzer_date_time,
            NaiveDate::from_ymd_opt(2013, 5, 14).unwrap().and_hms_opt(11, 41, 22)
        );
        assert_eq!(report.operator_id.as_deref(), Some("ROCHE"));
        assert_eq!(report.test_codes.as_deref(), Some("Glu2"));
        // patient demographics duplicated flat onto the report
        assert_eq!(report.patient_internal_id.as_deref(), Some("0003"));
        assert_eq!(report.family_name.as_deref(), Some("Fab"));
        assert_eq!(report.given_name.as_deref(), Some("Cesc"));
        assert_eq!(report.sex.as_deref(), Some("M"));
        assert_eq!(report.date_of_birth, NaiveDate::from_ymd_opt(1989, 8, 11));
        // routing identity is the processor's to stamp
        assert!(report.receiving_application.is_none());
        assert!(report.receiving_facility.is_none());
    }

    #[test]
    fn test_results() {
        let results = decoder().results(&message());
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(result.test_code.as_deref(), Some("Glu2"));
        assert_eq!(result.value.as_deref(), Some("67"));
        assert_eq!(result.units.as_deref(), Some("mg/dL"));
        assert_eq!(result.reference_range.as_deref(), Some("-"));
        assert_eq!(
            result.result_date_time,
            NaiveDate::from_ymd_opt(2013, 5, 14).unwrap().and_hms_opt(11, 41, 22)
        );
        assert_eq!(result.comments.as_deref(), Some("Doctor Notified"));
    }

    #[test]
    fn test_results_absent_segment_yields_empty_list() {
        let message = Message::parse("MSH|^~\\&|app\rPID|1||0003\r").unwrap();
        assert!(decoder().results(&message).is_empty());
    }

    #[test]
    fn test_result_without_value_is_kept() {
        let message = Message::parse(
            "MSH|^~\\&|app\r\
             OBX|1|NM|Glu2||67|mg/dL\r\
             OBX|2|NM|K\r\
             OBX|3|NM|Na||140|mmol/L\r",
        )
        .unwrap();
        let results = decoder().results(&message);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].value.as_deref(), Some("67"));
        // transmitted without a value position at all
        assert!(results[1].value.is_none());
        assert_eq!(results[2].value.as_deref(), Some("140"));
    }

    #[test]
    fn test_comments_attach_to_their_own_result() {
        let message = Message::parse(
            "MSH|^~\\&|app\r\
             OBX|1|NM|Glu2||67\r\
             NTE|1||Doctor Notified\r\
             NTE|2||Repeat advised\r\
             OBX|2|NM|K||4.1\r",
        )
        .unwrap();
        let results = decoder().results(&message);
        assert_eq!(
            results[0].comments.as_deref(),
            Some("Doctor Notified; Repeat advised")
        );
        assert!(results[1].comments.is_none());
    }

    #[test]
    fn test_category_b_conventions() {
        let message = Message::parse(
            "MSH|^~\\&|benchHost|LabB\r\
             PID|1||0107||Rey^Ana||19751201083000|F||||||||||A107\r\
             OBX|1|NM|Na||139|mmol/L|135-145||||||Verified by operator|20130514114122\r",
        )
        .unwrap();
        let decoder = Hl7Decoder::new(DeviceCategory::CategoryB);

        let patient = decoder.patient(&message).unwrap();
        assert_eq!(patient.date_of_birth, NaiveDate::from_ymd_opt(1975, 12, 1));

        let results = decoder.results(&message);
        assert_eq!(results[0].comments.as_deref(), Some("Verified by operator"));
        assert_eq!(results[0].reference_range.as_deref(), Some("135-145"));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let decoder = decoder();
        let message = message();
        assert_eq!(decoder.patient(&message), decoder.patient(&message));
        assert_eq!(
            decoder.diagnostic_report(&message),
            decoder.diagnostic_report(&message)
        );
        assert_eq!(decoder.results(&message), decoder.results(&message));
    }
}
