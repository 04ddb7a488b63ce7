//! Patient identity type.
//!
//! This module provides the `Patient` struct extracted from the
//! patient-identification segment of an instrument message.

use chrono::NaiveDate;

/// Patient demographics extracted from one instrument message.
///
/// All attributes are optional: instrument messages are sparse and an
/// absent field degrades the attribute to `None` rather than failing the
/// extraction. An attribute that was transmitted as an empty delimited
/// position is `Some("")`, which is distinct from `None` (not transmitted
/// at all).
///
/// # Examples
///
/// ```
/// use lis_types::Patient;
/// use chrono::NaiveDate;
///
/// let patient = Patient {
///     internal_patient_id: Some("0003".to_string()),
///     family_name: Some("Fab".to_string()),
///     given_name: Some("Cesc".to_string()),
///     date_of_birth: NaiveDate::from_ymd_opt(1989, 8, 11),
///     sex: Some("M".to_string()),
///     account_number: Some("V003".to_string()),
///     client_id: None,
/// };
///
/// assert_eq!(patient.display_name(), Some("Fab, Cesc".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Patient {
    /// Identifier assigned to the patient by the sending instrument or host.
    pub internal_patient_id: Option<String>,
    /// Patient family name.
    pub family_name: Option<String>,
    /// Patient given name.
    pub given_name: Option<String>,
    /// Date of birth; `None` when absent or unparseable.
    pub date_of_birth: Option<NaiveDate>,
    /// Administrative sex code as transmitted (e.g. "M", "F").
    pub sex: Option<String>,
    /// Patient account number.
    pub account_number: Option<String>,
    /// Owning LIS client; stamped by the processor, never by the device.
    pub client_id: Option<String>,
}

impl Patient {
    /// Returns "Family, Given" when both name parts are present.
    pub fn display_name(&self) -> Option<String> {
        match (&self.family_name, &self.given_name) {
            (Some(family), Some(given)) => Some(format!("{}, {}", family, given)),
            (Some(family), None) => Some(family.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_absent() {
        let patient = Patient::default();
        assert!(patient.internal_patient_id.is_none());
        assert!(patient.date_of_birth.is_none());
        assert!(patient.client_id.is_none());
    }

    #[test]
    fn test_display_name() {
        let patient = Patient {
            family_name: Some("Fab".to_string()),
            given_name: Some("Cesc".to_string()),
            ..Default::default()
        };
        assert_eq!(patient.display_name(), Some("Fab, Cesc".to_string()));

        let family_only = Patient {
            family_name: Some("Fab".to_string()),
            ..Default::default()
        };
        assert_eq!(family_only.display_name(), Some("Fab".to_string()));

        assert_eq!(Patient::default().display_name(), None);
    }

    #[test]
    fn test_empty_field_is_distinct_from_absent() {
        let transmitted_empty = Patient {
            account_number: Some(String::new()),
            ..Default::default()
        };
        assert_ne!(transmitted_empty, Patient::default());
    }
}
