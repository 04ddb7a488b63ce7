//! Discrete test result type.

use chrono::NaiveDateTime;

/// One discrete test outcome from a result-observation segment.
///
/// A message may carry any number of results; extraction preserves the
/// order in which the result segments appeared. A result segment with no
/// transmitted value still produces a `TestResult` whose `value` is
/// `None` — omission is explicit, never silent.
///
/// # Examples
///
/// ```
/// use lis_types::TestResult;
///
/// let result = TestResult {
///     test_code: Some("Glu2".to_string()),
///     value: Some("67".to_string()),
///     units: Some("mg/dL".to_string()),
///     ..Default::default()
/// };
///
/// assert!(result.has_value());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestResult {
    /// Code of the test performed.
    pub test_code: Option<String>,
    /// Result value as transmitted; free text, not necessarily numeric.
    pub value: Option<String>,
    /// Units of measure.
    pub units: Option<String>,
    /// Reference range for the value.
    pub reference_range: Option<String>,
    /// Timestamp of the observation; `None` when absent or unparseable.
    pub result_date_time: Option<NaiveDateTime>,
    /// Free-text comments attached to the result.
    pub comments: Option<String>,
    /// Owning LIS client; stamped by the processor.
    pub client_id: Option<String>,
}

impl TestResult {
    /// Returns true if a non-empty value was transmitted.
    pub fn has_value(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_value() {
        let mut result = TestResult::default();
        assert!(!result.has_value());

        result.value = Some(String::new());
        assert!(!result.has_value());

        result.value = Some("67".to_string());
        assert!(result.has_value());
    }
}
