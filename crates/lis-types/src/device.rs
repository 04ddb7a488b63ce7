//! Device-side envelope types.
//!
//! This module provides the `DeviceMessage` envelope delivered by the
//! device gateway and the closed set of instrument categories the decoding
//! pipeline understands.

/// Instrument family a device message belongs to.
///
/// The category selects the segment/field layout and date formats the
/// decoder applies; it is declared by the gateway on the envelope, not
/// inside the instrument's own message.
///
/// # Examples
///
/// ```
/// use lis_types::DeviceCategory;
///
/// assert_eq!(DeviceCategory::from_tag("A"), Some(DeviceCategory::CategoryA));
/// assert_eq!(DeviceCategory::CategoryB.tag(), "B");
/// assert_eq!(DeviceCategory::from_tag("X"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceCategory {
    /// Point-of-care analyzers reporting dates as `yyyyMMdd` and result
    /// comments in trailing comment segments.
    CategoryA,
    /// Bench analyzers reporting dates with time-of-day and result
    /// comments inline in the observation segment.
    CategoryB,
}

impl DeviceCategory {
    /// Creates a category from its envelope tag.
    ///
    /// Returns `None` if the tag doesn't match a known category.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "A" => Some(Self::CategoryA),
            "B" => Some(Self::CategoryB),
            _ => None,
        }
    }

    /// Returns the envelope tag for this category.
    pub fn tag(self) -> &'static str {
        match self {
            Self::CategoryA => "A",
            Self::CategoryB => "B",
        }
    }
}

/// One transmission from a device gateway: routing identity plus the raw
/// framed content blocks received from the instrument.
///
/// Each entry in `contents` is processed independently and may itself
/// contain several concatenated framed messages; a failure inside one
/// block never aborts the processing of its siblings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceMessage {
    /// LIS-side client the device belongs to.
    pub client_id: String,
    /// Category tag selecting the decoder layout, see [`DeviceCategory`].
    pub device_category: String,
    /// Facility the gateway attributes the device to.
    pub sending_facility: String,
    /// Wire format tag of the content blocks (e.g. "HL7").
    pub message_type: String,
    /// Raw framed content blocks, in arrival order.
    pub contents: Vec<String>,
}

impl DeviceMessage {
    /// Returns the resolved device category, if the tag is recognized.
    pub fn category(&self) -> Option<DeviceCategory> {
        DeviceCategory::from_tag(&self.device_category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tag_conversion() {
        assert_eq!(DeviceCategory::from_tag("A"), Some(DeviceCategory::CategoryA));
        assert_eq!(DeviceCategory::from_tag("B"), Some(DeviceCategory::CategoryB));
        assert_eq!(DeviceCategory::from_tag(""), None);
        assert_eq!(DeviceCategory::from_tag("a"), None);
        assert_eq!(DeviceCategory::CategoryA.tag(), "A");
    }

    #[test]
    fn test_device_message_category() {
        let message = DeviceMessage {
            device_category: "B".to_string(),
            ..Default::default()
        };
        assert_eq!(message.category(), Some(DeviceCategory::CategoryB));

        let unknown = DeviceMessage {
            device_category: "Z".to_string(),
            ..Default::default()
        };
        assert_eq!(unknown.category(), None);
    }
}
