//! HL7 message model.
//!
//! Splits a message into segments and fields eagerly, but leaves
//! component/repetition/subcomponent decomposition lazy: many fields are
//! consumed as opaque text (free-form comments in particular), and
//! splitting those would corrupt embedded separator characters. Access is
//! total — a missing segment or out-of-range field index yields an
//! explicit absent marker, never an error, because instrument messages are
//! sparse by nature.

use crate::encoding::EncodingCharacters;
use crate::types::{Hl7Error, Hl7Result};

/// Segment id of the message header.
pub const HEADER_SEGMENT: &str = "MSH";

/// Tri-state view of one delimited position.
///
/// Distinguishes a position that was never transmitted (`Absent`) from one
/// transmitted with zero-length content (`Empty`): downstream records must
/// not conflate "no account number on this instrument" with "account
/// number cleared".
///
/// # Examples
///
/// ```
/// use lis_hl7::{EncodingCharacters, FieldValue};
///
/// let enc = EncodingCharacters::default();
/// let name = FieldValue::Value("Fab^Cesc");
/// assert_eq!(name.component(0, &enc).as_str(), Some("Fab"));
/// assert_eq!(name.component(1, &enc).as_str(), Some("Cesc"));
/// assert!(name.component(2, &enc).is_absent());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// The position does not exist in the transmitted segment.
    Absent,
    /// The position exists but holds no text.
    Empty,
    /// The position holds raw (still escaped) text.
    Value(&'a str),
}

impl<'a> FieldValue<'a> {
    fn from_raw(raw: &'a str) -> Self {
        if raw.is_empty() {
            Self::Empty
        } else {
            Self::Value(raw)
        }
    }

    /// Returns true if the position was never transmitted.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns true if the position was transmitted, even as empty text.
    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    /// Raw text of the position; `None` only when absent.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Self::Absent => None,
            Self::Empty => Some(""),
            Self::Value(raw) => Some(raw),
        }
    }

    /// Display text with escape sequences restored; `None` only when absent.
    pub fn display(&self, encoding: &EncodingCharacters) -> Option<String> {
        self.as_str().map(|raw| encoding.unescape(raw))
    }

    /// Lazily extracts the component at `index` (0-based).
    pub fn component(&self, index: usize, encoding: &EncodingCharacters) -> FieldValue<'a> {
        self.split_level(index, encoding.component)
    }

    /// Lazily extracts the repetition at `index` (0-based).
    pub fn repetition(&self, index: usize, encoding: &EncodingCharacters) -> FieldValue<'a> {
        self.split_level(index, encoding.repetition)
    }

    /// Lazily extracts the subcomponent at `index` (0-based).
    pub fn subcomponent(&self, index: usize, encoding: &EncodingCharacters) -> FieldValue<'a> {
        self.split_level(index, encoding.subcomponent)
    }

    fn split_level(&self, index: usize, separator: char) -> FieldValue<'a> {
        match self {
            Self::Absent => Self::Absent,
            Self::Empty => {
                if index == 0 {
                    Self::Empty
                } else {
                    Self::Absent
                }
            }
            Self::Value(raw) => match raw.split(separator).nth(index) {
                Some(part) => Self::from_raw(part),
                None => Self::Absent,
            },
        }
    }
}

/// One line of an HL7 message: a typed id followed by delimited fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    fields: Vec<String>,
}

impl Segment {
    /// Splits a raw segment line on the message's field separator.
    ///
    /// For the header segment, HL7 numbering makes the field separator
    /// itself field 1 and the encoding declaration field 2; the separator
    /// is inserted so that `field(n)` matches the standard numbering for
    /// every segment type.
    fn parse(line: &str, encoding: &EncodingCharacters) -> Self {
        let mut fields: Vec<String> = line.split(encoding.field).map(str::to_string).collect();
        if fields.first().map(String::as_str) == Some(HEADER_SEGMENT) {
            fields.insert(1, encoding.field.to_string());
        }
        Self { fields }
    }

    /// Segment type id (the 3-character code at position 0).
    pub fn id(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or("")
    }

    /// Number of transmitted fields, including the id at position 0.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Field at HL7 position `index`; `Absent` past the transmitted end.
    pub fn field(&self, index: usize) -> FieldValue<'_> {
        match self.fields.get(index) {
            Some(raw) => FieldValue::from_raw(raw),
            None => FieldValue::Absent,
        }
    }
}

/// One parsed HL7 message: ordered segments plus the encoding characters
/// declared in its header.
///
/// # Examples
///
/// ```
/// use lis_hl7::Message;
///
/// let message = Message::parse("MSH|^~\\&|cobasIT1000|POC\rPID|1||0003").unwrap();
/// assert_eq!(message.field("MSH", 0, 3).as_str(), Some("cobasIT1000"));
/// assert_eq!(message.field("PID", 0, 3).as_str(), Some("0003"));
/// assert!(message.field("OBX", 0, 5).is_absent());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    segments: Vec<Segment>,
    encoding: EncodingCharacters,
}

impl Message {
    /// Parses one message, reading the separator set from its header.
    ///
    /// Segment terminators may be `\r`, `\n` or `\r\n`; empty trailing
    /// lines are discarded and segment order is preserved.
    ///
    /// # Errors
    /// Returns `MalformedMessage` when the message is empty, does not lead
    /// with an `MSH` header, or declares an invalid separator set.
    pub fn parse(text: &str) -> Hl7Result<Self> {
        let lines: Vec<&str> = text
            .split(['\r', '\n'])
            .filter(|line| !line.trim().is_empty())
            .collect();

        let header = lines
            .first()
            .ok_or_else(|| Hl7Error::malformed("message contains no segments"))?;
        if !header.starts_with(HEADER_SEGMENT) {
            return Err(Hl7Error::malformed(format!(
                "first segment is {:?}, expected {}",
                header.chars().take(3).collect::<String>(),
                HEADER_SEGMENT
            )));
        }

        let encoding = EncodingCharacters::from_header(header)?;
        let segments = lines
            .iter()
            .map(|line| Segment::parse(line, &encoding))
            .collect();

        Ok(Self { segments, encoding })
    }

    /// The separator set declared by this message's header.
    pub fn encoding(&self) -> &EncodingCharacters {
        &self.encoding
    }

    /// All segments in transmission order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The `occurrence`-th segment (0-based) with the given id, if any.
    pub fn segment(&self, id: &str, occurrence: usize) -> Option<&Segment> {
        self.segments
            .iter()
            .filter(|s| s.id() == id)
            .nth(occurrence)
    }

    /// Ordered iterator over every segment with the given id.
    pub fn segments_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Segment> + 'a {
        self.segments.iter().filter(move |s| s.id() == id)
    }

    /// Field `field` of the `occurrence`-th segment with the given id.
    ///
    /// Total: an absent segment yields `FieldValue::Absent`.
    pub fn field(&self, id: &str, occurrence: usize, field: usize) -> FieldValue<'_> {
        match self.segment(id, occurrence) {
            Some(segment) => segment.field(field),
            None => FieldValue::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "MSH|^~\\&|cobasIT1000|POC|||20130514114122||ORU^R01|52|P|2.3\r\
                          PID|1||0003||Fab^Cesc||19890811|M||||||||||V003\r\
                          OBX|1|NM|Glu2||67|mg/dL\r\
                          OBX|2|NM|K||4.1|mmol/L\r";

    #[test]
    fn test_parse_requires_header() {
        assert!(Message::parse("").is_err());
        assert!(Message::parse("PID|1||0003").is_err());
        assert!(Message::parse("MSH").is_err());
    }

    #[test]
    fn test_msh_field_numbering() {
        let message = Message::parse(SAMPLE).unwrap();
        let msh = message.segment(HEADER_SEGMENT, 0).unwrap();
        assert_eq!(msh.field(1).as_str(), Some("|"));
        assert_eq!(msh.field(2).as_str(), Some("^~\\&"));
        assert_eq!(msh.field(3).as_str(), Some("cobasIT1000"));
        assert_eq!(msh.field(4).as_str(), Some("POC"));
    }

    #[test]
    fn test_segment_occurrences_preserve_order() {
        let message = Message::parse(SAMPLE).unwrap();
        assert_eq!(message.segments_of("OBX").count(), 2);
        assert_eq!(message.field("OBX", 0, 5).as_str(), Some("67"));
        assert_eq!(message.field("OBX", 1, 5).as_str(), Some("4.1"));
        assert!(message.segment("OBX", 2).is_none());
    }

    #[test]
    fn test_absent_vs_empty_field() {
        let message = Message::parse(SAMPLE).unwrap();
        let pid = message.segment("PID", 0).unwrap();
        // PID-2 was transmitted empty; PID-30 was never transmitted
        assert_eq!(pid.field(2), FieldValue::Empty);
        assert_eq!(pid.field(30), FieldValue::Absent);
        assert_eq!(pid.field(2).as_str(), Some(""));
        assert_eq!(pid.field(30).as_str(), None);
    }

    #[test]
    fn test_lazy_component_decomposition() {
        let message = Message::parse(SAMPLE).unwrap();
        let enc = *message.encoding();
        let name = message.field("PID", 0, 5);
        assert_eq!(name.component(0, &enc).as_str(), Some("Fab"));
        assert_eq!(name.component(1, &enc).as_str(), Some("Cesc"));
        assert!(name.component(2, &enc).is_absent());
    }

    #[test]
    fn test_repetition_and_subcomponent_decomposition() {
        let message = Message::parse("MSH|^~\\&|app\rPID|1||id1~id2&sub\r").unwrap();
        let enc = *message.encoding();
        let ids = message.field("PID", 0, 3);
        assert_eq!(ids.repetition(0, &enc).as_str(), Some("id1"));
        let second = ids.repetition(1, &enc);
        assert_eq!(second.subcomponent(0, &enc).as_str(), Some("id2"));
        assert_eq!(second.subcomponent(1, &enc).as_str(), Some("sub"));
    }

    #[test]
    fn test_escaped_separator_not_a_boundary() {
        let message = Message::parse("MSH|^~\\&|app\rNTE|1||before\\F\\after\r").unwrap();
        let enc = *message.encoding();
        let comment = message.field("NTE", 0, 3);
        // the escaped field separator stays inside one field...
        assert_eq!(comment.as_str(), Some("before\\F\\after"));
        // ...and unescapes back to the literal character for display
        assert_eq!(comment.display(&enc), Some("before|after".to_string()));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = Message::parse(SAMPLE).unwrap();
        let second = Message::parse(SAMPLE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_crlf_and_trailing_terminators() {
        let crlf = SAMPLE.replace('\r', "\r\n");
        let message = Message::parse(&crlf).unwrap();
        assert_eq!(message.segments().len(), 4);
    }
}
