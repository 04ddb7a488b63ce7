//! HL7 encoding characters.
//!
//! Every HL7 message declares its own separator set in the header segment;
//! all tokenization and escape handling for that message uses the declared
//! characters rather than hard-coded defaults, so instruments speaking a
//! dialect with unusual separators still decode correctly.

use crate::types::{Hl7Error, Hl7Result};

/// The five separator characters governing one message.
///
/// # Examples
///
/// ```
/// use lis_hl7::EncodingCharacters;
///
/// let enc = EncodingCharacters::from_header(r"MSH|^~\&|cobasIT1000|POC").unwrap();
/// assert_eq!(enc.field, '|');
/// assert_eq!(enc.component, '^');
/// assert_eq!(enc.unescape(r"mg\F\dL"), "mg|dL");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingCharacters {
    /// Separates fields within a segment.
    pub field: char,
    /// Separates components within a field.
    pub component: char,
    /// Separates repetitions of a field.
    pub repetition: char,
    /// Introduces and closes an escape sequence.
    pub escape: char,
    /// Separates subcomponents within a component.
    pub subcomponent: char,
}

impl Default for EncodingCharacters {
    fn default() -> Self {
        Self {
            field: '|',
            component: '^',
            repetition: '~',
            escape: '\\',
            subcomponent: '&',
        }
    }
}

impl EncodingCharacters {
    /// Reads the separator declaration from a raw header segment line.
    ///
    /// The character after the `MSH` id is the field separator; the field
    /// that follows holds, in order, the component, repetition, escape and
    /// subcomponent characters.
    ///
    /// # Errors
    /// Returns `MalformedMessage` when the declaration is truncated or the
    /// five characters are not pairwise distinct.
    pub fn from_header(line: &str) -> Hl7Result<Self> {
        let mut chars = line.chars().skip(3);
        let field = chars
            .next()
            .ok_or_else(|| Hl7Error::malformed("header segment truncated before field separator"))?;

        let declared: Vec<char> = chars.take_while(|c| *c != field).collect();
        if declared.len() < 4 {
            return Err(Hl7Error::malformed(format!(
                "encoding declaration has {} characters, expected 4",
                declared.len()
            )));
        }

        let encoding = Self {
            field,
            component: declared[0],
            repetition: declared[1],
            escape: declared[2],
            subcomponent: declared[3],
        };
        encoding.validate()?;
        Ok(encoding)
    }

    fn validate(&self) -> Hl7Result<()> {
        let set = [
            self.field,
            self.component,
            self.repetition,
            self.escape,
            self.subcomponent,
        ];
        for (i, a) in set.iter().enumerate() {
            if set[i + 1..].contains(a) {
                return Err(Hl7Error::malformed(format!(
                    "encoding declaration reuses separator {:?}",
                    a
                )));
            }
        }
        Ok(())
    }

    /// Restores escaped separator characters in a field's raw text.
    ///
    /// Handles the standard sequences `\F\` (field), `\S\` (component),
    /// `\R\` (repetition), `\T\` (subcomponent) and `\E\` (escape), written
    /// here with the default escape character. Unrecognized or unterminated
    /// sequences pass through unchanged.
    pub fn unescape(&self, raw: &str) -> String {
        if !raw.contains(self.escape) {
            return raw.to_string();
        }

        let mut out = String::with_capacity(raw.len());
        let mut chars = raw.chars();
        while let Some(c) = chars.next() {
            if c != self.escape {
                out.push(c);
                continue;
            }
            let mut body = String::new();
            let mut closed = false;
            for next in chars.by_ref() {
                if next == self.escape {
                    closed = true;
                    break;
                }
                body.push(next);
            }
            if !closed {
                out.push(self.escape);
                out.push_str(&body);
                break;
            }
            match body.as_str() {
                "F" => out.push(self.field),
                "S" => out.push(self.component),
                "R" => out.push(self.repetition),
                "T" => out.push(self.subcomponent),
                "E" => out.push(self.escape),
                _ => {
                    out.push(self.escape);
                    out.push_str(&body);
                    out.push(self.escape);
                }
            }
        }
        out
    }
}
