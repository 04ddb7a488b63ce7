//! MLLP transport framing.
//!
//! A content block received from a device gateway wraps each HL7 message
//! in MLLP sentinels: a start-of-block byte, the message text, an
//! end-of-block byte and a trailing carriage return. One block may carry a
//! single framed message or several concatenated ones.

use crate::types::{Hl7Error, Hl7Result};

/// Start-of-block sentinel (`VT`).
pub const START_OF_BLOCK: char = '\u{0b}';
/// End-of-block sentinel (`FS`).
pub const END_OF_BLOCK: char = '\u{1c}';
/// Trailing terminator after the end-of-block sentinel (`CR`).
pub const BLOCK_TERMINATOR: char = '\r';

/// Native segment terminator of an unwrapped message.
const SEGMENT_TERMINATOR: &str = "\r";

/// Lazy iterator over the framed messages of one content block.
///
/// Yields one unwrapped message text per frame, with the sentinels
/// stripped and internal line terminators normalized to `\r`. A framing
/// defect (content outside a frame, missing end-of-block, empty frame)
/// yields a single `Framing` error and ends the iteration; the caller
/// skips the block and moves on to its siblings.
///
/// # Examples
///
/// ```
/// use lis_hl7::MllpFrames;
///
/// let block = "\u{0b}MSH|^~\\&|a\rPID|1\u{1c}\r\u{0b}MSH|^~\\&|b\u{1c}\r";
/// let frames: Result<Vec<String>, _> = MllpFrames::new(block).collect();
/// assert_eq!(frames.unwrap(), vec!["MSH|^~\\&|a\rPID|1", "MSH|^~\\&|b"]);
/// ```
#[derive(Debug)]
pub struct MllpFrames<'a> {
    rest: &'a str,
    frames_read: usize,
    failed: bool,
}

impl<'a> MllpFrames<'a> {
    /// Creates an iterator over the frames of `block`.
    pub fn new(block: &'a str) -> Self {
        Self {
            rest: block,
            frames_read: 0,
            failed: false,
        }
    }

    /// Number of frames yielded so far.
    pub fn frames_read(&self) -> usize {
        self.frames_read
    }

    fn fail(&mut self, reason: String) -> Option<Hl7Result<String>> {
        self.failed = true;
        Some(Err(Hl7Error::framing(reason)))
    }
}

impl Iterator for MllpFrames<'_> {
    type Item = Hl7Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        // Inter-frame bytes: the trailing terminator and incidental
        // whitespace are tolerated, anything else is stray content.
        let rest = self
            .rest
            .trim_start_matches(|c: char| c == BLOCK_TERMINATOR || c.is_ascii_whitespace());
        if rest.is_empty() {
            return None;
        }

        let Some(body) = rest.strip_prefix(START_OF_BLOCK) else {
            return self.fail(format!(
                "content outside frame at offset {}",
                self.rest.len() - rest.len()
            ));
        };

        let Some(end) = body.find(END_OF_BLOCK) else {
            return self.fail("missing end-of-block sentinel".to_string());
        };

        let text = body[..end]
            .replace("\r\n", SEGMENT_TERMINATOR)
            .replace('\n', SEGMENT_TERMINATOR);
        if text.trim().is_empty() {
            return self.fail(format!("frame {} is empty", self.frames_read));
        }

        self.rest = &body[end + END_OF_BLOCK.len_utf8()..];
        self.frames_read += 1;
        Some(Ok(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(text: &str) -> String {
        format!("{START_OF_BLOCK}{text}{END_OF_BLOCK}{BLOCK_TERMINATOR}")
    }

    #[test]
    fn test_single_frame() {
        let block = frame("MSH|^~\\&|a\rPID|1");
        let frames: Vec<_> = MllpFrames::new(&block).collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].as_deref().unwrap(), "MSH|^~\\&|a\rPID|1");
    }

    #[test]
    fn test_concatenated_frames_in_order() {
        let block = format!("{}{}{}", frame("MSH|^~\\&|a"), frame("MSH|^~\\&|b"), frame("MSH|^~\\&|c"));
        let frames: Hl7Result<Vec<String>> = MllpFrames::new(&block).collect();
        assert_eq!(
            frames.unwrap(),
            vec!["MSH|^~\\&|a", "MSH|^~\\&|b", "MSH|^~\\&|c"]
        );
    }

    #[test]
    fn test_line_terminators_normalized() {
        let block = frame("MSH|^~\\&|a\r\nPID|1\nOBX|1");
        let frames: Hl7Result<Vec<String>> = MllpFrames::new(&block).collect();
        assert_eq!(frames.unwrap(), vec!["MSH|^~\\&|a\rPID|1\rOBX|1"]);
    }

    #[test]
    fn test_missing_end_sentinel() {
        let block = format!("{START_OF_BLOCK}MSH|^~\\&|a");
        let mut frames = MllpFrames::new(&block);
        assert!(matches!(frames.next(), Some(Err(Hl7Error::Framing { .. }))));
        // the error terminates the block
        assert!(frames.next().is_none());
    }

    #[test]
    fn test_missing_start_sentinel() {
        let mut frames = MllpFrames::new("MSH|^~\\&|a\u{1c}\r");
        assert!(matches!(frames.next(), Some(Err(Hl7Error::Framing { .. }))));
    }

    #[test]
    fn test_truncated_second_frame() {
        let block = format!("{}{START_OF_BLOCK}MSH|^~\\&|b", frame("MSH|^~\\&|a"));
        let collected: Vec<_> = MllpFrames::new(&block).collect();
        assert_eq!(collected.len(), 2);
        assert!(collected[0].is_ok());
        assert!(collected[1].is_err());
    }

    #[test]
    fn test_empty_block_yields_nothing() {
        assert_eq!(MllpFrames::new("").count(), 0);
        assert_eq!(MllpFrames::new("\r\n  ").count(), 0);
    }

    #[test]
    fn test_empty_frame_is_an_error() {
        let block = frame("  ");
        let mut frames = MllpFrames::new(&block);
        assert!(matches!(frames.next(), Some(Err(Hl7Error::Framing { .. }))));
    }
}
