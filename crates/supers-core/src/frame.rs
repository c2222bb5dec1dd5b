//! Push frame encoding for the `text/event-stream` wire format.
//!
//! Every change is sent as one `data:` line followed by a blank line.
//! No `event:`, `id:`, or `retry:` fields are written, so clients fall
//! back to the default reconnect behaviour of the protocol.

use std::fmt;

/// Prefix written before the content of every frame.
pub const DATA_PREFIX: &str = "data: ";

/// Terminator of every frame. The empty line ends the event.
pub const FRAME_TERMINATOR: &str = "\n\n";

/// A single change notification pushed to one client.
///
/// The content is carried verbatim. Content that itself contains a line
/// break is split across lines on the wire and will not round-trip
/// through a client's event parser; see [`PushFrame::is_multiline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushFrame {
    content: String,
}

impl PushFrame {
    /// Create a frame carrying `content`.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// The content carried by this frame.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the content contains a line break.
    ///
    /// Such frames are still sent unchanged; callers use this to log that
    /// the client will see a truncated or split event.
    pub fn is_multiline(&self) -> bool {
        self.content.contains(['\n', '\r'])
    }

    /// Encode the frame as it appears on the wire.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PushFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(DATA_PREFIX)?;
        f.write_str(&self.content)?;
        f.write_str(FRAME_TERMINATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_data_line_and_blank_line() {
        assert_eq!(PushFrame::new("hello").encode(), "data: hello\n\n");
    }

    #[test]
    fn empty_content_still_produces_a_frame() {
        assert_eq!(PushFrame::new("").encode(), "data: \n\n");
    }

    #[test]
    fn multiline_content_is_passed_through_verbatim() {
        let frame = PushFrame::new("line one\nline two");
        assert!(frame.is_multiline());
        assert_eq!(frame.encode(), "data: line one\nline two\n\n");
    }

    #[test]
    fn single_line_content_is_not_multiline() {
        assert!(!PushFrame::new("BREAKING: road closed").is_multiline());
        assert!(PushFrame::new("a\r\nb").is_multiline());
    }

    #[test]
    fn display_matches_encode() {
        let frame = PushFrame::new("world");
        assert_eq!(format!("{frame}"), frame.encode());
        assert_eq!(frame.content(), "world");
    }
}
