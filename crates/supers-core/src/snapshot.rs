//! Read-or-empty access to the watched file.
//!
//! The watched file is treated as opaque text. A missing file, a
//! permission error, and any other read failure all map to the empty
//! string, which is indistinguishable from a file that is legitimately
//! empty. Nothing here ever surfaces an error to the caller.

use std::path::Path;

use tracing::trace;

/// Read the whole file at `path`, or return `""` if it cannot be read.
///
/// The file is opened anew on every call, so each read observes the
/// current on-disk content. Bytes that are not valid UTF-8 are replaced
/// with U+FFFD instead of discarding the whole read.
pub async fn read_or_empty(path: &Path) -> String {
    match tokio::fs::read(path).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            trace!(path = %path.display(), error = %e, "watched file unreadable, using empty content");
            String::new()
        }
    }
}

/// Characters stripped from both ends of the file content.
///
/// Space, tab, line feed, carriage return, NUL, and vertical tab. Other
/// Unicode spaces (such as U+00A0) are part of the operator's text and
/// are kept.
pub const TRIM_CHARS: [char; 6] = [' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Strip leading and trailing [`TRIM_CHARS`] from raw file content.
pub fn trimmed(raw: &str) -> &str {
    raw.trim_matches(TRIM_CHARS)
}
