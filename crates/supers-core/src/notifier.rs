//! Per-connection change notifier.
//!
//! A [`ChangeNotifier`] remembers the last content it pushed to its
//! client (initially the empty string). Each poll reads the watched
//! file, trims it, and yields a [`PushFrame`] only when the trimmed
//! content differs from what was last pushed.
//!
//! [`change_stream`] turns a notifier into an unbounded stream that polls
//! once immediately and then once per interval. The stream holds no
//! resources besides the notifier itself: when the HTTP layer drops it
//! (client gone, server shutting down) the loop simply stops.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::stream::{self, Stream};

use crate::frame::PushFrame;
use crate::snapshot::{read_or_empty, trimmed};

/// Interval between two polls of the watched file.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Change detector for one client connection.
#[derive(Debug)]
pub struct ChangeNotifier {
    /// File polled on every iteration.
    path: PathBuf,
    /// Trimmed content of the last frame produced.
    last_seen: String,
}

impl ChangeNotifier {
    /// Create a notifier for `path` that has not pushed anything yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_seen: String::new(),
        }
    }

    /// The watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Content of the last frame produced, or `""` before the first one.
    pub fn last_seen(&self) -> &str {
        &self.last_seen
    }

    /// Compare already-read content against the last pushed value.
    ///
    /// Returns a frame carrying the trimmed content when it differs, and
    /// records it as the new last-seen value. Returns `None` otherwise.
    pub fn observe(&mut self, raw: &str) -> Option<PushFrame> {
        let current = trimmed(raw);
        if current == self.last_seen {
            return None;
        }
        current.clone_into(&mut self.last_seen);
        Some(PushFrame::new(current))
    }

    /// Read the watched file and compare it against the last pushed value.
    ///
    /// An unreadable or missing file counts as empty content.
    pub async fn poll(&mut self) -> Option<PushFrame> {
        let raw = read_or_empty(&self.path).await;
        self.observe(&raw)
    }
}

/// Turn `notifier` into an endless stream of change frames.
///
/// The first poll runs as soon as the stream is first polled, so a
/// client connecting to a non-empty file receives its content right
/// away. After every poll the stream sleeps for `interval` before
/// reading again. Frames are yielded in the order the changes were
/// observed.
pub fn change_stream(
    notifier: ChangeNotifier,
    interval: Duration,
) -> impl Stream<Item = PushFrame> + Send + 'static {
    stream::unfold((notifier, false), move |(mut notifier, mut started)| async move {
        loop {
            if started {
                tokio::time::sleep(interval).await;
            }
            started = true;
            if let Some(frame) = notifier.poll().await {
                return Some((frame, (notifier, started)));
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use futures::StreamExt;

    const FAST: Duration = Duration::from_millis(10);

    /// Swap in new content with a rename so a concurrent poll never sees
    /// the file truncated but not yet rewritten.
    fn replace(path: &Path, contents: &str) {
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, contents).unwrap();
        std::fs::rename(&tmp, path).unwrap();
    }

    #[test]
    fn first_non_empty_content_is_pushed() {
        let mut notifier = ChangeNotifier::new("super.txt");
        let frame = notifier.observe("hello").unwrap();
        assert_eq!(frame.encode(), "data: hello\n\n");
        assert_eq!(notifier.last_seen(), "hello");
    }

    #[test]
    fn empty_content_before_any_push_is_silent() {
        let mut notifier = ChangeNotifier::new("super.txt");
        assert!(notifier.observe("").is_none());
        assert!(notifier.observe(" \n ").is_none());
        assert_eq!(notifier.last_seen(), "");
    }

    #[test]
    fn unchanged_content_is_pushed_once() {
        let mut notifier = ChangeNotifier::new("super.txt");
        assert!(notifier.observe("hello").is_some());
        for _ in 0..3 {
            assert!(notifier.observe("hello").is_none());
        }
    }

    #[test]
    fn surrounding_whitespace_does_not_count_as_change() {
        let mut notifier = ChangeNotifier::new("super.txt");
        assert!(notifier.observe("hello").is_some());
        assert!(notifier.observe("hello\n").is_none());
        assert!(notifier.observe("  hello\t").is_none());
        assert!(notifier.observe("hello\0").is_none());
    }

    #[test]
    fn non_breaking_spaces_are_part_of_the_content() {
        let mut notifier = ChangeNotifier::new("super.txt");
        let frame = notifier.observe("\u{a0}BREAKING\u{a0}").unwrap();
        assert_eq!(frame.encode(), "data: \u{a0}BREAKING\u{a0}\n\n");
        assert!(notifier.observe("BREAKING").is_some());
    }

    #[test]
    fn follows_the_connect_update_delete_scenario() {
        let mut notifier = ChangeNotifier::new("super.txt");
        let pushed: Vec<String> = ["hello", "hello", "hello", "hello\n", "world", ""]
            .iter()
            .filter_map(|raw| notifier.observe(raw))
            .map(|frame| frame.encode())
            .collect();
        assert_eq!(pushed, ["data: hello\n\n", "data: world\n\n", "data: \n\n"]);
        assert_eq!(notifier.last_seen(), "");
    }

    #[tokio::test]
    async fn poll_reads_the_file_each_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("super.txt");
        let mut notifier = ChangeNotifier::new(&path);

        assert!(notifier.poll().await.is_none());

        std::fs::write(&path, "hello\n").unwrap();
        assert_eq!(notifier.poll().await.unwrap().content(), "hello");
        assert!(notifier.poll().await.is_none());

        std::fs::remove_file(&path).unwrap();
        assert_eq!(notifier.poll().await.unwrap().content(), "");
    }

    #[tokio::test]
    async fn truncate_then_write_is_seen_as_empty_then_new_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("super.txt");
        std::fs::write(&path, "hello").unwrap();
        let mut notifier = ChangeNotifier::new(&path);
        assert_eq!(notifier.poll().await.unwrap().content(), "hello");

        // A plain write truncates first; a poll landing in between reads
        // an empty file and reports it like any other change.
        std::fs::File::create(&path).unwrap();
        assert_eq!(notifier.poll().await.unwrap().encode(), "data: \n\n");

        std::fs::write(&path, "world").unwrap();
        assert_eq!(notifier.poll().await.unwrap().content(), "world");
    }

    #[tokio::test]
    async fn stream_pushes_current_content_on_connect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("super.txt");
        std::fs::write(&path, "hello").unwrap();

        let mut frames = Box::pin(change_stream(ChangeNotifier::new(&path), FAST));
        let first = tokio::time::timeout(Duration::from_secs(5), frames.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.encode(), "data: hello\n\n");
    }

    #[tokio::test]
    async fn stream_stays_quiet_while_content_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("super.txt");
        std::fs::write(&path, "hello").unwrap();

        let mut frames = Box::pin(change_stream(ChangeNotifier::new(&path), FAST));
        assert!(frames.next().await.is_some());

        replace(&path, "hello\n");
        let quiet = tokio::time::timeout(Duration::from_millis(100), frames.next()).await;
        assert!(quiet.is_err());
    }

    #[tokio::test]
    async fn stream_yields_changes_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("super.txt");
        std::fs::write(&path, "hello").unwrap();

        let mut frames = Box::pin(change_stream(ChangeNotifier::new(&path), FAST));
        let timeout = Duration::from_secs(5);

        let first = tokio::time::timeout(timeout, frames.next()).await.unwrap();
        assert_eq!(first.unwrap().content(), "hello");

        replace(&path, "world");
        let second = tokio::time::timeout(timeout, frames.next()).await.unwrap();
        assert_eq!(second.unwrap().content(), "world");

        std::fs::remove_file(&path).unwrap();
        let third = tokio::time::timeout(timeout, frames.next()).await.unwrap();
        assert_eq!(third.unwrap().encode(), "data: \n\n");
    }
}
