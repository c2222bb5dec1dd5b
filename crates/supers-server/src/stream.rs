//! Server-push stream of the watched file.
//!
//! Clients connect to `GET /super/stream` and keep the response open.
//! Every time the trimmed content of the watched file changes, one
//! `data: <content>\n\n` frame is written as its own body chunk, so it
//! reaches the client without waiting for more output.
//!
//! When the client disconnects the server fails to write, drops the
//! body, and with it the connection's [`ChangeNotifier`]. Nothing else
//! needs to be cleaned up.
//!
//! [`ChangeNotifier`]: supers_core::ChangeNotifier

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use futures::StreamExt;
use supers_core::{change_stream, PushFrame};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::AppState;

/// Media type of the push stream.
pub const EVENT_STREAM: &str = "text/event-stream";

/// Cache policy of the push stream.
pub const NO_CACHE: &str = "no-cache";

/// Open a push stream for the watched file.
///
/// # Route
///
/// `GET /super/stream`
pub async fn stream_super(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut connection = Connection::new();
    debug!(
        connection = %connection.id,
        path = %state.watched_path.display(),
        "Push stream client connected"
    );

    let frames = change_stream(state.notifier(), state.poll_interval).map(move |frame| {
        connection.record(&frame);
        Ok::<_, Infallible>(frame.encode())
    });

    (
        [
            (header::CONTENT_TYPE, EVENT_STREAM),
            (header::CACHE_CONTROL, NO_CACHE),
        ],
        Body::from_stream(frames),
    )
}

/// Log bookkeeping for one stream connection.
///
/// Lives inside the response body stream, so it is dropped exactly when
/// the server stops driving that stream.
struct Connection {
    id: Uuid,
    frames_pushed: u64,
}

impl Connection {
    fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            frames_pushed: 0,
        }
    }

    fn record(&mut self, frame: &PushFrame) {
        self.frames_pushed = self.frames_pushed.saturating_add(1);
        if frame.is_multiline() {
            warn!(
                connection = %self.id,
                "Super content spans several lines, clients will only see it split"
            );
        }
        debug!(
            connection = %self.id,
            content_len = frame.content().len(),
            "Pushing change frame"
        );
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        debug!(
            connection = %self.id,
            frames_pushed = self.frames_pushed,
            "Push stream client disconnected"
        );
    }
}
