//! Status endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/status` | Running configuration and current content |

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;
use chrono::{DateTime, Utc};
use supers_core::read_or_empty;
use supers_core::snapshot::trimmed;

use crate::state::AppState;

/// Body of `GET /api/status`.
#[derive(Debug, serde::Serialize)]
pub struct StatusResponse {
    /// The watched file as configured.
    pub watched_path: String,
    /// Milliseconds between two polls on each stream connection.
    pub poll_interval_ms: u64,
    /// Whether `POST /super` is accepted.
    pub ingest_enabled: bool,
    /// When the server started.
    pub started_at: DateTime<Utc>,
    /// Whole seconds since `started_at`.
    pub uptime_seconds: i64,
    /// Trimmed content a new stream connection would receive first.
    pub current: String,
}

/// Serve a minimal HTML page naming the watched file and linking the
/// endpoints.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let path = escape_html(&state.watched_path.display().to_string());
    let interval = state.poll_interval_ms();

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>supers</title></head>
<body>
<h1>supers</h1>
<p>Watching <code>{path}</code> every {interval} ms.</p>
<ul>
<li><a href="/super/stream">/super/stream</a> (text/event-stream)</li>
<li><a href="/api/status">/api/status</a></li>
</ul>
</body>
</html>"#
    ))
}

/// Escape text for inclusion in HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Report the running configuration and the current trimmed content.
///
/// # Route
///
/// `GET /api/status`
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let raw = read_or_empty(&state.watched_path).await;

    Json(StatusResponse {
        watched_path: state.watched_path.display().to_string(),
        poll_interval_ms: state.poll_interval_ms(),
        ingest_enabled: state.ingest_enabled,
        started_at: state.started_at,
        uptime_seconds: Utc::now()
            .signed_duration_since(state.started_at)
            .num_seconds()
            .max(0),
        current: trimmed(&raw).to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<b>"a" & 'b'</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn plain_paths_are_unchanged() {
        assert_eq!(escape_html("/srv/overlay/super.txt"), "/srv/overlay/super.txt");
    }
}
