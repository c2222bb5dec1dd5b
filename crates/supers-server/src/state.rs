//! Shared application state for the HTTP server.
//!
//! [`AppState`] is built once from [`SupersConfig`] and is read-only
//! afterwards. It carries no per-connection data: each stream
//! connection builds its own notifier from it.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use supers_core::{ChangeNotifier, SupersConfig};

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// File streamed to clients and written by the ingest endpoint.
    pub watched_path: PathBuf,
    /// Time between two polls on each stream connection.
    pub poll_interval: Duration,
    /// Whether `POST /super` may write the watched file.
    pub ingest_enabled: bool,
    /// When the server state was created.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Build the state from loaded configuration.
    pub fn new(config: &SupersConfig) -> Self {
        Self {
            watched_path: config.watch.path.clone(),
            poll_interval: config.watch.poll_interval(),
            ingest_enabled: config.ingest.enabled,
            started_at: Utc::now(),
        }
    }

    /// A fresh notifier for one stream connection.
    pub fn notifier(&self) -> ChangeNotifier {
        ChangeNotifier::new(self.watched_path.clone())
    }

    /// The poll interval in whole milliseconds.
    pub fn poll_interval_ms(&self) -> u64 {
        u64::try_from(self.poll_interval.as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_mirrors_config() {
        let mut config = SupersConfig::default();
        config.watch.poll_interval_ms = 250;
        config.ingest.enabled = false;

        let state = AppState::new(&config);
        assert_eq!(state.watched_path, PathBuf::from("super.txt"));
        assert_eq!(state.poll_interval_ms(), 250);
        assert!(!state.ingest_enabled);
    }

    #[test]
    fn notifiers_start_empty() {
        let state = AppState::new(&SupersConfig::default());
        let notifier = state.notifier();
        assert_eq!(notifier.last_seen(), "");
        assert_eq!(notifier.path(), state.watched_path.as_path());
    }
}
