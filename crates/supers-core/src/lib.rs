//! Core of the supers file-to-event-stream bridge.
//!
//! A client holds a long-lived HTTP connection open and receives the
//! trimmed content of a watched text file every time that content
//! changes. This crate holds everything below the HTTP layer:
//!
//! - [`notifier`] -- the per-connection poll loop ([`ChangeNotifier`]
//!   and [`change_stream`])
//! - [`snapshot`] -- read-or-empty file access and trimming
//! - [`frame`] -- the `data: <content>\n\n` push frame
//! - [`config`] -- typed `supers-config.yaml` configuration
//!
//! Each connection owns its own [`ChangeNotifier`]. There is no shared
//! broadcast: N clients perform N independent reads per poll interval.

pub mod config;
pub mod frame;
pub mod notifier;
pub mod snapshot;

pub use config::{ConfigError, SupersConfig};
pub use frame::PushFrame;
pub use notifier::{change_stream, ChangeNotifier, DEFAULT_POLL_INTERVAL};
pub use snapshot::read_or_empty;
