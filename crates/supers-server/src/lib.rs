//! HTTP server for the supers file-to-event-stream bridge.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Push stream** (`GET /super/stream`) -- a long-lived
//!   `text/event-stream` response that pushes the watched file's trimmed
//!   content every time it changes
//! - **Super ingest** (`POST /super`) -- accepts the operator console's
//!   `text=<lower third>` form and writes it to the watched file
//! - **Status** (`GET /`, `GET /api/status`) -- minimal HTML page and a
//!   JSON view of the running configuration
//!
//! # Architecture
//!
//! Every stream connection owns its own
//! [`ChangeNotifier`](supers_core::ChangeNotifier) and polls the file on
//! its own cadence. There is no broadcast channel between connections;
//! when a client goes away the server drops its body stream and the
//! poll loop ends with it.

pub mod error;
pub mod handlers;
pub mod ingest;
pub mod router;
pub mod server;
pub mod state;
pub mod stream;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{serve, start_server, ServerError};
pub use state::AppState;
