//! Super text ingest.
//!
//! The operator console sends the next lower third as an
//! `application/x-www-form-urlencoded` body `text=<lower third>`. The
//! text is stored in the watched file, and every open push stream picks
//! it up on its next poll.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Form body of `POST /super`.
#[derive(Debug, serde::Deserialize)]
pub struct SuperForm {
    /// The new super text, stored as-is.
    pub text: String,
}

/// Replace the watched file's content with the posted text.
///
/// # Route
///
/// `POST /super`
pub async fn post_super(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SuperForm>,
) -> Result<StatusCode, ApiError> {
    if !state.ingest_enabled {
        return Err(ApiError::Forbidden(String::from(
            "super ingest is disabled",
        )));
    }

    write_atomically(&state.watched_path, form.text.as_bytes()).await?;
    info!(
        path = %state.watched_path.display(),
        chars = form.text.chars().count(),
        "Super text updated"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Write `contents` to `path` through a sibling temp file and a rename.
///
/// Pollers reading `path` concurrently see either the old or the new
/// content, never a partially written file.
pub async fn write_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let tmp = temp_sibling(path);
    if let Err(e) = tokio::fs::write(&tmp, contents).await {
        discard_temp(&tmp).await;
        return Err(e);
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        discard_temp(&tmp).await;
        return Err(e);
    }
    Ok(())
}

/// Remove a temp file left by a failed write. A file that was never
/// created is not an error.
async fn discard_temp(tmp: &Path) {
    match tokio::fs::remove_file(tmp).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            warn!(path = %tmp.display(), error = %e, "Failed to remove temp super file");
        }
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{}.tmp", Uuid::now_v7()));
    PathBuf::from(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("super.txt");
        std::fs::write(&path, "old text that is longer").unwrap();

        write_atomically(&path, b"new").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[tokio::test]
    async fn leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("super.txt");

        write_atomically(&path, b"hello").await.unwrap();
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn missing_parent_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("super.txt");
        assert!(write_atomically(&path, b"hello").await.is_err());
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("super.txt");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        assert!(write_atomically(&path, b"hello").await.is_err());
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn discarding_a_missing_temp_file_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        discard_temp(&dir.path().join("never-written.tmp")).await;
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn temp_file_sits_next_to_target() {
        let tmp = temp_sibling(Path::new("/srv/overlay/super.txt"));
        assert_eq!(tmp.parent(), Some(Path::new("/srv/overlay")));
        assert!(tmp.to_string_lossy().ends_with(".tmp"));
    }
}
