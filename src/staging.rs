//! Per-request scratch directories and filename sanitisation.
//!
//! ## Why a directory per request?
//!
//! The conversion engine requires a file-system path — it cannot stream from
//! the request body. Giving every request its own uniquely-named `TempDir`
//! means concurrent requests never contend for a path, and dropping the
//! [`ScratchDir`] deletes the upload *and* every intermediate artifact
//! (a transcoded PNG, the retained `converted.md`) in one recursive sweep,
//! even if the handler unwinds. Deletion failures are swallowed so cleanup
//! can never mask the response the client is owed.

use once_cell::sync::Lazy;
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Characters that survive sanitisation: ASCII word characters, dot, dash.
static FILENAME_UNSAFE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("filename regex is valid"));

/// Strip path-traversal segments and non-portable characters from a
/// client-supplied filename.
///
/// Path separators become word breaks, runs of whitespace collapse to a
/// single `_`, anything outside `[A-Za-z0-9_.-]` is dropped, and leading or
/// trailing `.`/`_` are trimmed. The final extension survives intact, so
/// `../../../etc/passwd.html` comes out as `etc_passwd.html`.
///
/// The result may be empty (e.g. input `"日本語"` or `"../.."`); callers must
/// treat that as an upload with no usable name.
pub fn sanitize_filename(raw: &str) -> String {
    let separators_as_spaces = raw.trim().replace(['/', '\\'], " ");
    let joined = separators_as_spaces
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    let kept = FILENAME_UNSAFE.replace_all(&joined, "");
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// A uniquely-named writable directory owned by a single request.
///
/// Created under the system temp root with a `file2md-` prefix. The
/// directory and all its contents are deleted when the value is dropped,
/// on every exit path including panics. [`ScratchDir::release`] deletes
/// eagerly and is idempotent.
pub struct ScratchDir {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl ScratchDir {
    /// Create a fresh scratch directory under the system temp root.
    pub fn create() -> io::Result<Self> {
        let dir = TempDir::with_prefix("file2md-")?;
        debug!("Created scratch dir: {}", dir.path().display());
        Ok(Self {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
        })
    }

    /// Create a scratch directory under `parent` instead of the system
    /// temp root. Used by tests to observe cleanup.
    pub fn create_in(parent: impl AsRef<Path>) -> io::Result<Self> {
        let dir = TempDir::with_prefix_in("file2md-", parent)?;
        Ok(Self {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
        })
    }

    /// The scratch directory's path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `bytes` under `relative_name` inside the scratch directory and
    /// return the resulting path.
    ///
    /// `relative_name` must already be sanitised (see [`sanitize_filename`]);
    /// this method joins it verbatim and does not re-sanitise.
    pub fn write(&self, relative_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.path.join(relative_name);
        std::fs::write(&path, bytes)?;
        debug!("Staged {} bytes at {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Delete the scratch directory now instead of waiting for drop.
    ///
    /// Idempotent: calling it again (or dropping afterwards) is a no-op.
    /// Unlike drop, this surfaces the deletion error for callers that
    /// want to know.
    pub fn release(&mut self) -> io::Result<()> {
        match self.dir.take() {
            Some(dir) => dir.close(),
            None => Ok(()),
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        // TempDir's own drop deletes recursively, ignoring errors.
        if self.dir.is_some() {
            debug!("Releasing scratch dir: {}", self.path.display());
        }
    }
}
