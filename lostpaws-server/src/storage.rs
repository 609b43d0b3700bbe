//! Photo storage collaborator
//!
//! The repositories never touch file bytes; this module owns the
//! uploads directory, the allowed-extension check, and best-effort
//! removal when a listing is deleted. Only the stored filename (or its
//! absence) crosses into the database layer.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

/// Extensions accepted for listing photos
const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Characters kept in stored filenames; runs of anything else collapse
/// to a single underscore.
static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("invalid filename regex"));

/// Stores uploaded listing photos under a single directory.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    /// Open a store rooted at `root`, creating the directory if missing.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory the photos live in; also served statically at /uploads.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a client filename carries an accepted image extension.
    pub fn allowed_file(name: &str) -> bool {
        name.rsplit_once('.')
            .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }

    /// Persist uploaded bytes under a timestamped, sanitized name and
    /// return that name.
    ///
    /// Returns `Ok(None)` when the client name fails the extension
    /// check; the caller stores the listing without a photo in that
    /// case rather than rejecting it.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> io::Result<Option<String>> {
        if original_name.is_empty() || !Self::allowed_file(original_name) {
            return Ok(None);
        }

        let stored = format!(
            "{}{}",
            Utc::now().format("%Y%m%d_%H%M%S_"),
            sanitize(original_name)
        );
        tokio::fs::write(self.root.join(&stored), bytes).await?;

        Ok(Some(stored))
    }

    /// Remove a stored photo, best-effort.
    ///
    /// An already-absent file is logged and ignored: photo removal must
    /// never block deleting the listing row it belonged to.
    pub async fn remove(&self, name: &str) {
        let path = self.root.join(sanitize(name));
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(photo = %path.display(), "could not remove photo file: {}", e);
        }
    }
}

/// Strip any path components and collapse unsafe characters, so a
/// hostile client filename cannot escape the uploads directory.
fn sanitize(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    UNSAFE_CHARS.replace_all(base, "_").trim_matches('_').to_string()
}
