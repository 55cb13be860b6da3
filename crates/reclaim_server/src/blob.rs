//! Blob storage for uploaded images.
//!
//! The rest of the system treats the returned reference as an opaque
//! string; only this module knows it is a path-shaped name.

use std::path::{Path, PathBuf};

use tracing::warn;

/// Stores uploaded bytes and hands back an opaque reference.
pub trait BlobStore: Send + Sync {
    fn store(&self, bytes: &[u8], original_name: &str) -> std::io::Result<String>;
}

/// Filesystem-backed blob store.
///
/// Files are named by upload time plus the original extension, so
/// references never leak the uploader's file name.
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl BlobStore for FsBlobStore {
    fn store(&self, bytes: &[u8], original_name: &str) -> std::io::Result<String> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| format!(".{e}"))
            .unwrap_or_default();

        let name = format!("{}{ext}", chrono::Utc::now().timestamp_millis());
        let path = self.dir.join(&name);

        if let Err(e) = std::fs::write(&path, bytes) {
            // Best-effort cleanup of a partial file; its own failure is
            // logged, not surfaced.
            if let Err(cleanup) = std::fs::remove_file(&path) {
                warn!(path = %path.display(), error = %cleanup, "Failed to remove partial upload");
            }
            return Err(e);
        }

        Ok(format!("/uploads/{name}"))
    }
}
