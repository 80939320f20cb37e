//! Filesystem storage for uploaded materials
//!
//! Files land under `<upload_root>/materials/<uuid><ext>`; the relative
//! path is what gets persisted on the material row and served back at
//! `/uploads/...`. Deletion is best-effort: a failed unlink is logged and
//! never turned into a caller-visible error.

use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

/// Subdirectory of the upload root that material files go into
const MATERIALS_SUBDIR: &str = "materials";

/// Filesystem-backed store for uploaded material files
#[derive(Debug, Clone)]
pub struct MaterialStore {
    root: PathBuf,
}

impl MaterialStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The upload root this store writes under (served at `/uploads`)
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path for a stored relative path
    fn disk_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write an uploaded file, returning its relative path.
    ///
    /// The stored name is a fresh UUID carrying over the original
    /// extension, so uploads can never collide or traverse directories.
    pub async fn store(
        &self,
        original_filename: &str,
        data: &[u8],
    ) -> Result<String, std::io::Error> {
        let ext = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();
        let name = format!("{}{}", Uuid::new_v4().simple(), ext);
        let relative = format!("{}/{}", MATERIALS_SUBDIR, name);

        let path = self.disk_path(&relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;

        tracing::debug!(
            size = data.len(),
            path = %path.display(),
            "Material file stored"
        );
        Ok(relative)
    }

    /// Remove a stored file, best-effort. Never fails the caller.
    pub async fn delete_best_effort(&self, relative: &str) {
        let path = self.disk_path(relative);
        match fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Material file removed"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove material file")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_writes_file_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = MaterialStore::new(dir.path().to_path_buf());

        let relative = store.store("Worksheet.PDF", b"content").await.unwrap();
        assert!(relative.starts_with("materials/"));
        assert!(relative.ends_with(".pdf"));

        let bytes = fs::read(dir.path().join(&relative)).await.unwrap();
        assert_eq!(bytes, b"content");
    }

    #[tokio::test]
    async fn test_store_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = MaterialStore::new(dir.path().to_path_buf());

        let relative = store.store("README", b"x").await.unwrap();
        assert!(!relative.contains('.'));
    }

    #[tokio::test]
    async fn test_stored_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let store = MaterialStore::new(dir.path().to_path_buf());

        let a = store.store("a.txt", b"1").await.unwrap();
        let b = store.store("a.txt", b"2").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_delete_best_effort_swallows_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = MaterialStore::new(dir.path().to_path_buf());

        // Does not panic or error on a path that was never written
        store.delete_best_effort("materials/nope.pdf").await;

        let relative = store.store("a.txt", b"1").await.unwrap();
        store.delete_best_effort(&relative).await;
        assert!(!dir.path().join(&relative).exists());
    }
}
