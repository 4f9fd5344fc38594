//! Local filesystem media store.

use std::path::{Path, PathBuf};

use mobilia_core::media::MediaStore;

/// Resolves stored image references against a media root directory.
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MediaStore for LocalMediaStore {
    fn resolve(&self, image_path: &str) -> Option<PathBuf> {
        // Stored references are relative; reject anything that escapes the root.
        let relative = Path::new(image_path);
        if relative.is_absolute()
            || relative.components().any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return None;
        }
        let full = self.root.join(relative);
        full.is_file().then_some(full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("products")).unwrap();
        std::fs::write(dir.path().join("products/oak.jpg"), b"jpeg").unwrap();

        let store = LocalMediaStore::new(dir.path());
        let resolved = store.resolve("products/oak.jpg").unwrap();
        assert!(resolved.ends_with("products/oak.jpg"));
    }

    #[test]
    fn missing_files_resolve_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path());
        assert!(store.resolve("products/gone.jpg").is_none());
    }

    #[test]
    fn traversal_outside_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"x").unwrap();
        let media = dir.path().join("media");
        std::fs::create_dir_all(&media).unwrap();

        let store = LocalMediaStore::new(&media);
        assert!(store.resolve("../secret.txt").is_none());
        assert!(store.resolve("/etc/hosts").is_none());
    }
}
