//! Media storage abstraction.

use std::path::PathBuf;

/// Resolves stored image references to readable local paths.
///
/// Returns `None` for missing files rather than erroring, so callers can
/// skip products whose images have gone away.
pub trait MediaStore: Send + Sync {
    fn resolve(&self, image_path: &str) -> Option<PathBuf>;
}
