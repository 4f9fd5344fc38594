//! ImageEmbedder trait for image-to-vector conversion.

use std::path::Path;

use mobilia_types::error::EmbedError;

/// Converts an image file into a fixed-length embedding vector.
///
/// Uses RPITIT; the pretrained-CNN implementation lives in mobilia-infra.
/// The model is fixed (never trained here); one embedder instance is shared
/// for the process lifetime.
pub trait ImageEmbedder: Send + Sync {
    /// Embed the image at `path`.
    ///
    /// Any I/O, decode, or inference failure is an `Err`; callers treat
    /// per-image failures as skippable.
    fn embed(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbedError>> + Send;

    /// The model identifier (e.g., "resnet50").
    fn model_name(&self) -> &str;

    /// Dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
