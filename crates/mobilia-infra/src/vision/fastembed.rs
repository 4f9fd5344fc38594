//! ResNet50 image embedder backed by fastembed's ONNX runtime.
//!
//! The pretrained model is loaded once at startup and shared for the
//! process lifetime. Inference is CPU-bound, so it runs on the blocking
//! thread pool rather than the async executor.

use std::path::Path;
use std::sync::{Arc, Mutex};

use fastembed::{ImageEmbedding, ImageEmbeddingModel, ImageInitOptions};
use tracing::info;

use mobilia_core::vision::ImageEmbedder;
use mobilia_types::error::EmbedError;

const MODEL_NAME: &str = "resnet50";
const DIMENSION: usize = 2048;

/// [`ImageEmbedder`] producing 2048-dimensional ResNet50 feature vectors.
pub struct FastEmbedImageEmbedder {
    model: Arc<Mutex<ImageEmbedding>>,
}

impl FastEmbedImageEmbedder {
    /// Load the pretrained model. Downloads weights on first use; fails
    /// with `ModelUnavailable` when the model cannot be initialized.
    pub fn new() -> Result<Self, EmbedError> {
        let options = ImageInitOptions::new(ImageEmbeddingModel::Resnet50);
        let model = ImageEmbedding::try_new(options)
            .map_err(|e| EmbedError::ModelUnavailable(e.to_string()))?;
        info!(model = MODEL_NAME, dimension = DIMENSION, "image embedding model loaded");
        Ok(Self { model: Arc::new(Mutex::new(model)) })
    }
}

impl ImageEmbedder for FastEmbedImageEmbedder {
    async fn embed(&self, path: &Path) -> Result<Vec<f32>, EmbedError> {
        if !path.is_file() {
            return Err(EmbedError::Unreadable(path.display().to_string()));
        }

        let model = Arc::clone(&self.model);
        let image = path.to_string_lossy().into_owned();

        let embedding = tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|e| EmbedError::Inference(format!("model lock poisoned: {e}")))?;
            let mut batch = model
                .embed(vec![image], None)
                .map_err(|e| EmbedError::Inference(e.to_string()))?;
            batch
                .pop()
                .ok_or_else(|| EmbedError::Inference("empty embedding batch".to_string()))
        })
        .await
        .map_err(|e| EmbedError::Inference(format!("inference task failed: {e}")))??;

        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }
}
