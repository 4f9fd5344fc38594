//! Image-similarity subsystem: embedder trait, cosine ranking, feature cache.

pub mod cache;
pub mod embedder;
pub mod similarity;

pub use cache::{FeatureCache, ProductFeatures};
pub use embedder::ImageEmbedder;
