//! Image embedding implementations.

pub mod fastembed;

pub use fastembed::FastEmbedImageEmbedder;
