use thiserror::Error;

/// Errors from repository operations (used by trait definitions in mobilia-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    /// A uniqueness rule rejected the write (e.g. a second review of the
    /// same product by the same reviewer).
    #[error("{0}")]
    Conflict(String),
}

/// Errors from image embedding.
///
/// Per-image failures are skippable by design: callers exclude the image and
/// continue. Only `ModelUnavailable` indicates the extractor itself is broken.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("image not readable: {0}")]
    Unreadable(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn embed_error_display() {
        let err = EmbedError::Unreadable("products/missing.jpg".to_string());
        assert!(err.to_string().contains("missing.jpg"));
    }
}
