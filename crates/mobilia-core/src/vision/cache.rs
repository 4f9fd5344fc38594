//! Feature cache service.
//!
//! Maintains a ready-to-query mapping from active, image-bearing products to
//! embeddings. One global cache entry with a fixed TTL: recomputing the full
//! catalog per request is too expensive, and product images change far less
//! often than searches run, so coarse time-based staleness is the trade.
//! There is no per-product invalidation; a product update is invisible until
//! the next expiry or forced refresh.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use mobilia_types::catalog::ProductCard;
use mobilia_types::error::RepositoryError;

use crate::catalog::CatalogRepository;
use crate::media::MediaStore;
use crate::vision::embedder::ImageEmbedder;
use crate::vision::similarity::rank_by_similarity;

/// A product's cached embedding alongside the product card it belongs to.
#[derive(Debug, Clone)]
pub struct ProductFeatures {
    pub product_id: i64,
    pub card: ProductCard,
    pub embedding: Vec<f32>,
}

struct CacheEntry {
    computed_at: Instant,
    features: Arc<Vec<ProductFeatures>>,
}

/// Caches per-product image embeddings and ranks query images against them.
///
/// Concurrent force-refreshes race last-writer-wins; no lock is held across
/// the recompute because recomputation is idempotent and convergent.
pub struct FeatureCache<E, C, M> {
    embedder: E,
    catalog: C,
    media: M,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl<E, C, M> FeatureCache<E, C, M>
where
    E: ImageEmbedder,
    C: CatalogRepository,
    M: MediaStore,
{
    pub fn new(embedder: E, catalog: C, media: M, ttl: Duration) -> Self {
        Self {
            embedder,
            catalog,
            media,
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Embed one image, swallowing per-image failures.
    ///
    /// Returns `None` on any I/O, decode, or inference error so callers can
    /// skip the item without failing the batch.
    pub async fn extract_features(&self, path: &Path) -> Option<Vec<f32>> {
        match self.embedder.embed(path).await {
            Ok(embedding) => Some(embedding),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "feature extraction failed, skipping");
                None
            }
        }
    }

    /// Return the cached feature mapping, recomputing when absent, expired,
    /// or forced.
    ///
    /// Per-product failures (missing image, bad file, inference error) skip
    /// that product; only catalog access failures propagate.
    pub async fn get_product_features(
        &self,
        force_refresh: bool,
    ) -> Result<Arc<Vec<ProductFeatures>>, RepositoryError> {
        if !force_refresh {
            let guard = self.entry.read().await;
            if let Some(entry) = guard.as_ref() {
                if entry.computed_at.elapsed() < self.ttl {
                    return Ok(Arc::clone(&entry.features));
                }
            }
        }

        let products = self.catalog.list_active_with_primary_image().await?;
        let mut features = Vec::with_capacity(products.len());

        for item in products {
            let Some(path) = self.media.resolve(&item.image_path) else {
                debug!(image = %item.image_path, "image missing from media store, skipping");
                continue;
            };
            if let Some(embedding) = self.extract_features(&path).await {
                features.push(ProductFeatures {
                    product_id: item.card.id,
                    card: item.card,
                    embedding,
                });
            }
        }

        let features = Arc::new(features);
        let mut guard = self.entry.write().await;
        *guard = Some(CacheEntry {
            computed_at: Instant::now(),
            features: Arc::clone(&features),
        });

        debug!(products = features.len(), "feature cache recomputed");
        Ok(features)
    }

    /// Force a recompute and return how many products were embedded.
    pub async fn refresh(&self) -> Result<usize, RepositoryError> {
        Ok(self.get_product_features(true).await?.len())
    }

    /// Rank the catalog against a query image.
    ///
    /// Returns the top `top_k` `(product, similarity)` pairs in non-increasing
    /// similarity order, or an empty list when query embedding fails.
    pub async fn find_similar_products(
        &self,
        query_image: &Path,
        top_k: usize,
    ) -> Result<Vec<(ProductCard, f32)>, RepositoryError> {
        let Some(query) = self.extract_features(query_image).await else {
            warn!(path = %query_image.display(), "query image could not be embedded");
            return Ok(Vec::new());
        };

        let features = self.get_product_features(false).await?;
        if features.is_empty() {
            return Ok(Vec::new());
        }

        let ranked = rank_by_similarity(
            &query,
            features.iter().map(|f| f.embedding.as_slice()),
        );

        Ok(ranked
            .into_iter()
            .take(top_k)
            .map(|(idx, score)| (features[idx].card.clone(), score))
            .collect())
    }
}
