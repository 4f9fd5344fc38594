//! Business logic for Mobilia.
//!
//! Defines the service/repository traits (implemented in `mobilia-infra`)
//! and the two core subsystems: the image-feature cache with cosine-similarity
//! ranking, and the conversational product-search pipeline.

pub mod assistant;
pub mod catalog;
pub mod chat;
pub mod llm;
pub mod media;
pub mod vision;
