//! Conversational product-search pipeline.
//!
//! Two generations per request: a blocking intent classification, then a
//! streamed generation that is either structured criteria extraction
//! (delivered atomically) or a general reply (streamed live).

pub mod criteria;
pub mod event;
pub mod intent;
pub mod pipeline;
pub mod prompt;

pub use event::AssistantEvent;
pub use intent::Intent;
pub use pipeline::AssistantPipeline;
