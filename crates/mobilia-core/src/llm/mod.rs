//! Completion-service abstraction.

pub mod service;

pub use service::CompletionService;
