//! Chat history persistence: repository trait and service.

pub mod repository;
pub mod service;

pub use repository::ChatRepository;
pub use service::ChatHistoryService;
