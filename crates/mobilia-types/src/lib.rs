//! Shared domain types for Mobilia.
//!
//! Pure data: catalog entities, chat history records, LLM request/response
//! shapes, search criteria, configuration, and error enums. No I/O here;
//! repository traits live in `mobilia-core`, implementations in
//! `mobilia-infra`.

pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod search;
