//! CompletionService trait definition.
//!
//! The one abstraction over the text-completion backend. Uses RPITIT for
//! `complete` and a `Pin<Box<dyn Stream>>` for `stream` so the streaming
//! call shape stays object-safe.

use std::pin::Pin;

use futures_util::Stream;

use mobilia_types::llm::{CompletionRequest, CompletionResponse, LlmError, StreamEvent};

/// Trait for the text-completion backend the assistant consumes.
///
/// Two call shapes: a blocking short completion (intent classification) and
/// a streaming completion yielding ordered text fragments terminated by an
/// end-of-stream event. The implementation lives in mobilia-infra and is
/// constructed once at startup, never per request.
pub trait CompletionService: Send + Sync {
    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;

    /// Send a streaming completion request. Returns a stream of events.
    ///
    /// The stream is lazy, finite, and non-restartable; consumers forward
    /// fragments in order and stop on `StreamEvent::Done` or an error.
    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;
}
