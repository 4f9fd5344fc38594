//! The assistant pipeline: intent classification, streamed generation,
//! catalog search, and history persistence, emitted as one event stream.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use futures_util::{Stream, StreamExt};
use tracing::{debug, warn};

use mobilia_types::chat::MessageType;
use mobilia_types::config::AssistantConfig;
use mobilia_types::llm::{CompletionRequest, LlmError, Message, StreamEvent};
use mobilia_types::search::CriteriaParse;

use crate::assistant::criteria::parse_criteria;
use crate::assistant::event::AssistantEvent;
use crate::assistant::intent::Intent;
use crate::assistant::prompt;
use crate::catalog::filter::build_filter;
use crate::catalog::repository::CatalogRepository;
use crate::chat::repository::ChatRepository;
use crate::chat::service::ChatHistoryService;
use crate::llm::CompletionService;

/// How many matches the catalog search fetches.
const SEARCH_FETCH_LIMIT: usize = 20;
/// How many of those are returned to the client.
const RESULTS_RETURNED: usize = 10;
/// The classifier answers one word; anything longer is padding.
const INTENT_MAX_TOKENS: u32 = 8;
/// Shown when the model declines a search without offering its own text;
/// the raw structured output is not user-facing.
const DECLINED_SEARCH_REPLY: &str =
    "I couldn't match that to our catalog. Could you tell me more about the furniture you're looking for?";

/// Orchestrates one assistant turn end to end.
///
/// Generic over its three seams so tests can script the completion backend
/// and run against in-memory repositories.
pub struct AssistantPipeline<S, C, H>
where
    S: CompletionService,
    C: CatalogRepository,
    H: ChatRepository,
{
    completion: Arc<S>,
    catalog: Arc<C>,
    history: Arc<ChatHistoryService<H>>,
    config: AssistantConfig,
}

impl<S, C, H> AssistantPipeline<S, C, H>
where
    S: CompletionService + 'static,
    C: CatalogRepository + 'static,
    H: ChatRepository + 'static,
{
    pub fn new(
        completion: Arc<S>,
        catalog: Arc<C>,
        history: Arc<ChatHistoryService<H>>,
        config: AssistantConfig,
    ) -> Self {
        Self { completion, catalog, history, config }
    }

    /// Run one turn and emit the event stream the HTTP layer frames as SSE.
    ///
    /// Event order: `Session` first, then for general intent zero or more
    /// `Delta`s followed by `Reply`, or for product intent a single
    /// `Results`, then `Done`. On failure a single `Error` ends the stream
    /// with no `Done` and nothing written to history. The turn is persisted
    /// only after the terminal `Reply`/`Results` has been yielded.
    pub fn respond(
        &self,
        user_message: String,
        session_id: Option<String>,
    ) -> Pin<Box<dyn Stream<Item = AssistantEvent> + Send + 'static>> {
        let completion = Arc::clone(&self.completion);
        let catalog = Arc::clone(&self.catalog);
        let history = Arc::clone(&self.history);
        let config = self.config.clone();

        Box::pin(stream! {
            let session_id = session_id
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(generate_session_id);
            yield AssistantEvent::Session { session_id: session_id.clone() };

            let deadline = Duration::from_secs(config.completion_timeout_secs);

            let context = match history.context_messages(&session_id, config.history_turns).await {
                Ok(messages) => messages,
                Err(err) => {
                    warn!(%session_id, error = %err, "history unavailable, continuing without context");
                    Vec::new()
                }
            };

            let categories = match catalog.category_names().await {
                Ok(names) => names,
                Err(err) => {
                    yield AssistantEvent::Error { message: err.to_string() };
                    return;
                }
            };
            let colors = match catalog.color_names().await {
                Ok(names) => names,
                Err(err) => {
                    yield AssistantEvent::Error { message: err.to_string() };
                    return;
                }
            };

            let mut messages = context;
            messages.push(Message::user(user_message.clone()));

            let intent_request = CompletionRequest {
                model: config.model.clone(),
                messages: messages.clone(),
                system: Some(prompt::intent_prompt(&config.site_name)),
                max_tokens: INTENT_MAX_TOKENS,
                temperature: Some(0.0),
                stream: false,
            };
            let intent = match tokio::time::timeout(deadline, completion.complete(&intent_request)).await {
                Ok(Ok(response)) => Intent::from_classifier_output(&response.content),
                Ok(Err(err)) => {
                    yield AssistantEvent::Error { message: err.to_string() };
                    return;
                }
                Err(_) => {
                    let err = LlmError::Timeout(config.completion_timeout_secs);
                    yield AssistantEvent::Error { message: err.to_string() };
                    return;
                }
            };
            debug!(%session_id, ?intent, "intent classified");

            let system = match intent {
                Intent::ProductSearch => prompt::criteria_prompt(&config.site_name, &categories, &colors),
                Intent::General => prompt::general_prompt(&config.site_name, &categories),
            };
            let request = CompletionRequest {
                model: config.model.clone(),
                messages,
                system: Some(system),
                max_tokens: config.max_tokens,
                temperature: Some(config.temperature),
                stream: true,
            };

            // Criteria generations accumulate silently; general replies are
            // forwarded fragment by fragment.
            let mut fragments = completion.stream(request);
            let mut full_response = String::new();
            loop {
                match tokio::time::timeout(deadline, fragments.next()).await {
                    Ok(Some(Ok(StreamEvent::TextDelta { text }))) => {
                        full_response.push_str(&text);
                        if intent == Intent::General {
                            yield AssistantEvent::Delta { text };
                        }
                    }
                    Ok(Some(Ok(StreamEvent::Done))) | Ok(None) => break,
                    Ok(Some(Err(err))) => {
                        yield AssistantEvent::Error { message: err.to_string() };
                        return;
                    }
                    Err(_) => {
                        let err = LlmError::Timeout(config.completion_timeout_secs);
                        yield AssistantEvent::Error { message: err.to_string() };
                        return;
                    }
                }
            }

            let (terminal, message_type) = match intent {
                Intent::General => {
                    (AssistantEvent::Reply { message: full_response.clone() }, MessageType::NormalResponse)
                }
                Intent::ProductSearch => match parse_criteria(&full_response) {
                    CriteriaParse::Parsed(criteria) if criteria.product_search => {
                        let filter = build_filter(&criteria);
                        let products = match catalog.search_by_criteria(&filter, SEARCH_FETCH_LIMIT).await {
                            Ok(products) => products,
                            Err(err) => {
                                yield AssistantEvent::Error { message: err.to_string() };
                                return;
                            }
                        };
                        let products_found = products.len();
                        let products = products.into_iter().take(RESULTS_RETURNED).collect();
                        debug!(%session_id, products_found, "catalog search complete");
                        (
                            AssistantEvent::Results { criteria, products_found, products },
                            MessageType::ProductSearch,
                        )
                    }
                    CriteriaParse::Parsed(criteria) => {
                        let message = criteria
                            .message
                            .unwrap_or_else(|| DECLINED_SEARCH_REPLY.to_string());
                        (AssistantEvent::Reply { message }, MessageType::NormalResponse)
                    }
                    CriteriaParse::Unparsable(raw) => {
                        (AssistantEvent::Reply { message: raw }, MessageType::NormalResponse)
                    }
                },
            };
            yield terminal;

            if let Err(err) = history
                .save_turn(&session_id, user_message, full_response, message_type)
                .await
            {
                warn!(%session_id, error = %err, "failed to persist chat turn");
            }

            yield AssistantEvent::Done;
        })
    }
}

/// Timestamp-derived session id for clients that did not send one.
fn generate_session_id() -> String {
    format!("session-{}", chrono::Utc::now().timestamp_millis())
}
