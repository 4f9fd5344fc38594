//! Conversational assistant endpoints.
//!
//! POST /api/assistant/chat streams the assistant pipeline's events as SSE.
//! Each pipeline event becomes one SSE message whose event name is the
//! payload's `type` tag:
//! - `session` — `{ "session_id": "..." }`
//! - `delta` — incremental text of a general reply
//! - `results` — extracted criteria plus matching products (terminal)
//! - `reply` — full general reply (terminal)
//! - `error` — terminal failure; no `done` follows
//! - `done` — stream complete

use std::convert::Infallible;
use std::time::Duration;

use axum::Json;
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tokio_stream::Stream;

use mobilia_core::assistant::AssistantEvent;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for the streaming chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// Existing session id to continue; a new one is generated if absent.
    pub session_id: Option<String>,
}

/// POST /api/assistant/chat — SSE streaming assistant turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    if body.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let events = state.pipeline.respond(body.message, body.session_id);
    let sse_stream = events.map(|event| Ok::<_, Infallible>(to_sse_event(&event)));

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}

/// Frame one pipeline event as an SSE message.
fn to_sse_event(event: &AssistantEvent) -> Event {
    let name = match event {
        AssistantEvent::Session { .. } => "session",
        AssistantEvent::Delta { .. } => "delta",
        AssistantEvent::Reply { .. } => "reply",
        AssistantEvent::Results { .. } => "results",
        AssistantEvent::Error { .. } => "error",
        AssistantEvent::Done => "done",
    };
    Event::default()
        .event(name)
        .data(serde_json::to_string(event).unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub session_id: String,
}

/// GET /api/assistant/history?session_id=... — full session history.
pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let turns = state.history.history(&params.session_id).await?;
    Ok(Json(json!({
        "session_id": params.session_id,
        "count": turns.len(),
        "turns": turns,
    })))
}

/// Request body for clearing a session's history.
#[derive(Debug, Deserialize)]
pub struct ClearHistoryRequest {
    pub session_id: String,
}

/// DELETE /api/assistant/history — clear a session; body `{"session_id": ...}`.
pub async fn clear_history(
    State(state): State<AppState>,
    Json(body): Json<ClearHistoryRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = state.history.clear(&body.session_id).await?;
    Ok(Json(json!({
        "session_id": body.session_id,
        "deleted": deleted,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sse_event_names_match_payload_type_tag() {
        let cases: Vec<(AssistantEvent, &str)> = vec![
            (AssistantEvent::Session { session_id: "s".into() }, "session"),
            (AssistantEvent::Delta { text: "t".into() }, "delta"),
            (AssistantEvent::Reply { message: "m".into() }, "reply"),
            (AssistantEvent::Error { message: "e".into() }, "error"),
            (AssistantEvent::Done, "done"),
        ];
        for (event, expected) in cases {
            let payload = serde_json::to_value(&event).unwrap();
            assert_eq!(payload["type"], expected);
        }
    }

    #[test]
    fn clear_history_body_carries_session_id() {
        let body: ClearHistoryRequest =
            serde_json::from_value(serde_json::json!({ "session_id": "s1" })).unwrap();
        assert_eq!(body.session_id, "s1");

        // session_id is required, not defaulted.
        assert!(serde_json::from_value::<ClearHistoryRequest>(serde_json::json!({})).is_err());
    }
}
