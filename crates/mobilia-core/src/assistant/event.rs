//! Events emitted by the assistant pipeline.
//!
//! The HTTP layer frames each event as one SSE message. `Reply`, `Results`,
//! and `Error` are terminal payloads; `Done` always closes a successful
//! stream, while `Error` ends the stream immediately.

use serde::Serialize;

use mobilia_types::catalog::ProductCard;
use mobilia_types::search::SearchCriteria;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantEvent {
    /// First event: the session id this turn belongs to (generated when the
    /// client did not supply one).
    Session { session_id: String },

    /// Incremental fragment of a general reply. Product-search generations
    /// never emit deltas; their output is delivered whole in `Results`.
    Delta { text: String },

    /// Terminal event for general conversation: the full reply text.
    Reply { message: String },

    /// Terminal event for a product search: the extracted criteria and the
    /// matching products (first 10 of up to 20 found).
    Results {
        criteria: SearchCriteria,
        products_found: usize,
        products: Vec<ProductCard>,
    },

    /// Terminal error; the stream ends without a `Done`.
    Error { message: String },

    /// Stream complete.
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_string(&AssistantEvent::Delta { text: "hi".into() }).unwrap();
        assert_eq!(json, r#"{"type":"delta","text":"hi"}"#);

        let json = serde_json::to_string(&AssistantEvent::Done).unwrap();
        assert_eq!(json, r#"{"type":"done"}"#);
    }
}
