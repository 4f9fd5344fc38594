//! Chat history types for the product-search assistant.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a turn was resolved: a product search or plain conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    ProductSearch,
    NormalResponse,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::ProductSearch => write!(f, "product_search"),
            MessageType::NormalResponse => write!(f, "normal_response"),
        }
    }
}

impl FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product_search" => Ok(MessageType::ProductSearch),
            "normal_response" => Ok(MessageType::NormalResponse),
            other => Err(format!("invalid message type: '{other}'")),
        }
    }
}

/// One request/response pair in the append-only conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: Uuid,
    pub session_id: String,
    pub user_message: String,
    pub assistant_response: String,
    pub message_type: MessageType,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    /// Build a new turn with a time-sortable id and the current timestamp.
    pub fn new(
        session_id: String,
        user_message: String,
        assistant_response: String,
        message_type: MessageType,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            user_message,
            assistant_response,
            message_type,
            created_at: Utc::now(),
        }
    }
}
