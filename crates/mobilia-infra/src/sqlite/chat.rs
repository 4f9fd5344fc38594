//! SQLite chat repository implementation.
//!
//! Append-only conversation log with the same Row-struct mapping pattern as
//! the catalog repository. Timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use mobilia_core::chat::repository::ChatRepository;
use mobilia_types::chat::{ChatTurn, MessageType};
use mobilia_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ChatTurnRow {
    id: String,
    session_id: String,
    user_message: String,
    assistant_response: String,
    message_type: String,
    created_at: String,
}

impl ChatTurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            user_message: row.try_get("user_message")?,
            assistant_response: row.try_get("assistant_response")?,
            message_type: row.try_get("message_type")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_turn(self) -> Result<ChatTurn, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid turn id: {e}")))?;
        let message_type: MessageType = self
            .message_type
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))?;

        Ok(ChatTurn {
            id,
            session_id: self.session_id,
            user_message: self.user_message,
            assistant_response: self.assistant_response,
            message_type,
            created_at,
        })
    }
}

impl ChatRepository for SqliteChatRepository {
    async fn append(&self, turn: &ChatTurn) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO chat_turns (id, session_id, user_message, assistant_response, message_type, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(turn.id.to_string())
        .bind(&turn.session_id)
        .bind(&turn.user_message)
        .bind(&turn.assistant_response)
        .bind(turn.message_type.to_string())
        .bind(turn.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn history(&self, session_id: &str) -> Result<Vec<ChatTurn>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_turns WHERE session_id = ? ORDER BY created_at, id",
        )
        .bind(session_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                ChatTurnRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_turn()
            })
            .collect()
    }

    async fn recent(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatTurn>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_turns WHERE session_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(session_id)
        .bind(limit as i64)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                ChatTurnRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_turn()
            })
            .collect()
    }

    async fn clear(&self, session_id: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_turns WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
