//! Chat history service.
//!
//! Thin orchestration over [`ChatRepository`]: turn persistence, full-history
//! retrieval, bounded LLM-context windows, and bulk session clearing.

use tracing::info;

use mobilia_types::chat::{ChatTurn, MessageType};
use mobilia_types::error::RepositoryError;
use mobilia_types::llm::Message;

use crate::chat::repository::ChatRepository;

/// Orchestrates chat-turn persistence and context-window construction.
pub struct ChatHistoryService<R: ChatRepository> {
    repo: R,
}

impl<R: ChatRepository> ChatHistoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persist one completed turn.
    pub async fn save_turn(
        &self,
        session_id: &str,
        user_message: String,
        assistant_response: String,
        message_type: MessageType,
    ) -> Result<ChatTurn, RepositoryError> {
        let turn = ChatTurn::new(
            session_id.to_string(),
            user_message,
            assistant_response,
            message_type,
        );
        self.repo.append(&turn).await?;
        Ok(turn)
    }

    /// Full chronological history for a session.
    pub async fn history(&self, session_id: &str) -> Result<Vec<ChatTurn>, RepositoryError> {
        self.repo.history(session_id).await
    }

    /// The last `limit` turns as alternating user/assistant messages in
    /// chronological order, ready to seed LLM context.
    ///
    /// The repository returns newest-first; reversing restores chronology
    /// so the alternation invariant holds.
    pub async fn context_messages(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError> {
        let mut turns = self.repo.recent(session_id, limit).await?;
        turns.reverse();

        let mut messages = Vec::with_capacity(turns.len() * 2);
        for turn in turns {
            messages.push(Message::user(turn.user_message));
            messages.push(Message::assistant(turn.assistant_response));
        }
        Ok(messages)
    }

    /// Delete a session's history. Returns the deleted count.
    pub async fn clear(&self, session_id: &str) -> Result<u64, RepositoryError> {
        let deleted = self.repo.clear(session_id).await?;
        info!(session_id, deleted, "chat history cleared");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use mobilia_types::llm::MessageRole;

    /// In-memory repository preserving insertion order.
    #[derive(Default)]
    struct MemoryRepo {
        turns: Mutex<Vec<ChatTurn>>,
    }

    impl ChatRepository for MemoryRepo {
        async fn append(&self, turn: &ChatTurn) -> Result<(), RepositoryError> {
            self.turns.lock().unwrap().push(turn.clone());
            Ok(())
        }

        async fn history(&self, session_id: &str) -> Result<Vec<ChatTurn>, RepositoryError> {
            Ok(self
                .turns
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.session_id == session_id)
                .cloned()
                .collect())
        }

        async fn recent(
            &self,
            session_id: &str,
            limit: usize,
        ) -> Result<Vec<ChatTurn>, RepositoryError> {
            let mut all = self.history(session_id).await?;
            all.reverse();
            all.truncate(limit);
            Ok(all)
        }

        async fn clear(&self, session_id: &str) -> Result<u64, RepositoryError> {
            let mut turns = self.turns.lock().unwrap();
            let before = turns.len();
            turns.retain(|t| t.session_id != session_id);
            Ok((before - turns.len()) as u64)
        }
    }

    #[tokio::test]
    async fn context_messages_alternate_and_stay_chronological() {
        let service = ChatHistoryService::new(MemoryRepo::default());
        for i in 0..5 {
            service
                .save_turn("s1", format!("q{i}"), format!("a{i}"), MessageType::NormalResponse)
                .await
                .unwrap();
        }

        let messages = service.context_messages("s1", 3).await.unwrap();
        assert_eq!(messages.len(), 6);
        // Oldest of the window first
        assert_eq!(messages[0].content, "q2");
        assert_eq!(messages[5].content, "a4");
        for (i, msg) in messages.iter().enumerate() {
            let expected = if i % 2 == 0 { MessageRole::User } else { MessageRole::Assistant };
            assert_eq!(msg.role, expected);
        }
    }

    #[tokio::test]
    async fn history_preserves_insertion_order() {
        let service = ChatHistoryService::new(MemoryRepo::default());
        service
            .save_turn("s1", "first".into(), "one".into(), MessageType::NormalResponse)
            .await
            .unwrap();
        service
            .save_turn("s1", "second".into(), "two".into(), MessageType::ProductSearch)
            .await
            .unwrap();

        let history = service.history("s1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].user_message, "first");
        assert_eq!(history[1].message_type, MessageType::ProductSearch);
    }

    #[tokio::test]
    async fn clear_returns_count_and_empties_session() {
        let service = ChatHistoryService::new(MemoryRepo::default());
        for _ in 0..3 {
            service
                .save_turn("s1", "q".into(), "a".into(), MessageType::NormalResponse)
                .await
                .unwrap();
        }
        service
            .save_turn("other", "q".into(), "a".into(), MessageType::NormalResponse)
            .await
            .unwrap();

        assert_eq!(service.clear("s1").await.unwrap(), 3);
        assert!(service.history("s1").await.unwrap().is_empty());
        assert_eq!(service.history("other").await.unwrap().len(), 1);
    }
}
