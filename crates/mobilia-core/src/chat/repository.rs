//! Chat repository trait.
//!
//! Append-only log of conversation turns. Uses RPITIT; the SQLite
//! implementation lives in mobilia-infra.

use mobilia_types::chat::ChatTurn;
use mobilia_types::error::RepositoryError;

/// Persistence for the append-only conversation log.
pub trait ChatRepository: Send + Sync {
    /// Append one request/response pair.
    fn append(
        &self,
        turn: &ChatTurn,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All turns for a session in chronological order.
    fn history(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatTurn>, RepositoryError>> + Send;

    /// The most recent `limit` turns for a session, newest first.
    fn recent(
        &self,
        session_id: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ChatTurn>, RepositoryError>> + Send;

    /// Delete every turn for a session. Returns the deleted count.
    fn clear(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
