//! Chat history persistence over SQLite.
//!
//! One row per question/answer exchange, keyed by session. Rows are
//! immutable once written; the 7-day retention window is applied by
//! callers through the `since` bound, old rows are not deleted.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};

use crate::core::errors::ApiError;

/// One persisted question/answer exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: i64,
    pub session_id: String,
    pub user_id: String,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    pub async fn new(db_path: PathBuf) -> Result<Self, ApiError> {
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to connect to history db: {}", e)))?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), ApiError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chats_info (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to init chats_info table: {}", e)))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_chats_session ON chats_info(session_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to create index: {}", e)))?;

        Ok(())
    }

    /// Appends a turn and returns it with its assigned id and timestamp.
    pub async fn append(
        &self,
        session_id: &str,
        user_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<ChatTurn, ApiError> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO chats_info (session_id, user_id, question, answer, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(session_id)
        .bind(user_id)
        .bind(question)
        .bind(answer)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(ChatTurn {
            id: result.last_insert_rowid(),
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            created_at: now,
        })
    }

    /// The last `limit` turns for a session since `since`, oldest first.
    ///
    /// Fetches newest-first then reverses, so the limit trims the oldest
    /// turns, not the newest.
    pub async fn recent_turns(
        &self,
        session_id: &str,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ChatTurn>, ApiError> {
        let rows = sqlx::query(
            "SELECT id, session_id, user_id, question, answer, created_at
             FROM chats_info
             WHERE session_id = ?1 AND created_at >= ?2
             ORDER BY created_at DESC, id DESC
             LIMIT ?3",
        )
        .bind(session_id)
        .bind(since.to_rfc3339())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        let mut turns: Vec<ChatTurn> = rows.iter().map(row_to_turn).collect();
        turns.reverse();
        Ok(turns)
    }

    /// Session history for the history endpoint: oldest first, capped.
    pub async fn session_history(
        &self,
        session_id: &str,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ChatTurn>, ApiError> {
        let rows = sqlx::query(
            "SELECT id, session_id, user_id, question, answer, created_at
             FROM chats_info
             WHERE session_id = ?1 AND created_at >= ?2
             ORDER BY created_at ASC, id ASC
             LIMIT ?3",
        )
        .bind(session_id)
        .bind(since.to_rfc3339())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(rows.iter().map(row_to_turn).collect())
    }

    pub async fn total_message_count(&self) -> Result<i64, ApiError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chats_info")
            .fetch_one(&self.pool)
            .await
            .map_err(ApiError::internal)?;
        Ok(count)
    }
}

fn row_to_turn(row: &sqlx::sqlite::SqliteRow) -> ChatTurn {
    let created_at: String = row.get("created_at");
    ChatTurn {
        id: row.get("id"),
        session_id: row.get("session_id"),
        user_id: row.get("user_id"),
        question: row.get("question"),
        answer: row.get("answer"),
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn test_store() -> (HistoryStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("chat.db")).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn append_and_read_back_in_chronological_order() {
        let (store, _dir) = test_store().await;
        let since = Utc::now() - Duration::days(7);

        store.append("s1", "u1", "q1", "a1").await.unwrap();
        store.append("s1", "u1", "q2", "a2").await.unwrap();
        store.append("other", "u1", "qx", "ax").await.unwrap();

        let turns = store.recent_turns("s1", since, 10).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].question, "q1");
        assert_eq!(turns[1].question, "q2");
        assert!(turns[0].created_at <= turns[1].created_at);
    }

    #[tokio::test]
    async fn limit_keeps_the_newest_turns() {
        let (store, _dir) = test_store().await;
        let since = Utc::now() - Duration::days(7);

        for i in 0..5 {
            store
                .append("s1", "u1", &format!("q{i}"), &format!("a{i}"))
                .await
                .unwrap();
        }

        let turns = store.recent_turns("s1", since, 2).await.unwrap();
        assert_eq!(turns.len(), 2);
        // Newest two, still oldest-first.
        assert_eq!(turns[0].question, "q3");
        assert_eq!(turns[1].question, "q4");
    }

    #[tokio::test]
    async fn retention_bound_excludes_old_turns() {
        let (store, _dir) = test_store().await;

        store.append("s1", "u1", "old enough", "a").await.unwrap();

        // A bound in the future excludes everything just written.
        let future = Utc::now() + Duration::hours(1);
        assert!(store.recent_turns("s1", future, 10).await.unwrap().is_empty());

        let past = Utc::now() - Duration::days(7);
        assert_eq!(store.recent_turns("s1", past, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn total_count_spans_sessions() {
        let (store, _dir) = test_store().await;
        store.append("s1", "u1", "q", "a").await.unwrap();
        store.append("s2", "u2", "q", "a").await.unwrap();
        assert_eq!(store.total_message_count().await.unwrap(), 2);
    }
}
