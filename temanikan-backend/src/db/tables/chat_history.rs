//! Chat history database operations
//!
//! One row per chat turn, inserted exactly once after the answer is
//! determined. Rows are owned by their user and only removed by explicit
//! user deletion (or the user-delete cascade).

use chrono::{DateTime, Utc};
use rusqlite::Result as SqliteResult;

use super::super::Database;
use crate::models::ChatExchange;

impl Database {
    pub fn insert_chat_exchange(
        &self,
        user_id: i64,
        message: &str,
        response: &str,
        has_image: bool,
        image_url: Option<&str>,
    ) -> SqliteResult<ChatExchange> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO chat_history (user_id, message, response, has_image, image_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                user_id,
                message,
                response,
                has_image as i32,
                image_url,
                &now.to_rfc3339(),
            ],
        )?;

        Ok(ChatExchange {
            id: conn.last_insert_rowid(),
            user_id,
            message: message.to_string(),
            response: response.to_string(),
            has_image,
            image_url: image_url.map(|s| s.to_string()),
            created_at: now,
        })
    }

    /// The user's own exchanges, newest first.
    pub fn list_chat_history(&self, user_id: i64, limit: i64) -> SqliteResult<Vec<ChatExchange>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, message, response, has_image, image_url, created_at
             FROM chat_history WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;

        let exchanges = stmt
            .query_map(rusqlite::params![user_id, limit], Self::row_to_chat_exchange)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(exchanges)
    }

    pub fn count_chat_history(&self, user_id: i64) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT COUNT(*) FROM chat_history WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )
    }

    /// Owner-scoped delete; returns false when the row does not exist or
    /// belongs to someone else.
    pub fn delete_chat_exchange(&self, user_id: i64, id: i64) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM chat_history WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    fn row_to_chat_exchange(row: &rusqlite::Row) -> rusqlite::Result<ChatExchange> {
        let created_at_str: String = row.get(6)?;
        Ok(ChatExchange {
            id: row.get(0)?,
            user_id: row.get(1)?,
            message: row.get(2)?,
            response: row.get(3)?,
            has_image: row.get::<_, i32>(4)? != 0,
            image_url: row.get(5)?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .unwrap()
                .with_timezone(&Utc),
        })
    }
}
