//! User and auth session database operations

use chrono::{DateTime, Duration, Utc};
use rusqlite::Result as SqliteResult;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::super::Database;
use crate::models::{Session, User};

/// Sessions expire 24 hours after login.
const SESSION_TTL_HOURS: i64 = 24;

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

impl Database {
    // ============================================
    // User methods
    // ============================================

    pub fn create_user(&self, name: &str, email: &str, password: &str) -> SqliteResult<User> {
        self.create_user_with_role(name, email, password, "member")
    }

    pub fn create_user_with_role(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> SqliteResult<User> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();
        let salt = Uuid::new_v4().to_string();
        let password_hash = hash_password(&salt, password);

        conn.execute(
            "INSERT INTO users (name, email, password_hash, salt, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![name, email, &password_hash, &salt, role, &now.to_rfc3339()],
        )?;

        Ok(User {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            salt,
            role: role.to_string(),
            created_at: now,
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> SqliteResult<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, salt, role, created_at
             FROM users WHERE email = ?1",
        )?;
        let user = stmt.query_row([email], Self::row_to_user).ok();
        Ok(user)
    }

    pub fn get_user_by_id(&self, id: i64) -> SqliteResult<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, salt, role, created_at
             FROM users WHERE id = ?1",
        )?;
        let user = stmt.query_row([id], Self::row_to_user).ok();
        Ok(user)
    }

    /// Check a password attempt against the stored salted hash.
    pub fn verify_password(user: &User, password: &str) -> bool {
        hash_password(&user.salt, password) == user.password_hash
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let created_at_str: String = row.get(6)?;
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            salt: row.get(4)?,
            role: row.get(5)?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .unwrap()
                .with_timezone(&Utc),
        })
    }

    // ============================================
    // Session methods
    // ============================================

    pub fn create_session_for_user(&self, user_id: i64) -> SqliteResult<Session> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();
        let expires_at = now + Duration::hours(SESSION_TTL_HOURS);
        let token = Uuid::new_v4().to_string();

        conn.execute(
            "INSERT INTO auth_sessions (token, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![&token, user_id, &now.to_rfc3339(), &expires_at.to_rfc3339()],
        )?;

        Ok(Session {
            id: conn.last_insert_rowid(),
            token,
            user_id,
            created_at: now,
            expires_at,
        })
    }

    /// Resolve a bearer token to its user. Expired sessions are deleted on
    /// sight and treated as absent.
    pub fn validate_session(&self, token: &str) -> SqliteResult<Option<User>> {
        let session = {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn.prepare(
                "SELECT id, token, user_id, created_at, expires_at
                 FROM auth_sessions WHERE token = ?1",
            )?;
            stmt.query_row([token], |row| {
                let created_at_str: String = row.get(3)?;
                let expires_at_str: String = row.get(4)?;
                Ok(Session {
                    id: row.get(0)?,
                    token: row.get(1)?,
                    user_id: row.get(2)?,
                    created_at: DateTime::parse_from_rfc3339(&created_at_str)
                        .unwrap()
                        .with_timezone(&Utc),
                    expires_at: DateTime::parse_from_rfc3339(&expires_at_str)
                        .unwrap()
                        .with_timezone(&Utc),
                })
            })
            .ok()
        };

        let Some(session) = session else {
            return Ok(None);
        };

        if session.expires_at < Utc::now() {
            self.delete_session(&session.token)?;
            return Ok(None);
        }

        self.get_user_by_id(session.user_id)
    }

    pub fn delete_session(&self, token: &str) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM auth_sessions WHERE token = ?1", [token])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("test.db").to_str().unwrap()).unwrap();
        (dir, db)
    }

    #[test]
    fn password_verification_round_trips() {
        let (_dir, db) = test_db();
        let user = db.create_user("Budi", "budi@example.com", "rahasia123").unwrap();

        assert!(Database::verify_password(&user, "rahasia123"));
        assert!(!Database::verify_password(&user, "salah"));
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (_dir, db) = test_db();
        db.create_user("Budi", "budi@example.com", "pw").unwrap();
        assert!(db.create_user("Lain", "budi@example.com", "pw").is_err());
    }

    #[test]
    fn session_resolves_to_user() {
        let (_dir, db) = test_db();
        let user = db.create_user("Budi", "budi@example.com", "pw").unwrap();
        let session = db.create_session_for_user(user.id).unwrap();

        let resolved = db.validate_session(&session.token).unwrap().unwrap();
        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.email, "budi@example.com");

        assert!(db.validate_session("unknown-token").unwrap().is_none());
    }

    #[test]
    fn deleted_session_no_longer_validates() {
        let (_dir, db) = test_db();
        let user = db.create_user("Budi", "budi@example.com", "pw").unwrap();
        let session = db.create_session_for_user(user.id).unwrap();

        db.delete_session(&session.token).unwrap();
        assert!(db.validate_session(&session.token).unwrap().is_none());
    }
}
