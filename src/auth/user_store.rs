//! User Storage
//! User accounts in SQLite, on a connection borrowed for one request

use crate::auth::models::User;
use crate::db::StoreError;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use tracing::info;

pub struct UserStore<'c> {
    conn: &'c Connection,
}

impl<'c> UserStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
        })
    }

    /// Get user by username (exact, case-sensitive match)
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username, hashed_password FROM users WHERE username = ?1",
                params![username],
                Self::map_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username, hashed_password FROM users WHERE id = ?1",
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Insert a new user; a duplicate username surfaces as `StoreError::UniqueViolation`
    pub fn insert(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO users (username, hashed_password) VALUES (?1, ?2)",
            params![username, password_hash],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(user_id = id, username, "created user");

        Ok(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    /// Delete a user and, through the foreign key cascade, all of their records
    pub fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let rows = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])?;
        if rows > 0 {
            info!(user_id = id, "deleted user");
        }
        Ok(rows > 0)
    }

    #[cfg(test)]
    pub fn count_by_username(&self, username: &str) -> Result<i64, StoreError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
