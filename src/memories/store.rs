//! Memory Storage
//! Record rows in SQLite; every query is keyed by owner id

use crate::db::StoreError;
use crate::memories::models::Memory;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use tracing::debug;

pub struct MemoryStore<'c> {
    conn: &'c Connection,
}

impl<'c> MemoryStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Memory> {
        let created_at: String = row.get(3)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
            })?;
        Ok(Memory {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            created_at,
            user_id: row.get(4)?,
        })
    }

    /// Insert a record for `user_id`; a dangling owner is rejected by the foreign key
    pub fn insert(
        &self,
        user_id: i64,
        title: &str,
        description: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Memory, StoreError> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO memories (title, description, created_at, user_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                title,
                description,
                created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
                user_id
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!(memory_id = id, user_id, "stored memory");

        // read back so the returned timestamp has the stored precision
        self.get(id)?.ok_or(StoreError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    fn get(&self, id: i64) -> Result<Option<Memory>, StoreError> {
        let memory = self
            .conn
            .query_row(
                "SELECT id, title, description, created_at, user_id FROM memories WHERE id = ?1",
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(memory)
    }

    /// All records owned by `user_id`, oldest first
    pub fn list_by_owner(&self, user_id: i64) -> Result<Vec<Memory>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, created_at, user_id
             FROM memories WHERE user_id = ?1 ORDER BY id ASC",
        )?;
        let memories = stmt
            .query_map(params![user_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(memories)
    }
}
