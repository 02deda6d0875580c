//! Record access guard
//!
//! The only way in to record storage from request handlers. Both operations
//! take an [`AuthenticatedUser`], so nothing can create or list a record without
//! a resolved identity, and the owner id always comes from that identity.
//!
//! Raw storage stays private to the crate:
//!
//! ```compile_fail
//! use memory_app::memories::store::MemoryStore;
//! ```

use crate::auth::identity::AuthenticatedUser;
use crate::db::StoreError;
use crate::error::RecordError;
use crate::memories::{
    models::{validate_required, Memory},
    store::MemoryStore,
};
use chrono::Utc;
use rusqlite::Connection;
use tracing::info;

pub struct RecordAccessGuard<'a> {
    store: MemoryStore<'a>,
}

impl<'a> RecordAccessGuard<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            store: MemoryStore::new(conn),
        }
    }

    pub fn create(
        &self,
        owner: &AuthenticatedUser,
        title: &str,
        description: &str,
    ) -> Result<Memory, RecordError> {
        validate_required("title", title)?;
        validate_required("description", description)?;

        let memory = self
            .store
            .insert(owner.id(), title, description, Utc::now())?;

        info!(memory_id = memory.id, user_id = owner.id(), "memory created");
        Ok(memory)
    }

    pub fn list_for(&self, owner: &AuthenticatedUser) -> Result<Vec<Memory>, StoreError> {
        self.store.list_by_owner(owner.id())
    }
}
