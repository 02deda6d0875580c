use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored memory, owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Memory {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
}

/// Create-memory form body; absent fields arrive empty and fail validation
#[derive(Debug, Deserialize)]
pub struct MemoryForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

pub fn validate_required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(field, "field required"));
    }
    Ok(())
}
