//! Database models for properties.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::types::{PropertyId, UserId};

/// Database request for creating a new property
#[derive(Debug, Clone)]
pub struct PropertyCreateDBRequest {
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
}

/// Database request for updating a property. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct PropertyUpdateDBRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
}

/// Database response for a property
#[derive(Debug, Clone, FromRow)]
pub struct PropertyDBResponse {
    pub id: PropertyId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}
