//! API request/response models for properties.

use super::pagination::Pagination;
use crate::db::models::properties::{PropertyDBResponse, PropertyUpdateDBRequest};
use crate::types::PropertyId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Request payload for creating a property
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PropertyCreate {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
}

/// Request payload for updating a property. Omitted fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PropertyUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
}

impl From<PropertyUpdate> for PropertyUpdateDBRequest {
    fn from(api: PropertyUpdate) -> Self {
        Self {
            name: api.name,
            description: api.description,
            address: api.address,
        }
    }
}

/// Public representation of a property
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PropertyResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: PropertyId,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PropertyDBResponse> for PropertyResponse {
    fn from(db: PropertyDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            address: db.address,
            created_at: db.created_at,
        }
    }
}

/// Query parameters for listing properties
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListPropertiesQuery {
    /// Pagination parameters
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,
}
