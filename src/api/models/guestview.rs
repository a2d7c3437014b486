//! API request/response models for guest view links.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::models::properties::PropertyResponse;

/// Response for issuing or rotating a guest view token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GuestviewTokenResponse {
    /// The capability token itself
    pub token: String,
    /// Full shareable link built from the configured public URL
    pub guestview_url: String,
}

/// The host profile shown to guests. Deliberately excludes the email address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GuestHostResponse {
    pub name: Option<String>,
}

/// Everything a guest sees when opening a shareable link
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GuestViewResponse {
    pub host: GuestHostResponse,
    pub properties: Vec<PropertyResponse>,
}
