//! API request/response models for authentication.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::models::users::UserResponse;

/// Request payload for user registration
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Display name; defaults to the email local part when omitted
    pub name: Option<String>,
}

/// Request payload for login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for successful registration or login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// Bearer token to present in the Authorization header
    pub token: String,
    pub user: UserResponse,
}

/// Request payload for requesting a magic login link
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MagicLinkRequest {
    pub email: String,
}

/// Confirmation returned for a magic link request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MagicLinkResponse {
    pub message: String,
}
