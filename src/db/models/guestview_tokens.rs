//! Database models for guest view tokens.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::types::{GuestviewTokenId, UserId};

/// Database entity model.
///
/// Each host has at most one live token, enforced by `UNIQUE (user_id)`.
/// The token string itself is stored in plaintext; it is an unguessable
/// capability, not a credential derived from a secret.
#[derive(Debug, Clone, FromRow)]
pub struct GuestviewTokenDBResponse {
    pub id: GuestviewTokenId,
    pub user_id: UserId,
    pub token: String,
    pub created_at: DateTime<Utc>,
}
