//! Database repository for guest view tokens.
//!
//! Each host has at most one live token at a time. Rotation is a single atomic
//! upsert against the `UNIQUE (user_id)` constraint, so there is never a window
//! in which two tokens for the same host resolve.

use sqlx::PgConnection;
use tracing::instrument;

use crate::{
    auth::password,
    db::{
        errors::Result,
        models::{guestview_tokens::GuestviewTokenDBResponse, users::UserDBResponse},
    },
    types::{abbrev_uuid, UserId},
};

pub struct GuestviewTokens<'c> {
    db: &'c mut PgConnection,
}

impl<'c> GuestviewTokens<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Get the host's current token, if one has been issued.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn get_for_user(&mut self, user_id: UserId) -> Result<Option<GuestviewTokenDBResponse>> {
        let token = sqlx::query_as::<_, GuestviewTokenDBResponse>(
            "SELECT id, user_id, token, created_at FROM guestview_tokens WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(token)
    }

    /// Issue a fresh token for a host, replacing any existing one.
    ///
    /// Concurrent rotations are last-write-wins; the previous token stops
    /// resolving the moment the upsert commits.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn rotate_for_user(&mut self, user_id: UserId) -> Result<GuestviewTokenDBResponse> {
        self.rotate_for_user_with_token(user_id, &password::generate_guestview_token())
            .await
    }

    /// Issue a specific token string for a host, replacing any existing one.
    /// Used by demo seeding where the token must be well-known.
    #[instrument(skip(self, token), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn rotate_for_user_with_token(
        &mut self,
        user_id: UserId,
        token: &str,
    ) -> Result<GuestviewTokenDBResponse> {
        let row = sqlx::query_as::<_, GuestviewTokenDBResponse>(
            r#"
            INSERT INTO guestview_tokens (user_id, token)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE
            SET token = EXCLUDED.token, created_at = NOW()
            RETURNING id, user_id, token, created_at
            "#,
        )
        .bind(user_id)
        .bind(token)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(row)
    }

    /// Resolve a presented token string to its row and owning user.
    ///
    /// Returns `None` for unknown tokens. An orphaned token (owner deleted)
    /// is indistinguishable from no match.
    #[instrument(skip(self, token), err)]
    pub async fn resolve(
        &mut self,
        token: &str,
    ) -> Result<Option<(GuestviewTokenDBResponse, UserDBResponse)>> {
        let row = sqlx::query_as::<_, GuestviewTokenDBResponse>(
            "SELECT id, user_id, token, created_at FROM guestview_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&mut *self.db)
        .await?;

        let Some(token_row) = row else {
            return Ok(None);
        };

        let user = sqlx::query_as::<_, UserDBResponse>(
            "SELECT id, email, name, is_demo, created_at, password_hash FROM users WHERE id = $1",
        )
        .bind(token_row.user_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(user.map(|u| (token_row, u)))
    }
}
