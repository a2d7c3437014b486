use crate::db::errors::DbError;
use crate::{
    api::models::users::CurrentUser,
    auth::session,
    db::handlers::{Repository, Users},
    errors::{Error, Result},
    AppState,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{instrument, trace};

/// Extract the bearer token from the Authorization header if present.
/// Returns:
/// - None: No Authorization header or not a Bearer token
/// - Some(Ok(token)): Bearer token present
/// - Some(Err(error)): Authorization header present but unreadable
fn bearer_token(parts: &Parts) -> Option<Result<&str>> {
    let auth_header = parts.headers.get(axum::http::header::AUTHORIZATION)?;

    let auth_str = match auth_header.to_str() {
        Ok(s) => s,
        Err(e) => {
            return Some(Err(Error::BadRequest {
                message: format!("Invalid authorization header: {e}"),
            }))
        }
    };

    auth_str.strip_prefix("Bearer ").map(Ok)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    /// Authenticate a request from its `Authorization: Bearer <token>` header.
    ///
    /// The session token carries the user id; the user record is re-read from
    /// the database on every request so that deleted accounts lose access
    /// immediately even while their tokens are still within expiry.
    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = match bearer_token(parts) {
            Some(Ok(token)) => token,
            Some(Err(e)) => return Err(e),
            None => {
                trace!("No bearer credentials found in request");
                return Err(Error::Unauthenticated {
                    message: Some("Authentication credentials required".to_string()),
                });
            }
        };

        let claims = session::verify_session_token(token, &state.config)?;

        let mut conn = state.db.acquire().await.map_err(DbError::from)?;
        let mut users = Users::new(&mut conn);
        let user = match users.get_by_id(claims.sub).await? {
            Some(user) => user,
            // A valid token whose subject no longer exists is an auth failure, not a 500
            None => {
                trace!("Session token subject {} no longer exists", claims.sub);
                return Err(Error::Unauthenticated {
                    message: Some("Principal not found".to_string()),
                });
            }
        };

        Ok(CurrentUser::from(user))
    }
}
