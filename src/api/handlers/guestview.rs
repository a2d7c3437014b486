use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::{
    api::models::{
        guestview::{GuestHostResponse, GuestViewResponse, GuestviewTokenResponse},
        properties::PropertyResponse,
        users::CurrentUser,
    },
    db::{
        errors::DbError,
        handlers::{GuestviewTokens, Properties},
    },
    errors::Error,
    types::abbrev_uuid,
    AppState,
};

/// Rotate the current host's guest link token
///
/// Each host has at most one guest link. Requesting a new one replaces the
/// previous token, so any links shared before this call stop working.
#[utoipa::path(
    post,
    path = "/api/guestview-token",
    tag = "guestview",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Fresh guest link token", body = GuestviewTokenResponse),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %abbrev_uuid(&user.id)))]
pub async fn rotate_guestview_token(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<GuestviewTokenResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut tokens = GuestviewTokens::new(&mut conn);

    let row = tokens.rotate_for_user(user.id).await?;
    info!(user_id = %abbrev_uuid(&user.id), "rotated guestview token");

    Ok(Json(GuestviewTokenResponse {
        guestview_url: state.config.guestview_url(&row.token),
        token: row.token,
    }))
}

/// Public guest view of a host's properties
///
/// Unauthenticated. The token in the path is the only credential, so an
/// unknown or rotated-away token yields a plain 404 with no further detail.
#[utoipa::path(
    get,
    path = "/api/guestview/{token}",
    tag = "guestview",
    params(("token" = String, Path, description = "Guest link token")),
    responses(
        (status = 200, description = "Host profile and property list", body = GuestViewResponse),
        (status = 404, description = "Invalid or expired link"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_guest_view(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<GuestViewResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;

    let (_, host) = GuestviewTokens::new(&mut conn)
        .resolve(&token)
        .await?
        .ok_or(Error::InvalidToken)?;

    let properties = Properties::new(&mut conn).list_all_for_user(host.id).await?;

    Ok(Json(GuestViewResponse {
        host: GuestHostResponse { name: host.name },
        properties: properties.into_iter().map(PropertyResponse::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::auth::{AuthResponse, RegisterRequest};
    use crate::api::models::properties::PropertyCreate;
    use crate::test_utils::create_test_config;
    use axum_test::TestServer;
    use sqlx::PgPool;

    fn test_server(pool: PgPool) -> TestServer {
        let state = AppState::builder().db(pool).config(create_test_config()).build();

        let app = axum::Router::new()
            .route("/api/auth/register", axum::routing::post(crate::api::handlers::auth::register))
            .route(
                "/api/properties",
                axum::routing::post(crate::api::handlers::properties::create_property),
            )
            .route("/api/guestview-token", axum::routing::post(rotate_guestview_token))
            .route("/api/guestview/{token}", axum::routing::get(get_guest_view))
            .with_state(state);

        TestServer::new(app).unwrap()
    }

    async fn register_host(server: &TestServer, email: &str, name: &str) -> AuthResponse {
        server
            .post("/api/auth/register")
            .json(&RegisterRequest {
                email: email.to_string(),
                password: "Password1".to_string(),
                name: Some(name.to_string()),
            })
            .await
            .json()
    }

    #[sqlx::test]
    async fn test_rotate_returns_token_and_url(pool: PgPool) {
        let server = test_server(pool);
        let host = register_host(&server, "host@example.com", "Anna Host").await;

        let response = server
            .post("/api/guestview-token")
            .authorization_bearer(&host.token)
            .await;
        response.assert_status_ok();

        let body: GuestviewTokenResponse = response.json();
        assert!(!body.token.is_empty());
        assert!(body.guestview_url.ends_with(&format!("/guestview/{}", body.token)));
    }

    #[sqlx::test]
    async fn test_rotation_invalidates_previous_link(pool: PgPool) {
        let server = test_server(pool);
        let host = register_host(&server, "host@example.com", "Anna Host").await;

        let first: GuestviewTokenResponse = server
            .post("/api/guestview-token")
            .authorization_bearer(&host.token)
            .await
            .json();
        let second: GuestviewTokenResponse = server
            .post("/api/guestview-token")
            .authorization_bearer(&host.token)
            .await
            .json();
        assert_ne!(first.token, second.token);

        server
            .get(&format!("/api/guestview/{}", first.token))
            .await
            .assert_status(axum::http::StatusCode::NOT_FOUND);
        server
            .get(&format!("/api/guestview/{}", second.token))
            .await
            .assert_status_ok();
    }

    #[sqlx::test]
    async fn test_guest_view_shows_properties_without_email(pool: PgPool) {
        let server = test_server(pool);
        let host = register_host(&server, "host@example.com", "Anna Host").await;

        server
            .post("/api/properties")
            .authorization_bearer(&host.token)
            .json(&PropertyCreate {
                name: "Garden Cottage".to_string(),
                description: Some("Quiet and green".to_string()),
                address: None,
            })
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let token: GuestviewTokenResponse = server
            .post("/api/guestview-token")
            .authorization_bearer(&host.token)
            .await
            .json();

        // No authentication on the guest side
        let response = server.get(&format!("/api/guestview/{}", token.token)).await;
        response.assert_status_ok();

        let body: GuestViewResponse = response.json();
        assert_eq!(body.host.name.as_deref(), Some("Anna Host"));
        assert_eq!(body.properties.len(), 1);
        assert_eq!(body.properties[0].name, "Garden Cottage");

        // The host's email must never leak through the guest view
        let raw = response.text();
        assert!(!raw.contains("host@example.com"));
    }

    #[sqlx::test]
    async fn test_unknown_token_renders_not_found(pool: PgPool) {
        let server = test_server(pool);

        let response = server.get("/api/guestview/not-a-real-token").await;
        response.assert_status(axum::http::StatusCode::NOT_FOUND);
        assert_eq!(response.text(), "Invalid or expired link");
    }

    #[sqlx::test]
    async fn test_rotate_requires_auth(pool: PgPool) {
        let server = test_server(pool);
        server
            .post("/api/guestview-token")
            .await
            .assert_status(axum::http::StatusCode::UNAUTHORIZED);
    }
}
