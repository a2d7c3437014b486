use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::models::{
        pagination::PaginatedResponse,
        properties::{ListPropertiesQuery, PropertyCreate, PropertyResponse, PropertyUpdate},
        users::CurrentUser,
    },
    db::{
        errors::DbError,
        handlers::{properties::PropertyFilter, Properties, Repository},
        models::properties::PropertyCreateDBRequest,
    },
    auth::ownership::ensure_owner,
    errors::Error,
    types::PropertyId,
    AppState,
};

/// List the current host's properties
#[utoipa::path(
    get,
    path = "/api/properties",
    tag = "properties",
    security(("bearer" = [])),
    params(ListPropertiesQuery),
    responses(
        (status = 200, description = "Properties owned by the current user", body = PaginatedResponse<PropertyResponse>),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_properties(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListPropertiesQuery>,
) -> Result<Json<PaginatedResponse<PropertyResponse>>, Error> {
    let (skip, limit) = query.pagination.params();

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Properties::new(&mut conn);

    let properties = repo.list(&PropertyFilter::new(user.id, skip, limit)).await?;
    let total_count = repo.count_for_user(user.id).await?;

    let data = properties.into_iter().map(PropertyResponse::from).collect();
    Ok(Json(PaginatedResponse::new(data, total_count, skip, limit)))
}

/// Create a property
#[utoipa::path(
    post,
    path = "/api/properties",
    request_body = PropertyCreate,
    tag = "properties",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Property created", body = PropertyResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_property(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<PropertyCreate>,
) -> Result<(StatusCode, Json<PropertyResponse>), Error> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            field: "name".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Properties::new(&mut conn);

    let created = repo
        .create(&PropertyCreateDBRequest {
            user_id: user.id,
            name,
            description: request.description,
            address: request.address,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PropertyResponse::from(created))))
}

/// Get a single property
#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    tag = "properties",
    security(("bearer" = [])),
    params(("id" = uuid::Uuid, Path, description = "Property ID")),
    responses(
        (status = 200, description = "The property", body = PropertyResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Property not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_property(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<PropertyId>,
) -> Result<Json<PropertyResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Properties::new(&mut conn);

    let property = repo.find_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "Property".to_string(),
        id: id.to_string(),
    })?;
    // Someone else's property renders as a 404, not a 403
    ensure_owner(user.id, property.user_id, "Property", &id)?;

    Ok(Json(PropertyResponse::from(property)))
}

/// Update a property
#[utoipa::path(
    patch,
    path = "/api/properties/{id}",
    request_body = PropertyUpdate,
    tag = "properties",
    security(("bearer" = [])),
    params(("id" = uuid::Uuid, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Updated property", body = PropertyResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Property not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_property(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<PropertyId>,
    Json(request): Json<PropertyUpdate>,
) -> Result<Json<PropertyResponse>, Error> {
    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            return Err(Error::Validation {
                field: "name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Properties::new(&mut conn);

    let updated = match repo.update((user.id, id), &request.into()).await {
        Ok(property) => property,
        Err(DbError::NotFound) => {
            return Err(Error::NotFound {
                resource: "Property".to_string(),
                id: id.to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(PropertyResponse::from(updated)))
}

/// Delete a property
#[utoipa::path(
    delete,
    path = "/api/properties/{id}",
    tag = "properties",
    security(("bearer" = [])),
    params(("id" = uuid::Uuid, Path, description = "Property ID")),
    responses(
        (status = 204, description = "Property deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Property not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_property(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<PropertyId>,
) -> Result<StatusCode, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut repo = Properties::new(&mut conn);

    let deleted = repo.delete((user.id, id)).await?;
    if !deleted {
        return Err(Error::NotFound {
            resource: "Property".to_string(),
            id: id.to_string(),
        });
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::auth::{AuthResponse, RegisterRequest};
    use crate::test_utils::create_test_config;
    use axum_test::TestServer;
    use sqlx::PgPool;

    fn test_server(pool: PgPool) -> TestServer {
        let state = AppState::builder().db(pool).config(create_test_config()).build();

        let app = axum::Router::new()
            .route("/api/auth/register", axum::routing::post(crate::api::handlers::auth::register))
            .route(
                "/api/properties",
                axum::routing::get(list_properties).post(create_property),
            )
            .route(
                "/api/properties/{id}",
                axum::routing::get(get_property)
                    .patch(update_property)
                    .delete(delete_property),
            )
            .with_state(state);

        TestServer::new(app).unwrap()
    }

    async fn register_host(server: &TestServer, email: &str) -> AuthResponse {
        server
            .post("/api/auth/register")
            .json(&RegisterRequest {
                email: email.to_string(),
                password: "Password1".to_string(),
                name: None,
            })
            .await
            .json()
    }

    async fn create_property_for(server: &TestServer, token: &str, name: &str) -> PropertyResponse {
        let response = server
            .post("/api/properties")
            .authorization_bearer(token)
            .json(&PropertyCreate {
                name: name.to_string(),
                description: Some("Nice view".to_string()),
                address: Some("1 Example Street".to_string()),
            })
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json()
    }

    #[sqlx::test]
    async fn test_create_and_list_properties(pool: PgPool) {
        let server = test_server(pool);
        let host = register_host(&server, "host@example.com").await;

        create_property_for(&server, &host.token, "Beach House").await;
        create_property_for(&server, &host.token, "City Flat").await;

        let response = server
            .get("/api/properties")
            .authorization_bearer(&host.token)
            .await;
        response.assert_status_ok();

        let body: PaginatedResponse<PropertyResponse> = response.json();
        assert_eq!(body.total_count, 2);
        assert_eq!(body.data.len(), 2);
        assert_eq!(body.data[0].name, "Beach House");
    }

    #[sqlx::test]
    async fn test_list_is_scoped_to_owner(pool: PgPool) {
        let server = test_server(pool);
        let alice = register_host(&server, "alice@example.com").await;
        let bob = register_host(&server, "bob@example.com").await;

        create_property_for(&server, &alice.token, "Alice Cottage").await;

        let response = server
            .get("/api/properties")
            .authorization_bearer(&bob.token)
            .await;
        let body: PaginatedResponse<PropertyResponse> = response.json();
        assert_eq!(body.total_count, 0);
        assert!(body.data.is_empty());
    }

    #[sqlx::test]
    async fn test_foreign_property_renders_as_not_found(pool: PgPool) {
        let server = test_server(pool);
        let alice = register_host(&server, "alice@example.com").await;
        let bob = register_host(&server, "bob@example.com").await;

        let property = create_property_for(&server, &alice.token, "Alice Cottage").await;
        let path = format!("/api/properties/{}", property.id);

        // Every verb 404s for the wrong owner, never 403
        server
            .get(&path)
            .authorization_bearer(&bob.token)
            .await
            .assert_status(axum::http::StatusCode::NOT_FOUND);
        server
            .patch(&path)
            .authorization_bearer(&bob.token)
            .json(&PropertyUpdate {
                name: Some("Hijacked".to_string()),
                description: None,
                address: None,
            })
            .await
            .assert_status(axum::http::StatusCode::NOT_FOUND);
        server
            .delete(&path)
            .authorization_bearer(&bob.token)
            .await
            .assert_status(axum::http::StatusCode::NOT_FOUND);

        // And the owner still sees the unmodified property
        let response = server.get(&path).authorization_bearer(&alice.token).await;
        response.assert_status_ok();
        let body: PropertyResponse = response.json();
        assert_eq!(body.name, "Alice Cottage");
    }

    #[sqlx::test]
    async fn test_update_property(pool: PgPool) {
        let server = test_server(pool);
        let host = register_host(&server, "host@example.com").await;
        let property = create_property_for(&server, &host.token, "Old Name").await;

        let response = server
            .patch(&format!("/api/properties/{}", property.id))
            .authorization_bearer(&host.token)
            .json(&PropertyUpdate {
                name: Some("New Name".to_string()),
                description: None,
                address: None,
            })
            .await;

        response.assert_status_ok();
        let body: PropertyResponse = response.json();
        assert_eq!(body.name, "New Name");
        // Omitted fields untouched
        assert_eq!(body.description.as_deref(), Some("Nice view"));
    }

    #[sqlx::test]
    async fn test_create_requires_name(pool: PgPool) {
        let server = test_server(pool);
        let host = register_host(&server, "host@example.com").await;

        let response = server
            .post("/api/properties")
            .authorization_bearer(&host.token)
            .json(&PropertyCreate {
                name: "   ".to_string(),
                description: None,
                address: None,
            })
            .await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    async fn test_delete_property(pool: PgPool) {
        let server = test_server(pool);
        let host = register_host(&server, "host@example.com").await;
        let property = create_property_for(&server, &host.token, "Short Lived").await;
        let path = format!("/api/properties/{}", property.id);

        server
            .delete(&path)
            .authorization_bearer(&host.token)
            .await
            .assert_status(axum::http::StatusCode::NO_CONTENT);
        server
            .delete(&path)
            .authorization_bearer(&host.token)
            .await
            .assert_status(axum::http::StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    async fn test_endpoints_require_auth(pool: PgPool) {
        let server = test_server(pool);

        server
            .get("/api/properties")
            .await
            .assert_status(axum::http::StatusCode::UNAUTHORIZED);
        server
            .post("/api/properties")
            .json(&PropertyCreate {
                name: "No Auth".to_string(),
                description: None,
                address: None,
            })
            .await
            .assert_status(axum::http::StatusCode::UNAUTHORIZED);
    }
}
