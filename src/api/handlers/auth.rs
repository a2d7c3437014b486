use axum::{extract::State, Json};

use crate::{
    api::models::{
        auth::{AuthResponse, LoginRequest, MagicLinkRequest, MagicLinkResponse, RegisterRequest},
        users::{CurrentUser, UserResponse},
    },
    auth::{
        password::{self, Argon2Params},
        session,
    },
    config::PasswordConfig,
    db::{
        errors::DbError,
        handlers::{Repository, Users},
        models::users::UserCreateDBRequest,
    },
    errors::Error,
    AppState,
};

/// Check a candidate password against the configured policy.
///
/// Runs before any store write so a rejected registration leaves no trace.
fn validate_password(password: &str, config: &PasswordConfig) -> Result<(), Error> {
    if password.len() < config.min_length {
        return Err(Error::Validation {
            field: "password".to_string(),
            message: format!("must be at least {} characters", config.min_length),
        });
    }
    if password.len() > config.max_length {
        return Err(Error::Validation {
            field: "password".to_string(),
            message: format!("must be no more than {} characters", config.max_length),
        });
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(Error::Validation {
            field: "password".to_string(),
            message: "must contain at least one uppercase letter".to_string(),
        });
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(Error::Validation {
            field: "password".to_string(),
            message: "must contain at least one digit".to_string(),
        });
    }
    Ok(())
}

/// Default display name when none was given: the email local part.
fn default_name(email: &str) -> Option<String> {
    let local = email.split('@').next().unwrap_or("");
    if local.is_empty() {
        None
    } else {
        Some(local.to_string())
    }
}

/// Register a new host account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    tag = "auth",
    responses(
        (status = 200, description = "Account registered successfully", body = AuthResponse),
        (status = 400, description = "Invalid input or email already registered"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, Error> {
    if !state.config.auth.allow_registration {
        return Err(Error::BadRequest {
            message: "Registration is disabled".to_string(),
        });
    }

    validate_password(&request.password, &state.config.auth.password)?;

    let email = request.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::Validation {
            field: "email".to_string(),
            message: "must be a valid email address".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut user_repo = Users::new(&mut conn);

    // Early duplicate check for a friendly error; the unique constraint
    // still catches races below
    if user_repo.get_user_by_email(&email).await?.is_some() {
        return Err(Error::EmailTaken);
    }

    // Hash the password on a blocking thread to avoid blocking async runtime
    let password = request.password.clone();
    let params = Argon2Params::from(&state.config.auth.password);
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string_with_params(&password, Some(params)))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let create_request = UserCreateDBRequest {
        name: request.name.filter(|n| !n.trim().is_empty()).or_else(|| default_name(&email)),
        email,
        password_hash,
        is_demo: false,
    };

    let created_user = match user_repo.create(&create_request).await {
        Ok(user) => user,
        Err(DbError::UniqueViolation { table, .. }) if table.as_deref() == Some("users") => {
            return Err(Error::EmailTaken);
        }
        Err(e) => return Err(e.into()),
    };

    let user_response = UserResponse::from(created_user.clone());
    let token = session::create_session_token(&CurrentUser::from(created_user), &state.config)?;

    Ok(Json(AuthResponse { token, user: user_response }))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "auth",
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<Json<AuthResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut user_repo = Users::new(&mut conn);

    // Unknown email and wrong password are deliberately indistinguishable
    let user = user_repo
        .get_user_by_email(request.email.trim())
        .await?
        .ok_or(Error::InvalidCredentials)?;

    // Verify password on a blocking thread to avoid blocking async runtime
    let password = request.password.clone();
    let hash = user.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(Error::InvalidCredentials);
    }

    let user_response = UserResponse::from(user.clone());
    let token = session::create_session_token(&CurrentUser::from(user), &state.config)?;

    Ok(Json(AuthResponse { token, user: user_response }))
}

/// Request a magic login link
#[utoipa::path(
    post,
    path = "/api/auth/magic-link",
    request_body = MagicLinkRequest,
    tag = "auth",
    responses(
        (status = 200, description = "Request accepted", body = MagicLinkResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn magic_link(
    State(_state): State<AppState>,
    Json(request): Json<MagicLinkRequest>,
) -> Result<Json<MagicLinkResponse>, Error> {
    // No email is sent. The response never reveals whether the account exists.
    tracing::info!(email = %request.email.to_lowercase(), "magic link requested");

    Ok(Json(MagicLinkResponse {
        message: "If an account exists for this email, a login link has been sent".to_string(),
    }))
}

/// Get the current authenticated user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn me(State(state): State<AppState>, user: CurrentUser) -> Result<Json<UserResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut user_repo = Users::new(&mut conn);

    let full_user = user_repo.get_by_id(user.id).await?.ok_or(Error::Unauthenticated {
        message: Some("Principal not found".to_string()),
    })?;

    Ok(Json(UserResponse::from(full_user)))
}
