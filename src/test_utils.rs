//! Test utilities for integration testing (available with `test-utils` feature).

use crate::{
    auth::password,
    config::{Config, DemoConfig},
    db::{
        handlers::{Properties, Repository, Users},
        models::{
            properties::{PropertyCreateDBRequest, PropertyDBResponse},
            users::{UserCreateDBRequest, UserDBResponse},
        },
    },
    types::UserId,
};
use sqlx::PgPool;

/// A valid config for tests. The demo account is disabled so tests start from
/// an empty database.
pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        secret_key: Some("test-secret-key-for-testing-only!".to_string()),
        demo: DemoConfig {
            enabled: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Create a user directly in the database with a properly hashed password.
pub async fn create_test_user(pool: &PgPool, email: &str, password: &str) -> UserDBResponse {
    let password_hash = password::hash_string(password).expect("Failed to hash test password");

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Users::new(&mut conn)
        .create(&UserCreateDBRequest {
            email: email.to_string(),
            name: Some(email.split('@').next().unwrap_or(email).to_string()),
            password_hash,
            is_demo: false,
        })
        .await
        .expect("Failed to create test user")
}

/// Create a property owned by the given user.
pub async fn create_test_property(pool: &PgPool, user_id: UserId, name: &str) -> PropertyDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Properties::new(&mut conn)
        .create(&PropertyCreateDBRequest {
            user_id,
            name: name.to_string(),
            description: None,
            address: None,
        })
        .await
        .expect("Failed to create test property")
}
