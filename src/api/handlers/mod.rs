//! HTTP request handlers for all API endpoints.
//!
//! This module contains Axum route handlers organized by resource type.
//! Each handler is responsible for:
//! - Request validation and deserialization
//! - Authentication and authorization checks
//! - Business logic execution via database repositories
//! - Response serialization
//!
//! # Handler Modules
//!
//! - [`auth`]: Registration, login, magic link, and current user
//! - [`guestview`]: Guest view token management and the public guest endpoint
//! - [`properties`]: Owner-scoped property CRUD
//!
//! # Authentication
//!
//! Host-facing handlers take the [`crate::api::models::users::CurrentUser`]
//! extractor, which authenticates via the bearer token. The guest view endpoint
//! is public and authorized solely by the capability token in its path.
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`] which automatically converts to
//! appropriate HTTP status codes and response bodies.

pub mod auth;
pub mod guestview;
pub mod properties;
