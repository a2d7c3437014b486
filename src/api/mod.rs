//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Authentication** (`/api/auth/*`): Registration, login, current user
//! - **Properties** (`/api/properties/*`): Owner-scoped property CRUD
//! - **Guest view** (`/api/guestview-token`, `/api/guestview/{token}`):
//!   Shareable link management and the public guest endpoint
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`.
//! API documentation is available at `/docs` when the server is running.

pub mod handlers;
pub mod models;
