//! API request and response data models.
//!
//! This module contains the data structures used for HTTP request deserialization
//! and response serialization. These models define the public API contract.
//!
//! # Design Principles
//!
//! - **Separation of Concerns**: API models are distinct from database models,
//!   allowing independent evolution of API and storage representations
//! - **Validation**: Models use serde for deserialization and validation
//! - **OpenAPI**: All models are annotated with `utoipa` for automatic API docs
//!
//! # Model Categories
//!
//! - [`auth`]: Registration, login, and session token payloads
//! - [`users`]: User profile responses and the authenticated principal
//! - [`properties`]: Property CRUD payloads
//! - [`guestview`]: Guest view token and public guest view payloads
//! - [`pagination`]: Shared offset-based pagination types

pub mod auth;
pub mod guestview;
pub mod pagination;
pub mod properties;
pub mod users;
