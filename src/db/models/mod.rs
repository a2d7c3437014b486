//! Database record models matching table schemas.
//!
//! This module contains struct definitions that directly correspond to database
//! table rows. These models are used by repositories to return query results
//! and accept insertion/update data.
//!
//! # Design Principles
//!
//! - **Schema Mapping**: Each model struct matches a database table schema
//! - **SQLx Integration**: Response models derive `sqlx::FromRow` for query results
//! - **Separation**: Database models are distinct from API models to allow
//!   independent evolution of storage and API representations
//!
//! # Models
//!
//! - [`users`]: Host accounts and credentials
//! - [`guestview_tokens`]: Per-host guest capability tokens
//! - [`properties`]: Properties owned by hosts

pub mod guestview_tokens;
pub mod properties;
pub mod users;
