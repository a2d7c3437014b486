//! Repository implementations for database access.
//!
//! This module provides repository structs for each major entity in the system.
//! Repositories follow a consistent pattern and, where the shape fits, implement
//! the [`Repository`] trait.
//!
//! # Design Pattern
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Provides strongly-typed CRUD operations
//! - Handles query construction and parameter binding
//! - Returns domain models from [`crate::db::models`]
//!
//! # Available Repositories
//!
//! - [`Users`]: Host account management and authentication
//! - [`GuestviewTokens`]: Guest capability token lifecycle (issue, rotate, resolve)
//! - [`Properties`]: Owner-scoped property CRUD
//!
//! # Common Pattern
//!
//! ```ignore
//! use hostlink::db::handlers::{Users, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     // Start a transaction
//!     let mut tx = pool.begin().await?;
//!
//!     // Create repository from transaction
//!     let mut repo = Users::new(&mut tx);
//!
//!     // Perform operations
//!     let user = repo.get_user_by_email("host@example.com").await?;
//!
//!     // Commit or rollback
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod guestview_tokens;
pub mod properties;
pub mod repository;
pub mod users;

pub use guestview_tokens::GuestviewTokens;
pub use properties::Properties;
pub use repository::Repository;
pub use users::Users;
