//! Authentication and authorization.
//!
//! Hosts authenticate with email/password and receive a signed session token
//! which is presented on subsequent requests as `Authorization: Bearer <token>`.
//! Guests never authenticate; they access a host's public data through an
//! unguessable capability token embedded in a shareable link.
//!
//! # Modules
//!
//! - [`current_user`]: Extractor for getting the authenticated user in handlers
//! - [`ownership`]: Single-owner access checks (foreign resources render as 404)
//! - [`password`]: Password hashing and verification using Argon2
//! - [`session`]: Session token (JWT) creation and verification

pub mod current_user;
pub mod ownership;
pub mod password;
pub mod session;
