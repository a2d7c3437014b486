//! Single-owner access control.
//!
//! Every owned resource belongs to exactly one user. A principal may only see
//! and modify their own rows; anything else renders as 404 so the API never
//! confirms that a foreign resource exists.

use uuid::Uuid;

use crate::errors::{Error, Result};
use crate::types::UserId;

/// Check that `owner_id` matches the requesting principal.
///
/// A mismatch is reported as `NotFound` for the resource, never 403.
pub fn ensure_owner(principal_id: UserId, owner_id: UserId, resource: &str, id: &Uuid) -> Result<()> {
    if principal_id == owner_id {
        Ok(())
    } else {
        Err(Error::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_matching_owner_passes() {
        let owner = Uuid::new_v4();
        let resource_id = Uuid::new_v4();
        assert!(ensure_owner(owner, owner, "Property", &resource_id).is_ok());
    }

    #[test]
    fn test_foreign_owner_renders_as_not_found() {
        let principal = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let resource_id = Uuid::new_v4();

        let err = ensure_owner(principal, owner, "Property", &resource_id).unwrap_err();
        // Cross-tenant access must look identical to a missing resource
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.user_message().contains(&resource_id.to_string()));
    }
}
