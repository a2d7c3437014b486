//! Common type definitions used throughout the application.
//!
//! This module provides:
//! - Type aliases for entity identifiers (`UserId`, `PropertyId`,
//!   `GuestviewTokenId`)
//! - Helpers for rendering identifiers in log output

use uuid::Uuid;

pub type UserId = Uuid;
pub type PropertyId = Uuid;
pub type GuestviewTokenId = Uuid;

/// Abbreviate a UUID to its first 8 characters for log readability.
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbrev_uuid() {
        let uuid = Uuid::parse_str("a1b2c3d4-e5f6-7890-abcd-ef1234567890").unwrap();
        assert_eq!(abbrev_uuid(&uuid), "a1b2c3d4");
    }
}
