//! OpenAPI documentation for the hostlink API.
//!
//! The generated spec is served through the interactive reference at `/docs`.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::api;

/// Adds the session-token bearer scheme to the generated components.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "bearer".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Session token from `POST /api/auth/login` or `POST /api/auth/register`:\n\n\
                            ```\nAuthorization: Bearer YOUR_SESSION_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "hostlink API",
        description = "Identity and property management for hosts, with shareable guest links."
    ),
    modifiers(&SecurityAddon),
    paths(
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::auth::magic_link,
        api::handlers::auth::me,
        api::handlers::properties::list_properties,
        api::handlers::properties::create_property,
        api::handlers::properties::get_property,
        api::handlers::properties::update_property,
        api::handlers::properties::delete_property,
        api::handlers::guestview::rotate_guestview_token,
        api::handlers::guestview::get_guest_view,
    ),
    components(schemas(
        api::models::auth::RegisterRequest,
        api::models::auth::LoginRequest,
        api::models::auth::AuthResponse,
        api::models::auth::MagicLinkRequest,
        api::models::auth::MagicLinkResponse,
        api::models::users::UserResponse,
        api::models::properties::PropertyCreate,
        api::models::properties::PropertyUpdate,
        api::models::properties::PropertyResponse,
        api::models::guestview::GuestviewTokenResponse,
        api::models::guestview::GuestHostResponse,
        api::models::guestview::GuestViewResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login and session management"),
        (name = "properties", description = "A host's property portfolio"),
        (name = "guestview", description = "Shareable guest links"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_generates_and_covers_routes() {
        let spec = ApiDoc::openapi();
        let json = spec.to_json().unwrap();

        for path in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/magic-link",
            "/api/auth/me",
            "/api/properties",
            "/api/properties/{id}",
            "/api/guestview-token",
            "/api/guestview/{token}",
        ] {
            assert!(json.contains(path), "missing path: {path}");
        }
        assert!(json.contains("bearer"));
    }
}
