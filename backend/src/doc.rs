//! OpenAPI document for the REST API.
//!
//! Served through Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Distance, Error, ErrorCode, Geometry, NearbyUser, StandPoint, User};
use crate::inbound::http::auth::{LoginRequest, SignUpRequest};
use crate::inbound::http::drives::{CreateDriveBody, DriveStandPointBody};
use crate::inbound::http::stand_points::{CreateStandPointsRequest, StandPointDescriptor};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Vaccination drive API",
        description = "Stand point selection, proximity drive matching, and registration reads."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::stand_points::create_stand_points,
        crate::inbound::http::drives::create_drive,
        crate::inbound::http::drives::registered_users,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Geometry,
        StandPoint,
        User,
        NearbyUser,
        Distance,
        LoginRequest,
        SignUpRequest,
        StandPointDescriptor,
        CreateStandPointsRequest,
        DriveStandPointBody,
        CreateDriveBody,
    )),
    tags(
        (name = "auth", description = "Authority login and citizen sign-up"),
        (name = "standpoints", description = "Vaccination locations"),
        (name = "drives", description = "Drive matching and registration reads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
