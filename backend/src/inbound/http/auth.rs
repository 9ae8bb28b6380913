//! Authority login and citizen sign-up handlers.
//!
//! ```text
//! POST /api/v1/auth/login {"username":"authority","password":"…"}
//! POST /api/v1/auth/sign-up {"name":"Asha","email":"asha@example.org","location":{"coordinates":[80.7,22.3]}}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    Error, Geometry, LoginCredentials, LoginValidationError, NewUser, User, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, ValidationCode, field_error};

/// Login request body.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "authority")]
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn map_login_validation_error(err: &LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyUsername => FieldName::new("username"),
        LoginValidationError::EmptyPassword => FieldName::new("password"),
    };
    field_error(field, ValidationCode::EmptyValue, err.to_string())
}

/// Authenticate the drive authority and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| map_login_validation_error(&err))?;
    let authority = state.login.authenticate(&credentials).await?;
    session.persist_authority(&authority)?;
    info!(authority = %authority, "authority logged in");
    Ok(HttpResponse::Ok().finish())
}

/// Citizen sign-up body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[schema(example = "Asha Patel")]
    pub name: String,
    #[schema(example = "asha@example.org")]
    pub email: String,
    #[serde(default)]
    pub mobile_number: Option<String>,
    pub location: Geometry,
}

impl TryFrom<SignUpRequest> for NewUser {
    type Error = UserValidationError;

    fn try_from(value: SignUpRequest) -> Result<Self, Self::Error> {
        Self::try_new(&value.name, &value.email, value.mobile_number, value.location)
    }
}

fn map_user_validation_error(err: &UserValidationError) -> Error {
    match err {
        UserValidationError::EmptyName => {
            field_error(FieldName::new("name"), ValidationCode::EmptyValue, err.to_string())
        }
        UserValidationError::InvalidEmail => {
            field_error(FieldName::new("email"), ValidationCode::InvalidEmail, err.to_string())
        }
    }
}

/// Register a citizen so drives can find them by location.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Stored user", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "User store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signUp",
    security([])
)]
#[post("/auth/sign-up")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let new_user =
        NewUser::try_from(payload.into_inner()).map_err(|err| map_user_validation_error(&err))?;
    let user = state.sign_up.sign_up(new_user).await?;
    Ok(HttpResponse::Created().json(user))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
