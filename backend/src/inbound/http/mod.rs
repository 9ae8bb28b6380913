//! HTTP inbound adapter exposing the REST endpoints under `/api/v1`.

pub mod auth;
pub mod drives;
pub mod error;
pub mod health;
pub mod session;
pub mod stand_points;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub(crate) mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler plus the JSON error mapping.
///
/// The caller owns the scope and its session middleware.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use vaxdrive::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .service(auth::login)
        .service(auth::sign_up)
        .service(stand_points::create_stand_points)
        .service(drives::create_drive)
        .service(drives::registered_users);
}
