//! Domain entities, ports, and services.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport agnostic failure payload.
//! - `StandPoint`, `User`, `Geometry`: stored entities.
//! - `DriveMatchingService` and `DriveAssignmentWorker`: drive workflow.
//! - `ports`: driving and driven traits implemented by services and adapters.

pub mod auth;
mod drive_assignment;
mod drive_matching;
pub mod error;
mod geometry;
mod ids;
pub mod ports;
mod registration_query;
mod sign_up_service;
mod stand_point;
mod stand_point_service;
#[cfg(test)]
pub(crate) mod test_fixtures;
mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::drive_assignment::{
    AssignmentFailure, AssignmentStage, DEFAULT_ASSIGNMENT_CONCURRENCY, DriveAssignmentHandle,
    DriveAssignmentReport, DriveAssignmentWorker,
};
pub use self::drive_matching::{DRIVE_MATCH_RADIUS_METERS, DriveMatchingService};
pub use self::error::{Error, ErrorCode};
pub use self::geometry::{DEFAULT_GEOMETRY_TYPE, Geometry};
pub use self::ids::{AuthorityId, InvalidId, StandPointId, UserId};
pub use self::registration_query::RegisteredUsersService;
pub use self::sign_up_service::UserSignUpService;
pub use self::stand_point::{DEFAULT_NUMBER_OF_USER, NewStandPoint, StandPoint};
pub use self::stand_point_service::StandPointService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Distance, NearbyUser, NewUser, User, UserDraft, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use vaxdrive::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("login required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
