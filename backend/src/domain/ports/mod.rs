//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, `LoginService`, `UserSignUp`) are
//! called by inbound adapters. Driven ports (`*Repository`,
//! `RegistrationNotifier`) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod drive_command;
mod login_service;
mod registered_users_query;
mod registration_notifier;
mod stand_point_command;
mod stand_point_repository;
mod user_repository;
mod user_sign_up;

#[cfg(test)]
pub use drive_command::MockDriveCommand;
pub use drive_command::{CreateDriveRequest, CreateDriveResponse, DriveCommand, DriveStandPoint};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{AuthorityLoginService, LoginService};
#[cfg(test)]
pub use registered_users_query::MockRegisteredUsersQuery;
pub use registered_users_query::RegisteredUsersQuery;
#[cfg(test)]
pub use registration_notifier::MockRegistrationNotifier;
pub use registration_notifier::{NotificationError, RegistrationNotifier};
#[cfg(test)]
pub use stand_point_command::MockStandPointCommand;
pub use stand_point_command::StandPointCommand;
#[cfg(test)]
pub use stand_point_repository::MockStandPointRepository;
pub use stand_point_repository::{StandPointRepository, StandPointRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use user_sign_up::MockUserSignUp;
pub use user_sign_up::UserSignUp;
