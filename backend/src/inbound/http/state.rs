//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they can be exercised with mocks.

use std::sync::Arc;

use crate::domain::ports::{
    DriveCommand, LoginService, RegisteredUsersQuery, StandPointCommand, UserSignUp,
};

/// Driving ports used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub sign_up: Arc<dyn UserSignUp>,
    pub stand_points: Arc<dyn StandPointCommand>,
    pub drives: Arc<dyn DriveCommand>,
    pub registered_users: Arc<dyn RegisteredUsersQuery>,
}
