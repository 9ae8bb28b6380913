//! Driving port for reading users registered at a stand point.

use async_trait::async_trait;

use crate::domain::{Error, StandPointId, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegisteredUsersQuery: Send + Sync {
    /// Every registered user assigned to `stand_point`, unpaginated.
    async fn registered_users(&self, stand_point: &StandPointId) -> Result<Vec<User>, Error>;
}
