//! Read side for users registered at a stand point.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{RegisteredUsersQuery, UserPersistenceError, UserRepository};
use crate::domain::{Error, StandPointId, User};

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        other => Error::internal(format!("user repository error: {other}")),
    }
}

#[derive(Clone)]
pub struct RegisteredUsersService<R> {
    repo: Arc<R>,
}

impl<R> RegisteredUsersService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> RegisteredUsersQuery for RegisteredUsersService<R>
where
    R: UserRepository,
{
    async fn registered_users(&self, stand_point: &StandPointId) -> Result<Vec<User>, Error> {
        self.repo
            .find_registered_for_stand_point(stand_point)
            .await
            .map_err(map_repository_error)
    }
}
