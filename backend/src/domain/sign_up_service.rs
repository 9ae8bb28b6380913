//! Citizen sign-up service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{UserPersistenceError, UserRepository, UserSignUp};
use crate::domain::{Error, NewUser, User};

#[derive(Clone)]
pub struct UserSignUpService<R> {
    repo: Arc<R>,
}

impl<R> UserSignUpService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> UserSignUp for UserSignUpService<R>
where
    R: UserRepository,
{
    async fn sign_up(&self, user: NewUser) -> Result<User, Error> {
        let stored = self.repo.insert(&user).await.map_err(|err| match err {
            UserPersistenceError::Duplicate { .. } => {
                Error::conflict("a user with this email is already registered")
            }
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
        })?;
        info!(user_id = %stored.id(), "citizen signed up");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::test_fixtures::fixed_instant;
    use crate::domain::{ErrorCode, Geometry, UserId};
    use rstest::{fixture, rstest};

    #[fixture]
    fn new_user() -> NewUser {
        NewUser::try_new("Asha", "asha@example.org", None, Geometry::point(80.7, 22.3))
            .expect("valid user")
    }

    #[rstest]
    #[tokio::test]
    async fn stores_new_user(new_user: NewUser) {
        let mut repo = MockUserRepository::new();
        repo.expect_insert()
            .times(1)
            .returning(|user| Ok(user.clone().into_stored(UserId::random(), fixed_instant())));

        let stored = UserSignUpService::new(Arc::new(repo))
            .sign_up(new_user)
            .await
            .expect("sign-up succeeds");

        assert_eq!(stored.email(), "asha@example.org");
        assert!(!stored.is_registered());
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_conflict(new_user: NewUser) {
        let mut repo = MockUserRepository::new();
        repo.expect_insert()
            .return_once(|user| Err(UserPersistenceError::duplicate(user.email())));

        let err = UserSignUpService::new(Arc::new(repo))
            .sign_up(new_user)
            .await
            .expect_err("duplicate fails");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }
}
