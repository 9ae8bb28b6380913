//! Driving port for citizen self sign-up.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserSignUp: Send + Sync {
    async fn sign_up(&self, user: NewUser) -> Result<User, Error>;
}
