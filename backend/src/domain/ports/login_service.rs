//! Driving port for authority login.
//!
//! Inbound adapters authenticate through this trait without knowing where
//! the authority credentials come from.

use async_trait::async_trait;

use crate::domain::{AuthorityId, Error, LoginCredentials};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated authority id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthorityId, Error>;
}

/// Login service accepting a single configured authority account.
///
/// The authority id is generated at construction, so sessions issued by one
/// process do not survive a restart with a different id.
#[derive(Debug, Clone)]
pub struct AuthorityLoginService {
    account: Option<LoginCredentials>,
    authority_id: AuthorityId,
}

impl AuthorityLoginService {
    /// Accept exactly `account`.
    #[must_use]
    pub fn new(account: LoginCredentials) -> Self {
        Self {
            account: Some(account),
            authority_id: AuthorityId::random(),
        }
    }

    /// Reject every login; used when no authority account is configured.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            account: None,
            authority_id: AuthorityId::random(),
        }
    }

    #[must_use]
    pub fn authority_id(&self) -> AuthorityId {
        self.authority_id
    }
}

#[async_trait]
impl LoginService for AuthorityLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthorityId, Error> {
        match &self.account {
            Some(account) if account.matches(credentials) => Ok(self.authority_id),
            Some(_) => Err(Error::unauthorized("invalid credentials")),
            None => {
                tracing::warn!("login attempted but no authority account is configured");
                Err(Error::unauthorized("invalid credentials"))
            }
        }
    }
}
