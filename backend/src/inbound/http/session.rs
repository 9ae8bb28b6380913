//! Session helpers for authority endpoints.
//!
//! Handlers only see [`SessionContext`], which stores and reads the
//! authenticated [`AuthorityId`] in the private session cookie.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AuthorityId, Error};

pub(crate) const AUTHORITY_ID_KEY: &str = "authority_id";

/// Session wrapper exposing authority-level operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the authenticated authority id, rotating the session key first.
    pub fn persist_authority(&self, authority_id: &AuthorityId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(AUTHORITY_ID_KEY, authority_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Current authority id; malformed values are treated as absent.
    pub fn authority_id(&self) -> Result<Option<AuthorityId>, Error> {
        let raw = self
            .0
            .get::<String>(AUTHORITY_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match raw.parse() {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid authority id in session cookie");
                None
            }
        }))
    }

    /// Require a logged-in authority or fail with `401 Unauthorized`.
    pub fn require_authority(&self) -> Result<AuthorityId, Error> {
        self.authority_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
