//! HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use reqwest::Url;
use vaxdrive::domain::{DEFAULT_ASSIGNMENT_CONCURRENCY, LoginCredentials};
use vaxdrive::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) mail_relay: Option<(Url, Duration)>,
    pub(crate) assignment_concurrency: usize,
    pub(crate) authority_account: Option<LoginCredentials>,
}

impl ServerConfig {
    /// Session and listener settings; everything else starts at its default
    /// (in-memory store, log notifier, login disabled).
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            mail_relay: None,
            assignment_concurrency: DEFAULT_ASSIGNMENT_CONCURRENCY,
            authority_account: None,
        }
    }

    /// Use PostgreSQL-backed repositories instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Post registration requests to a mail relay instead of logging them.
    #[must_use]
    pub fn with_mail_relay(mut self, endpoint: Url, timeout: Duration) -> Self {
        self.mail_relay = Some((endpoint, timeout));
        self
    }

    #[must_use]
    pub fn with_assignment_concurrency(mut self, max_in_flight: usize) -> Self {
        self.assignment_concurrency = max_in_flight;
        self
    }

    #[must_use]
    pub fn with_authority_account(mut self, account: Option<LoginCredentials>) -> Self {
        self.authority_account = account;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
