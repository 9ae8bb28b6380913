//! Server settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `VAXDRIVE_*` environment variables over an
//! optional configuration file. Every field is optional; accessors supply
//! the defaults.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{DEFAULT_ASSIGNMENT_CONCURRENCY, LoginCredentials, LoginValidationError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_MAIL_TIMEOUT_SECS: u64 = 5;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Settings values that parse but cannot be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}")]
    BindAddr { value: String },
    #[error("invalid mail relay URL {value:?}")]
    MailRelayUrl { value: String },
    #[error("authority username and password must be configured together")]
    IncompleteAuthorityAccount,
    #[error("invalid authority account: {0}")]
    AuthorityAccount(#[from] LoginValidationError),
}

/// Runtime configuration for the `vaxdrive` server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "VAXDRIVE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Users assigned concurrently across all drives.
    pub assignment_concurrency: Option<usize>,
    /// Mail relay receiving registration requests; requests are only logged
    /// when absent.
    pub mail_relay_url: Option<String>,
    /// Per-request mail relay timeout in seconds.
    pub mail_timeout_secs: Option<u64>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a random session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub allow_ephemeral_session_key: bool,
    /// Send the session cookie without `Secure` (plain HTTP development).
    #[ortho_config(default = false)]
    pub cookie_insecure: bool,
    /// Authority account accepted by the login endpoint.
    pub authority_username: Option<String>,
    pub authority_password: Option<String>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    #[must_use]
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    #[must_use]
    pub fn assignment_concurrency(&self) -> usize {
        self.assignment_concurrency
            .unwrap_or(DEFAULT_ASSIGNMENT_CONCURRENCY)
    }

    pub fn mail_relay_url(&self) -> Result<Option<Url>, SettingsError> {
        self.mail_relay_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|_| SettingsError::MailRelayUrl {
                    value: raw.to_owned(),
                })
            })
            .transpose()
    }

    #[must_use]
    pub fn mail_timeout(&self) -> Duration {
        Duration::from_secs(self.mail_timeout_secs.unwrap_or(DEFAULT_MAIL_TIMEOUT_SECS))
    }

    #[must_use]
    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        !self.cookie_insecure
    }

    /// Configured authority account, or `None` when login is disabled.
    pub fn authority_account(&self) -> Result<Option<LoginCredentials>, SettingsError> {
        match (&self.authority_username, &self.authority_password) {
            (Some(username), Some(password)) => {
                Ok(Some(LoginCredentials::try_from_parts(username, password)?))
            }
            (None, None) => Ok(None),
            _ => Err(SettingsError::IncompleteAuthorityAccount),
        }
    }
}
