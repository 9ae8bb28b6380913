//! Reqwest-backed notifier posting registration requests to a mail relay.
//!
//! The relay receives one JSON message per user and owns delivery. Any
//! non-2xx answer is reported as a rejection.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::ports::{NotificationError, RegistrationNotifier};
use crate::domain::{StandPointId, User};

pub(crate) const REGISTRATION_SUBJECT: &str = "Register for your nearby vaccination drive";

/// Body posted to the relay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationMessage<'a> {
    pub to: &'a str,
    pub name: &'a str,
    pub subject: &'a str,
    pub stand_point_ids: &'a [StandPointId],
}

impl<'a> From<&'a User> for RegistrationMessage<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            to: user.email(),
            name: user.name(),
            subject: REGISTRATION_SUBJECT,
            stand_point_ids: user.map_view_stand_points(),
        }
    }
}

pub struct HttpRegistrationNotifier {
    client: Client,
    endpoint: Url,
}

impl HttpRegistrationNotifier {
    /// Build a notifier whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl RegistrationNotifier for HttpRegistrationNotifier {
    async fn send_registration_request(&self, user: &User) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&RegistrationMessage::from(user))
            .send()
            .await
            .map_err(map_transport_error)?;
        check_status(response.status())
    }
}

fn map_transport_error(error: reqwest::Error) -> NotificationError {
    if error.is_builder() || error.is_body() {
        NotificationError::encoding(error.to_string())
    } else if error.is_timeout() {
        NotificationError::transport(format!("timed out: {error}"))
    } else {
        NotificationError::transport(error.to_string())
    }
}

fn check_status(status: StatusCode) -> Result<(), NotificationError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(NotificationError::rejected(status.as_u16()))
    }
}
