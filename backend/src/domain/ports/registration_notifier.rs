//! Driven port for sending registration requests to matched users.

use async_trait::async_trait;

use crate::domain::User;

use super::define_port_error;

define_port_error! {
    /// Errors raised while dispatching a registration request.
    pub enum NotificationError {
        /// The relay could not be reached or timed out.
        Transport { message: String } => "registration request transport failed: {message}",
        /// The relay answered with a non-success status.
        Rejected { status: u16 } => "registration request rejected with status {status}",
        /// The message could not be built from the user record.
        Encoding { message: String } => "registration request could not be encoded: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationNotifier: Send + Sync {
    /// Ask `user` to register for the stand points now attached to them.
    async fn send_registration_request(&self, user: &User) -> Result<(), NotificationError>;
}
