//! Notifier that only records registration requests in the log.

use async_trait::async_trait;
use tracing::info;

use crate::domain::User;
use crate::domain::ports::{NotificationError, RegistrationNotifier};

/// Default notifier when no mail relay is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRegistrationNotifier;

#[async_trait]
impl RegistrationNotifier for LogRegistrationNotifier {
    async fn send_registration_request(&self, user: &User) -> Result<(), NotificationError> {
        info!(
            user_id = %user.id(),
            stand_points = user.map_view_stand_points().len(),
            "registration request (no relay configured)"
        );
        Ok(())
    }
}
