//! Registration notifier adapters.

mod http_notifier;
mod log_notifier;

pub use http_notifier::{HttpRegistrationNotifier, RegistrationMessage};
pub use log_notifier::LogRegistrationNotifier;
