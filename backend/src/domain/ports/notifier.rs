//! Port for out-of-band delivery of text messages to participants.

use async_trait::async_trait;

use crate::domain::ContactAddress;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification adapters.
    pub enum NotifierError {
        /// The provider could not be reached.
        Transport { message: String } =>
            "notification transport failed: {message}",
        /// The provider refused the message.
        Rejected { status: u16, message: String } =>
            "notification rejected with status {status}: {message}",
    }
}

/// Port for sending a multi-line text message to one contact.
///
/// Callers treat failures as non-fatal: a failed delivery never rolls back
/// the state change that triggered it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `lines` (joined with newlines) to `contact`.
    async fn send(&self, contact: &ContactAddress, lines: &[String]) -> Result<(), NotifierError>;
}

/// Notifier that accepts and discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotifier;

#[async_trait]
impl Notifier for FixtureNotifier {
    async fn send(&self, _contact: &ContactAddress, _lines: &[String]) -> Result<(), NotifierError> {
        Ok(())
    }
}
