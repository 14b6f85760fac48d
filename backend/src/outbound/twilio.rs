//! Outbound message delivery.
//!
//! [`TwilioNotifier`] posts to the Twilio Messages API; [`TracingNotifier`]
//! only logs and stands in when no credentials are configured.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info};

use crate::domain::ContactAddress;
use crate::domain::ports::{Notifier, NotifierError};

/// Default Twilio REST endpoint.
pub const DEFAULT_TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Account credentials and sender identity for Twilio.
#[derive(Clone, PartialEq, Eq)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender address, e.g. `whatsapp:+14155238886`.
    pub from_number: String,
}

impl fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .finish()
    }
}

/// Notifier backed by the Twilio Messages API.
pub struct TwilioNotifier {
    client: Client,
    messages_url: Url,
    credentials: TwilioCredentials,
}

impl TwilioNotifier {
    /// Build a notifier with a per-request timeout.
    ///
    /// # Errors
    /// Returns [`NotifierError::Transport`] when `api_base` is not a valid
    /// URL or the HTTP client cannot be built.
    pub fn new(
        api_base: &str,
        credentials: TwilioCredentials,
        timeout: Duration,
    ) -> Result<Self, NotifierError> {
        let messages_url = messages_url(api_base, &credentials.account_sid)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| NotifierError::transport(err.to_string()))?;
        Ok(Self {
            client,
            messages_url,
            credentials,
        })
    }
}

fn messages_url(api_base: &str, account_sid: &str) -> Result<Url, NotifierError> {
    let base = Url::parse(api_base)
        .map_err(|err| NotifierError::transport(format!("invalid Twilio base URL: {err}")))?;
    base.join(&format!("/2010-04-01/Accounts/{account_sid}/Messages.json"))
        .map_err(|err| NotifierError::transport(format!("invalid Twilio messages URL: {err}")))
}

#[async_trait]
impl Notifier for TwilioNotifier {
    async fn send(&self, contact: &ContactAddress, lines: &[String]) -> Result<(), NotifierError> {
        let body = lines.join("\n");
        let response = self
            .client
            .post(self.messages_url.clone())
            .basic_auth(&self.credentials.account_sid, Some(&self.credentials.auth_token))
            .form(&[
                ("To", contact.as_str()),
                ("From", self.credentials.from_number.as_str()),
                ("Body", body.as_str()),
            ])
            .send()
            .await
            .map_err(|err| NotifierError::transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!(to = %contact, status = status.as_u16(), "message accepted");
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| NotifierError::transport(err.to_string()))?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> NotifierError {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        NotifierError::transport(format!("status {}: {}", status.as_u16(), body_preview(body)))
    } else {
        NotifierError::rejected(status.as_u16(), body_preview(body))
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Notifier that writes each message to the log instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send(&self, contact: &ContactAddress, lines: &[String]) -> Result<(), NotifierError> {
        info!(to = %contact, message = %lines.join("\n"), "outbound message (not delivered)");
        Ok(())
    }
}
