//! Runtime settings loaded via OrthoConfig.
//!
//! Values layer defaults, `SANTA_*` environment variables, and CLI flags.
//! Accessors apply defaults and validate. The environment layer reads
//! numeric-looking values as numbers, so Twilio fields accept either.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::outbound::twilio::{DEFAULT_TWILIO_API_BASE, TwilioCredentials};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;

/// Longest all-digit sender treated as an SMS short code rather than E.164.
const SHORT_CODE_MAX_DIGITS: usize = 6;

/// Invalid combinations or values in [`AppSettings`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// `bind_addr` does not parse as `host:port`.
    #[error("bind address {value:?} is not a socket address")]
    InvalidBindAddr {
        /// The rejected value.
        value: String,
    },
    /// Some, but not all, Twilio settings were given.
    #[error("Twilio settings are incomplete; missing {missing}")]
    IncompleteTwilio {
        /// Name of the first missing setting.
        missing: &'static str,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|raw| match raw {
        Scalar::Text(text) => text,
        Scalar::Unsigned(value) => value.to_string(),
        Scalar::Signed(value) => value.to_string(),
    }))
}

/// Sender numbers lose their leading `+` when read as integers; restore it
/// for anything longer than a short code.
fn sender_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|raw| match raw {
        Scalar::Text(text) => text,
        Scalar::Unsigned(value) => e164_or_short_code(value.to_string()),
        Scalar::Signed(value) => e164_or_short_code(value.unsigned_abs().to_string()),
    }))
}

fn e164_or_short_code(digits: String) -> String {
    if digits.len() <= SHORT_CODE_MAX_DIGITS {
        digits
    } else {
        format!("+{digits}")
    }
}

/// Application settings.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SANTA")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = DEFAULT_DB_MAX_CONNECTIONS)]
    pub db_max_connections: Option<u32>,
    /// Twilio account identifier (`AC...`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub twilio_account_sid: Option<String>,
    /// Twilio auth token used for basic auth.
    #[serde(default, deserialize_with = "lenient_string")]
    pub twilio_auth_token: Option<String>,
    /// Sender address used for outbound messages, e.g. `+14155238886` or
    /// `whatsapp:+14155238886`.
    #[serde(default, deserialize_with = "sender_number")]
    pub twilio_number: Option<String>,
    /// Override for the Twilio REST base URL.
    pub twilio_api_base: Option<String>,
    /// Per-message delivery timeout.
    #[ortho_config(default = DEFAULT_NOTIFY_TIMEOUT_SECS)]
    pub notify_timeout_secs: Option<u64>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidBindAddr`] when the value does not
    /// parse as `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = non_blank(self.bind_addr.as_ref()).unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    /// PostgreSQL URL, or `None` when unset or blank.
    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_ref())
    }

    /// Pool size, defaulting to 10.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Twilio REST base URL.
    pub fn twilio_api_base(&self) -> &str {
        non_blank(self.twilio_api_base.as_ref()).unwrap_or(DEFAULT_TWILIO_API_BASE)
    }

    /// Per-message delivery timeout, defaulting to 10 seconds.
    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_secs.unwrap_or(DEFAULT_NOTIFY_TIMEOUT_SECS))
    }

    /// Twilio credentials, or `None` when none of them are set.
    ///
    /// # Errors
    /// Returns [`SettingsError::IncompleteTwilio`] when only some are set.
    pub fn twilio_credentials(&self) -> Result<Option<TwilioCredentials>, SettingsError> {
        let sid = non_blank(self.twilio_account_sid.as_ref());
        let token = non_blank(self.twilio_auth_token.as_ref());
        let number = non_blank(self.twilio_number.as_ref());
        match (sid, token, number) {
            (None, None, None) => Ok(None),
            (Some(sid), Some(token), Some(number)) => Ok(Some(TwilioCredentials {
                account_sid: sid.to_owned(),
                auth_token: token.to_owned(),
                from_number: number.to_owned(),
            })),
            (None, _, _) => Err(SettingsError::IncompleteTwilio {
                missing: "twilio_account_sid",
            }),
            (_, None, _) => Err(SettingsError::IncompleteTwilio {
                missing: "twilio_auth_token",
            }),
            (_, _, None) => Err(SettingsError::IncompleteTwilio {
                missing: "twilio_number",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 8] = [
        "SANTA_BIND_ADDR",
        "SANTA_DATABASE_URL",
        "SANTA_DB_MAX_CONNECTIONS",
        "SANTA_TWILIO_ACCOUNT_SID",
        "SANTA_TWILIO_AUTH_TOKEN",
        "SANTA_TWILIO_NUMBER",
        "SANTA_TWILIO_API_BASE",
        "SANTA_NOTIFY_TIMEOUT_SECS",
    ];

    fn load_with(overrides: &[(&str, &str)]) -> AppSettings {
        let _guard = lock_env(VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        }));
        AppSettings::load_from_iter([OsString::from("santa-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let settings = load_with(&[]);

        assert_eq!(
            settings.bind_addr().expect("default addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("valid addr")
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.db_max_connections(), 10);
        assert_eq!(settings.twilio_api_base(), DEFAULT_TWILIO_API_BASE);
        assert_eq!(settings.notify_timeout(), Duration::from_secs(10));
        assert_eq!(settings.twilio_credentials(), Ok(None));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_with(&[
            ("SANTA_BIND_ADDR", "127.0.0.1:9000"),
            ("SANTA_DATABASE_URL", "postgres://santa@localhost/santa"),
            ("SANTA_DB_MAX_CONNECTIONS", "3"),
            ("SANTA_TWILIO_ACCOUNT_SID", "AC123"),
            ("SANTA_TWILIO_AUTH_TOKEN", "secret"),
            ("SANTA_TWILIO_NUMBER", "whatsapp:+14155238886"),
            ("SANTA_NOTIFY_TIMEOUT_SECS", "2"),
        ]);

        assert_eq!(settings.bind_addr().expect("addr").port(), 9000);
        assert_eq!(settings.database_url(), Some("postgres://santa@localhost/santa"));
        assert_eq!(settings.db_max_connections(), 3);
        assert_eq!(settings.notify_timeout(), Duration::from_secs(2));
        let credentials = settings
            .twilio_credentials()
            .expect("complete credentials")
            .expect("credentials present");
        assert_eq!(credentials.account_sid, "AC123");
        assert_eq!(credentials.from_number, "whatsapp:+14155238886");
    }

    #[rstest]
    #[case(&[("SANTA_TWILIO_ACCOUNT_SID", "AC123")], "twilio_auth_token")]
    #[case(&[("SANTA_TWILIO_AUTH_TOKEN", "secret"), ("SANTA_TWILIO_NUMBER", "+1")], "twilio_account_sid")]
    #[case(&[("SANTA_TWILIO_ACCOUNT_SID", "AC123"), ("SANTA_TWILIO_AUTH_TOKEN", "secret")], "twilio_number")]
    fn partial_twilio_settings_are_rejected(
        #[case] overrides: &[(&str, &str)],
        #[case] missing: &'static str,
    ) {
        let settings = load_with(overrides);
        assert_eq!(
            settings.twilio_credentials().map(|_| ()),
            Err(SettingsError::IncompleteTwilio { missing })
        );
    }

    #[rstest]
    #[case("+14155238886", "+14155238886")]
    #[case("14155238886", "+14155238886")]
    #[case("12345", "12345")]
    #[case("whatsapp:+14155238886", "whatsapp:+14155238886")]
    fn bare_sender_numbers_load_as_strings(#[case] raw: &str, #[case] expected: &str) {
        let settings = load_with(&[
            ("SANTA_TWILIO_ACCOUNT_SID", "AC123"),
            ("SANTA_TWILIO_AUTH_TOKEN", "987654321"),
            ("SANTA_TWILIO_NUMBER", raw),
        ]);

        let credentials = settings
            .twilio_credentials()
            .expect("complete credentials")
            .expect("credentials present");
        assert_eq!(credentials.from_number, expected);
        assert_eq!(credentials.auth_token, "987654321");
    }

    #[rstest]
    fn bad_bind_addr_is_reported() {
        let settings = AppSettings {
            bind_addr: Some("localhost".to_owned()),
            ..AppSettings::default()
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidBindAddr { .. })
        ));
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let settings = AppSettings {
            database_url: Some("   ".to_owned()),
            ..AppSettings::default()
        };
        assert!(settings.database_url().is_none());
    }
}
