//! Driving ports for the gift-exchange use cases.
//!
//! Inbound adapters (the messaging bot and the JSON API) depend on these
//! traits only; the registry service implements them.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{
    AssignmentResult, ContactAddress, Exchange, ExchangeCode, ExchangeError, ExchangeStatus,
    NewParticipant, Participant,
};

/// Mutating use cases: create, join, draw, cancel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GiftExchangeCommand: Send + Sync {
    /// Open a new exchange owned by `creator`.
    async fn create_exchange(&self, creator: ContactAddress) -> Result<Exchange, ExchangeError>;

    /// Add a participant to an open exchange.
    async fn add_participant(
        &self,
        code: ExchangeCode,
        participant: NewParticipant,
    ) -> Result<Participant, ExchangeError>;

    /// Run the draw once and close the exchange.
    async fn close_and_assign(&self, code: ExchangeCode) -> Result<AssignmentResult, ExchangeError>;

    /// Delete the exchange. Returns whether anything was removed.
    async fn cancel_exchange(&self, code: ExchangeCode) -> Result<bool, ExchangeError>;
}

/// Public, contact-free view of an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeSummary {
    pub code: ExchangeCode,
    pub status: ExchangeStatus,
    pub participant_names: Vec<String>,
}

impl From<&Exchange> for ExchangeSummary {
    fn from(value: &Exchange) -> Self {
        Self {
            code: value.code(),
            status: value.status(),
            participant_names: value
                .participants()
                .iter()
                .map(|participant| participant.name().to_string())
                .collect(),
        }
    }
}

/// Read-only use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GiftExchangeQuery: Send + Sync {
    /// Summarise an exchange without exposing contacts or the draw.
    async fn exchange_summary(&self, code: ExchangeCode) -> Result<ExchangeSummary, ExchangeError>;
}
