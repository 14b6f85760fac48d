//! Exchange registry service.
//!
//! Owns the lifecycle of exchanges: creation, joining, the one-time draw, and
//! cancellation. Persistence, notification, and randomness are injected so the
//! service itself holds no ambient state.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::assignment::AssignmentEngine;
use super::ports::{
    CloseOutcome, ExchangeRepository, ExchangeRepositoryError, ExchangeSummary,
    GiftExchangeCommand, GiftExchangeQuery, JoinOutcome, Notifier,
};
use super::{
    AssignmentResult, ContactAddress, Exchange, ExchangeCode, ExchangeError, NewParticipant,
    Participant,
};

/// Draws attempted before giving up on an exchange whose roster keeps changing.
const MAX_DRAW_ATTEMPTS: u32 = 3;

fn map_repository_error(error: ExchangeRepositoryError) -> ExchangeError {
    match error {
        ExchangeRepositoryError::Connection { message } => ExchangeError::unavailable(message),
        ExchangeRepositoryError::Query { message } => ExchangeError::internal(message),
    }
}

/// Message sent to an exchange creator when someone joins.
pub fn joined_message(participant: &Participant) -> String {
    format!("*{}* was added!", participant.name())
}

/// Registry service implementing the gift-exchange driving ports.
pub struct ExchangeRegistry<R: ?Sized, N: ?Sized> {
    repository: Arc<R>,
    notifier: Arc<N>,
    engine: AssignmentEngine,
}

impl<R: ?Sized, N: ?Sized> Clone for ExchangeRegistry<R, N> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            notifier: Arc::clone(&self.notifier),
            engine: self.engine.clone(),
        }
    }
}

impl<R, N> ExchangeRegistry<R, N>
where
    R: ExchangeRepository + ?Sized,
    N: Notifier + ?Sized,
{
    /// Create a registry over the given adapters.
    pub fn new(repository: Arc<R>, notifier: Arc<N>, engine: AssignmentEngine) -> Self {
        Self {
            repository,
            notifier,
            engine,
        }
    }

    async fn load(&self, code: ExchangeCode) -> Result<Exchange, ExchangeError> {
        self.repository
            .find_exchange(code)
            .await
            .map_err(map_repository_error)?
            .ok_or(ExchangeError::NotFound { code })
    }

    async fn notify_creator(&self, exchange: &Exchange, participant: &Participant) {
        let lines = [joined_message(participant)];
        if let Err(error) = self
            .notifier
            .send(exchange.creator_contact(), &lines)
            .await
        {
            warn!(
                exchange = %exchange.code(),
                %error,
                "failed to notify exchange creator about new participant"
            );
        }
    }
}

#[async_trait]
impl<R, N> GiftExchangeCommand for ExchangeRegistry<R, N>
where
    R: ExchangeRepository + ?Sized,
    N: Notifier + ?Sized,
{
    async fn create_exchange(&self, creator: ContactAddress) -> Result<Exchange, ExchangeError> {
        let exchange = self
            .repository
            .create_exchange(&creator)
            .await
            .map_err(map_repository_error)?;
        info!(exchange = %exchange.code(), "exchange created");
        Ok(exchange)
    }

    async fn add_participant(
        &self,
        code: ExchangeCode,
        participant: NewParticipant,
    ) -> Result<Participant, ExchangeError> {
        let exchange = self.load(code).await?;
        let outcome = self
            .repository
            .add_participant(code, &participant)
            .await
            .map_err(map_repository_error)?;

        let added = match outcome {
            JoinOutcome::Joined(added) => added,
            JoinOutcome::NotFound => return Err(ExchangeError::NotFound { code }),
            JoinOutcome::Closed => return Err(ExchangeError::NotOpen { code }),
        };
        info!(exchange = %code, participant = %added.id(), "participant joined");

        if !exchange.is_creator(added.contact()) {
            self.notify_creator(&exchange, &added).await;
        }
        Ok(added)
    }

    async fn close_and_assign(&self, code: ExchangeCode) -> Result<AssignmentResult, ExchangeError> {
        for attempt in 1..=MAX_DRAW_ATTEMPTS {
            let exchange = self.load(code).await?;
            if !exchange.status().is_open() {
                return Err(ExchangeError::NotOpen { code });
            }

            let result = self.engine.assign(code, exchange.participants())?;
            let outcome = self
                .repository
                .close_with_assignment(code, result.pairings())
                .await
                .map_err(map_repository_error)?;

            match outcome {
                CloseOutcome::Closed => {
                    info!(
                        exchange = %code,
                        pairings = result.pairings().len(),
                        "exchange closed with assignment"
                    );
                    return Ok(result);
                }
                CloseOutcome::NotFound => return Err(ExchangeError::NotFound { code }),
                CloseOutcome::AlreadyClosed => {
                    warn!(exchange = %code, "concurrent draw lost the race to close");
                    return Err(ExchangeError::NotOpen { code });
                }
                CloseOutcome::RosterChanged => {
                    warn!(exchange = %code, attempt, "participants changed during draw; redrawing");
                }
            }
        }
        Err(ExchangeError::unavailable(format!(
            "participants of exchange {code} kept changing during the draw"
        )))
    }

    async fn cancel_exchange(&self, code: ExchangeCode) -> Result<bool, ExchangeError> {
        let deleted = self
            .repository
            .delete_exchange(code)
            .await
            .map_err(map_repository_error)?;
        info!(exchange = %code, deleted, "exchange cancelled");
        Ok(deleted)
    }
}

#[async_trait]
impl<R, N> GiftExchangeQuery for ExchangeRegistry<R, N>
where
    R: ExchangeRepository + ?Sized,
    N: Notifier + ?Sized,
{
    async fn exchange_summary(&self, code: ExchangeCode) -> Result<ExchangeSummary, ExchangeError> {
        let exchange = self.load(code).await?;
        Ok(ExchangeSummary::from(&exchange))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
