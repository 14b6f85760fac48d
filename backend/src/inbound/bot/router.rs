//! Dispatches parsed bot commands to the gift-exchange use cases.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{GiftExchangeCommand, Notifier};
use crate::domain::{
    AssignmentResult, ContactAddress, ExchangeError, NewParticipant, joined_message,
};

use super::command::{BotCommand, CodeCommand, CommandParseError};
use super::replies;

/// Turns one inbound message into the reply lines for its sender.
///
/// Use-case failures become user-facing replies; the router never fails.
/// After a successful draw every giver is messaged privately through the
/// [`Notifier`] before the sender's reply is returned.
#[derive(Clone)]
pub struct BotRouter {
    exchanges: Arc<dyn GiftExchangeCommand>,
    notifier: Arc<dyn Notifier>,
}

impl BotRouter {
    /// Create a router over the command port and the notifier used for
    /// pairing messages.
    pub fn new(exchanges: Arc<dyn GiftExchangeCommand>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            exchanges,
            notifier,
        }
    }

    /// Handle `message` sent by `sender`.
    pub async fn handle(&self, sender: &ContactAddress, message: &str) -> Vec<String> {
        match BotCommand::parse(message) {
            Ok(command) => self.dispatch(sender, command).await,
            Err(CommandParseError::InvalidCode { command, raw }) => {
                debug!(%command, raw, "rejected command with invalid code");
                replies::invalid_code(command)
            }
            Err(CommandParseError::MalformedAdd) => replies::add_usage(),
        }
    }

    async fn dispatch(&self, sender: &ContactAddress, command: BotCommand) -> Vec<String> {
        match command {
            BotCommand::Help => replies::help(),
            BotCommand::Create => match self.exchanges.create_exchange(sender.clone()).await {
                Ok(exchange) => {
                    info!(code = %exchange.code(), "exchange created via bot");
                    replies::created(exchange.code())
                }
                Err(err) => {
                    error!(error = %err, "failed to create exchange");
                    replies::unavailable()
                }
            },
            BotCommand::Add { name, code } => {
                let participant = NewParticipant {
                    name,
                    contact: sender.clone(),
                };
                match self.exchanges.add_participant(code, participant).await {
                    Ok(joined) => vec![joined_message(&joined)],
                    Err(err) => failure_reply(CodeCommand::Add, &err),
                }
            }
            BotCommand::Run { code } => match self.exchanges.close_and_assign(code).await {
                Ok(result) => {
                    self.notify_pairs(&result).await;
                    replies::done()
                }
                Err(err) => failure_reply(CodeCommand::Run, &err),
            },
            BotCommand::Cancel { code } => match self.exchanges.cancel_exchange(code).await {
                Ok(true) => replies::deleted(code),
                Ok(false) => vec![replies::no_such_exchange(code)],
                Err(err) => failure_reply(CodeCommand::Cancel, &err),
            },
            BotCommand::Unknown => {
                debug!("unrecognised bot message");
                replies::unknown()
            }
        }
    }

    async fn notify_pairs(&self, result: &AssignmentResult) {
        let deliveries = result.pairings().iter().map(|pairing| async move {
            let lines = replies::pairing(pairing);
            (pairing, self.notifier.send(pairing.giver.contact(), &lines).await)
        });
        for (pairing, outcome) in join_all(deliveries).await {
            if let Err(err) = outcome {
                warn!(
                    code = %result.exchange(),
                    giver = %pairing.giver.id().get(),
                    error = %err,
                    "failed to deliver assignment"
                );
            }
        }
    }
}

fn failure_reply(command: CodeCommand, err: &ExchangeError) -> Vec<String> {
    match err {
        ExchangeError::NotFound { code } => match command {
            CodeCommand::Add => replies::add_unknown_exchange(*code),
            CodeCommand::Run => replies::run_unknown_exchange(*code),
            CodeCommand::Cancel => vec![replies::no_such_exchange(*code)],
        },
        ExchangeError::NotOpen { code } => replies::not_open(*code),
        ExchangeError::InsufficientParticipants { code, count } => {
            replies::insufficient(*code, *count)
        }
        ExchangeError::Unavailable { .. } | ExchangeError::Internal { .. } => {
            error!(%command, error = %err, "bot command failed");
            replies::unavailable()
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
