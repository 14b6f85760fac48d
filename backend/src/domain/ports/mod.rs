//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`ExchangeRepository`, `Notifier`, `RandomSource`) describe
//! what the domain needs from adapters. Driving ports
//! (`GiftExchangeCommand`, `GiftExchangeQuery`) describe what inbound
//! adapters may ask of the domain.

mod macros;
pub(crate) use macros::define_port_error;

mod exchange_repository;
mod gift_exchange_command;
mod notifier;
mod random_source;

#[cfg(test)]
pub use exchange_repository::MockExchangeRepository;
pub use exchange_repository::{
    CloseOutcome, ExchangeRepository, ExchangeRepositoryError, JoinOutcome, givers_match,
};
#[cfg(test)]
pub use gift_exchange_command::{MockGiftExchangeCommand, MockGiftExchangeQuery};
pub use gift_exchange_command::{ExchangeSummary, GiftExchangeCommand, GiftExchangeQuery};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{FixtureNotifier, Notifier, NotifierError};
#[cfg(test)]
pub use random_source::MockRandomSource;
pub use random_source::{FixedRandomSource, RandomSource};
