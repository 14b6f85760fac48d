//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{GiftExchangeCommand, GiftExchangeQuery, Notifier};
use crate::inbound::bot::BotRouter;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub bot: BotRouter,
    pub exchanges_query: Arc<dyn GiftExchangeQuery>,
}

impl HttpState {
    /// Construct state from the driving ports and the notifier used for
    /// assignment fan-out.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::FixtureNotifier;
    /// use backend::domain::{AssignmentEngine, ExchangeRegistry};
    /// use backend::domain::ports::FixedRandomSource;
    /// use backend::inbound::http::state::HttpState;
    /// use backend::outbound::memory::InMemoryExchangeRepository;
    ///
    /// let registry = Arc::new(ExchangeRegistry::new(
    ///     Arc::new(InMemoryExchangeRepository::default()),
    ///     Arc::new(FixtureNotifier),
    ///     AssignmentEngine::new(Arc::new(FixedRandomSource::from_u64(7))),
    /// ));
    /// let state = HttpState::new(registry.clone(), registry, Arc::new(FixtureNotifier));
    /// let _query = state.exchanges_query.clone();
    /// ```
    pub fn new(
        exchanges: Arc<dyn GiftExchangeCommand>,
        exchanges_query: Arc<dyn GiftExchangeQuery>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            bot: BotRouter::new(exchanges, notifier),
            exchanges_query,
        }
    }
}
