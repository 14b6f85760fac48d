//! Builds the HTTP state from configured adapters.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use backend::domain::ports::ExchangeRepository;
use backend::domain::{AssignmentEngine, ExchangeRegistry};
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryExchangeRepository;
use backend::outbound::persistence::DieselExchangeRepository;

use super::ServerConfig;

/// Wire the registry over PostgreSQL when a pool is configured, otherwise
/// over the in-memory store.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let repository: Arc<dyn ExchangeRepository> = match &config.db_pool {
        Some(pool) => Arc::new(DieselExchangeRepository::new(pool.clone())),
        None => {
            info!("no database configured; exchanges are kept in memory");
            Arc::new(InMemoryExchangeRepository::default())
        }
    };
    let registry = Arc::new(ExchangeRegistry::new(
        repository,
        Arc::clone(&config.notifier),
        AssignmentEngine::new(Arc::clone(&config.random)),
    ));
    web::Data::new(HttpState::new(
        registry.clone(),
        registry,
        Arc::clone(&config.notifier),
    ))
}
