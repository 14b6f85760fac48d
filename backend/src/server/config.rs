//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use backend::domain::ports::{Notifier, RandomSource};
use backend::outbound::persistence::DbPool;
use backend::outbound::random::OsRandomSource;
use backend::outbound::twilio::TracingNotifier;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) random: Arc<dyn RandomSource>,
}

impl ServerConfig {
    /// In-memory storage, log-only notifications, OS entropy.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            notifier: Arc::new(TracingNotifier),
            random: Arc::new(OsRandomSource),
        }
    }

    /// Persist exchanges in PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Deliver messages through `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[cfg_attr(not(test), expect(dead_code, reason = "tests inject fixed seeds"))]
    #[must_use]
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }
}
