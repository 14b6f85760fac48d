//! HTTP inbound adapter: the messaging webhook, a read-only JSON API, and
//! health probes.

pub mod bot;
pub mod error;
pub mod exchanges;
pub mod health;
pub mod schemas;
pub mod state;

pub use error::ApiResult;
