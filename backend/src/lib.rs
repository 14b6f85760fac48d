//! Secret Santa backend library.
//!
//! Hexagonal layout: `domain` holds the exchange registry, assignment engine
//! and ports; `inbound` adapts the messaging webhook and JSON API onto the
//! driving ports; `outbound` implements persistence, notification, and
//! entropy.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
