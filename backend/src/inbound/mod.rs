//! Inbound adapters: the messaging bot and its HTTP transport.

pub mod bot;
pub mod http;
