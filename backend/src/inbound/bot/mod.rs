//! Text-message bot: command grammar, replies, and dispatch.

mod command;
mod replies;
mod router;
pub mod twiml;

pub use command::{BotCommand, CodeCommand, CommandParseError};
pub use router::BotRouter;
