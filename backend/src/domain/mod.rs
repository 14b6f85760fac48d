//! Domain primitives, services, and ports.
//!
//! Purpose: hold the gift-exchange core. The registry owns exchange
//! lifecycle; the assignment engine draws derangements. Both depend only on
//! the ports in [`ports`], never on adapters.
//!
//! Public surface:
//! - Exchange value types (`Exchange`, `Participant`, `ExchangeCode`, ...).
//! - `ExchangeRegistry` and `AssignmentEngine` services.
//! - `ExchangeError` for use-case failures and `Error`/`ErrorCode` for JSON
//!   adapters.
//! - `TraceId` request correlation.

pub mod assignment;
pub mod error;
pub mod exchange;
pub mod exchange_error;
pub mod ports;
pub mod registry;
pub mod trace_id;

pub use self::assignment::AssignmentEngine;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::exchange::{
    AssignmentResult, ContactAddress, Exchange, ExchangeCode, ExchangeDraft, ExchangeStatus,
    ExchangeValidationError, NewParticipant, Pairing, Participant, ParticipantId,
    ParticipantName,
};
pub use self::exchange_error::ExchangeError;
pub use self::registry::{ExchangeRegistry, joined_message};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
