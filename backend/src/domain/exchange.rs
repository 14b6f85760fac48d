//! Gift-exchange aggregate and its value types.
//!
//! Purpose: model one Secret Santa session (an [`Exchange`]), its members
//! ([`Participant`]), and the committed draw ([`AssignmentResult`]). Value
//! types validate on construction so adapters cannot smuggle blank contacts
//! or non-positive codes into the domain.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors raised by the exchange value types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeValidationError {
    /// Exchange codes are positive integers.
    #[error("exchange code must be a positive integer, got {value}")]
    NonPositiveCode { value: i64 },
    /// Contact addresses must contain non-whitespace characters.
    #[error("contact address must not be empty")]
    EmptyContact,
    /// Participant names must contain non-whitespace characters.
    #[error("participant name must not be empty")]
    EmptyName,
    /// Stored status text is not recognised.
    #[error("unknown exchange status: {value}")]
    UnknownStatus { value: String },
}

/// Human-shareable join code identifying an exchange.
///
/// # Examples
/// ```
/// use backend::domain::ExchangeCode;
///
/// let code = ExchangeCode::new(9).expect("positive code");
/// assert_eq!(code.get(), 9);
/// assert!(ExchangeCode::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ExchangeCode(i64);

impl ExchangeCode {
    /// Validate and wrap a raw code.
    pub fn new(value: i64) -> Result<Self, ExchangeValidationError> {
        if value <= 0 {
            return Err(ExchangeValidationError::NonPositiveCode { value });
        }
        Ok(Self(value))
    }

    /// Raw integer value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for ExchangeCode {
    type Error = ExchangeValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExchangeCode> for i64 {
    fn from(value: ExchangeCode) -> Self {
        value.0
    }
}

impl fmt::Display for ExchangeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque delivery address for notifications, e.g. `whatsapp:+15551234567`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContactAddress(String);

impl ContactAddress {
    /// Trim and validate a contact address.
    pub fn new(value: impl Into<String>) -> Result<Self, ExchangeValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ExchangeValidationError::EmptyContact);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ContactAddress {
    type Error = ExchangeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContactAddress> for String {
    fn from(value: ContactAddress) -> Self {
        value.0
    }
}

impl fmt::Display for ContactAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display name of a participant. Duplicates are allowed within an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantName(String);

impl ParticipantName {
    /// Trim and validate a display name.
    pub fn new(value: impl Into<String>) -> Result<Self, ExchangeValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ExchangeValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ParticipantName {
    type Error = ExchangeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ParticipantName> for String {
    fn from(value: ParticipantName) -> Self {
        value.0
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of an exchange. `Open -> Closed` happens exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeStatus {
    /// Accepting participants; the draw has not run.
    Open,
    /// Draw committed; no further joins or re-runs.
    Closed,
}

impl ExchangeStatus {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// `true` while participants may still join and the draw may run.
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl FromStr for ExchangeStatus {
    type Err = ExchangeValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(ExchangeValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ExchangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage identifier of a participant row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(i64);

impl ParticipantId {
    /// Wrap a storage identifier.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Details for a participant that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
    pub name: ParticipantName,
    pub contact: ContactAddress,
}

/// A member of exactly one exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    id: ParticipantId,
    exchange: ExchangeCode,
    name: ParticipantName,
    contact: ContactAddress,
}

impl Participant {
    /// Assemble a stored participant.
    pub fn new(
        id: ParticipantId,
        exchange: ExchangeCode,
        name: ParticipantName,
        contact: ContactAddress,
    ) -> Self {
        Self {
            id,
            exchange,
            name,
            contact,
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    /// Code of the owning exchange.
    pub fn exchange(&self) -> ExchangeCode {
        self.exchange
    }

    pub fn name(&self) -> &ParticipantName {
        &self.name
    }

    pub fn contact(&self) -> &ContactAddress {
        &self.contact
    }
}

/// One gift-exchange session.
///
/// ## Invariants
/// - A closed exchange has a committed, non-empty assignment.
/// - `participants` are kept in join order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    code: ExchangeCode,
    creator_contact: ContactAddress,
    status: ExchangeStatus,
    participants: Vec<Participant>,
    created_at: DateTime<Utc>,
}

/// Field bundle used by adapters to rebuild an [`Exchange`].
#[derive(Debug, Clone)]
pub struct ExchangeDraft {
    pub code: ExchangeCode,
    pub creator_contact: ContactAddress,
    pub status: ExchangeStatus,
    pub participants: Vec<Participant>,
    pub created_at: DateTime<Utc>,
}

impl Exchange {
    /// Rebuild an exchange from stored fields.
    pub fn new(draft: ExchangeDraft) -> Self {
        let ExchangeDraft {
            code,
            creator_contact,
            status,
            participants,
            created_at,
        } = draft;
        Self {
            code,
            creator_contact,
            status,
            participants,
            created_at,
        }
    }

    pub fn code(&self) -> ExchangeCode {
        self.code
    }

    /// Contact of whoever created the exchange; never changes.
    pub fn creator_contact(&self) -> &ContactAddress {
        &self.creator_contact
    }

    pub fn status(&self) -> ExchangeStatus {
        self.status
    }

    /// Participants in join order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether `contact` belongs to the exchange creator.
    pub fn is_creator(&self, contact: &ContactAddress) -> bool {
        &self.creator_contact == contact
    }
}

/// A giver and the person they buy for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub giver: Participant,
    pub receiver: Participant,
}

/// The committed draw for an exchange.
///
/// Every participant appears once as giver and once as receiver, and no
/// pairing has the same participant on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResult {
    exchange: ExchangeCode,
    pairings: Vec<Pairing>,
}

impl AssignmentResult {
    /// Wrap pairings drawn for `exchange`.
    pub fn new(exchange: ExchangeCode, pairings: Vec<Pairing>) -> Self {
        Self { exchange, pairings }
    }

    pub fn exchange(&self) -> ExchangeCode {
        self.exchange
    }

    pub fn pairings(&self) -> &[Pairing] {
        &self.pairings
    }

    pub fn into_pairings(self) -> Vec<Pairing> {
        self.pairings
    }
}
