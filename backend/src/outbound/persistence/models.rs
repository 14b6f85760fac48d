//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{exchanges, pairings, participants};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = exchanges)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExchangeRow {
    pub code: i64,
    pub creator_contact: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = exchanges)]
pub(crate) struct NewExchangeRow<'a> {
    pub creator_contact: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ParticipantRow {
    pub id: i64,
    pub exchange_code: i64,
    pub name: String,
    pub contact: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = participants)]
pub(crate) struct NewParticipantRow<'a> {
    pub exchange_code: i64,
    pub name: &'a str,
    pub contact: &'a str,
}

/// A committed pairing; used for both reads and inserts.
#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = pairings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PairingRow {
    pub exchange_code: i64,
    pub giver_id: i64,
    pub receiver_id: i64,
}
