//! PostgreSQL-backed `ExchangeRepository` implementation using Diesel ORM.
//!
//! Status-dependent writes run in one transaction with the status check.
//! Joins and draws both lock the exchange row with `FOR UPDATE`, so they are
//! serialised. A draw commits only if the exchange is still open and its
//! givers are exactly the stored participants; otherwise it writes nothing.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{
    CloseOutcome, ExchangeRepository, ExchangeRepositoryError, JoinOutcome, givers_match,
};
use crate::domain::{
    ContactAddress, Exchange, ExchangeCode, ExchangeDraft, ExchangeStatus, NewParticipant,
    Pairing, Participant, ParticipantId, ParticipantName,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ExchangeRow, NewExchangeRow, NewParticipantRow, PairingRow, ParticipantRow};
use super::pool::{DbPool, PoolError};
use super::schema::{exchanges, pairings, participants};

/// Diesel-backed implementation of the exchange repository port.
#[derive(Clone)]
pub struct DieselExchangeRepository {
    pool: DbPool,
}

impl DieselExchangeRepository {
    /// Create a repository over the given pool.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use backend::outbound::persistence::{DbPool, DieselExchangeRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/santa")).await?;
    /// let repository = DieselExchangeRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExchangeRepositoryError {
    map_basic_pool_error(error, |message| ExchangeRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ExchangeRepositoryError {
    map_basic_diesel_error(
        error,
        ExchangeRepositoryError::query,
        ExchangeRepositoryError::connection,
    )
}

fn corrupt(what: &str) -> ExchangeRepositoryError {
    ExchangeRepositoryError::query(format!("stored {what} is invalid"))
}

fn participant_from_row(row: ParticipantRow) -> Result<Participant, ExchangeRepositoryError> {
    Ok(Participant::new(
        ParticipantId::new(row.id),
        ExchangeCode::new(row.exchange_code).map_err(|_| corrupt("exchange code"))?,
        ParticipantName::new(row.name).map_err(|_| corrupt("participant name"))?,
        ContactAddress::new(row.contact).map_err(|_| corrupt("participant contact"))?,
    ))
}

fn exchange_from_rows(
    row: ExchangeRow,
    participant_rows: Vec<ParticipantRow>,
) -> Result<Exchange, ExchangeRepositoryError> {
    let participants = participant_rows
        .into_iter()
        .map(participant_from_row)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Exchange::new(ExchangeDraft {
        code: ExchangeCode::new(row.code).map_err(|_| corrupt("exchange code"))?,
        creator_contact: ContactAddress::new(row.creator_contact)
            .map_err(|_| corrupt("creator contact"))?,
        status: row
            .status
            .parse::<ExchangeStatus>()
            .map_err(|_| corrupt("exchange status"))?,
        participants,
        created_at: row.created_at,
    }))
}

async fn load_participants(
    conn: &mut AsyncPgConnection,
    code: i64,
) -> Result<Vec<ParticipantRow>, diesel::result::Error> {
    participants::table
        .filter(participants::exchange_code.eq(code))
        .order(participants::id.asc())
        .select(ParticipantRow::as_select())
        .load(conn)
        .await
}

#[async_trait]
impl ExchangeRepository for DieselExchangeRepository {
    async fn create_exchange(
        &self,
        creator: &ContactAddress,
    ) -> Result<Exchange, ExchangeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(exchanges::table)
            .values(&NewExchangeRow {
                creator_contact: creator.as_str(),
            })
            .returning(ExchangeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(code = row.code, "exchange row inserted");
        exchange_from_rows(row, Vec::new())
    }

    async fn find_exchange(
        &self,
        code: ExchangeCode,
    ) -> Result<Option<Exchange>, ExchangeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some(row) = exchanges::table
            .find(code.get())
            .select(ExchangeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };
        let participant_rows = load_participants(&mut conn, code.get())
            .await
            .map_err(map_diesel_error)?;
        exchange_from_rows(row, participant_rows).map(Some)
    }

    async fn add_participant(
        &self,
        code: ExchangeCode,
        participant: &NewParticipant,
    ) -> Result<JoinOutcome, ExchangeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let name = participant.name.as_str();
        let contact = participant.contact.as_str();
        let outcome = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let status: Option<String> = exchanges::table
                        .find(code.get())
                        .select(exchanges::status)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    match status.as_deref() {
                        None => return Ok(Err(JoinOutcome::NotFound)),
                        Some(status) if status != ExchangeStatus::Open.as_str() => {
                            return Ok(Err(JoinOutcome::Closed));
                        }
                        Some(_) => {}
                    }
                    diesel::insert_into(participants::table)
                        .values(&NewParticipantRow {
                            exchange_code: code.get(),
                            name,
                            contact,
                        })
                        .returning(ParticipantRow::as_returning())
                        .get_result(conn)
                        .await
                        .map(Ok)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        match outcome {
            Ok(row) => participant_from_row(row).map(JoinOutcome::Joined),
            Err(rejected) => Ok(rejected),
        }
    }

    async fn close_with_assignment(
        &self,
        code: ExchangeCode,
        assignment: &[Pairing],
    ) -> Result<CloseOutcome, ExchangeRepositoryError> {
        let rows: Vec<PairingRow> = assignment
            .iter()
            .map(|pairing| PairingRow {
                exchange_code: code.get(),
                giver_id: pairing.giver.id().get(),
                receiver_id: pairing.receiver.id().get(),
            })
            .collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let status: Option<String> = exchanges::table
                    .find(code.get())
                    .select(exchanges::status)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                match status.as_deref() {
                    None => return Ok(CloseOutcome::NotFound),
                    Some(status) if status != ExchangeStatus::Open.as_str() => {
                        return Ok(CloseOutcome::AlreadyClosed);
                    }
                    Some(_) => {}
                }

                let stored_ids: Vec<i64> = participants::table
                    .filter(participants::exchange_code.eq(code.get()))
                    .select(participants::id)
                    .load(conn)
                    .await?;
                if !givers_match(stored_ids.into_iter().map(ParticipantId::new), assignment) {
                    return Ok(CloseOutcome::RosterChanged);
                }

                diesel::update(exchanges::table.find(code.get()))
                    .set(exchanges::status.eq(ExchangeStatus::Closed.as_str()))
                    .execute(conn)
                    .await?;
                diesel::insert_into(pairings::table)
                    .values(&rows)
                    .execute(conn)
                    .await?;
                Ok(CloseOutcome::Closed)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_assignment(
        &self,
        code: ExchangeCode,
    ) -> Result<Option<Vec<Pairing>>, ExchangeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pairing_rows: Vec<PairingRow> = pairings::table
            .filter(pairings::exchange_code.eq(code.get()))
            .order(pairings::giver_id.asc())
            .select(PairingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if pairing_rows.is_empty() {
            return Ok(None);
        }

        let mut by_id: HashMap<i64, Participant> = HashMap::new();
        for row in load_participants(&mut conn, code.get())
            .await
            .map_err(map_diesel_error)?
        {
            by_id.insert(row.id, participant_from_row(row)?);
        }
        let lookup = |id: i64| by_id.get(&id).cloned().ok_or_else(|| corrupt("pairing"));

        pairing_rows
            .into_iter()
            .map(|row| {
                Ok(Pairing {
                    giver: lookup(row.giver_id)?,
                    receiver: lookup(row.receiver_id)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    async fn delete_exchange(&self, code: ExchangeCode) -> Result<bool, ExchangeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(exchanges::table.find(code.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion coverage.

    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    fn exchange_row(status: &str) -> ExchangeRow {
        ExchangeRow {
            code: 9,
            creator_contact: "whatsapp:+15550000".to_owned(),
            status: status.to_owned(),
            created_at: Utc::now(),
        }
    }

    fn participant_row(id: i64, name: &str) -> ParticipantRow {
        ParticipantRow {
            id,
            exchange_code: 9,
            name: name.to_owned(),
            contact: format!("whatsapp:+1555000{id}"),
        }
    }

    #[rstest]
    fn rows_become_exchange_in_join_order() {
        let exchange = exchange_from_rows(
            exchange_row("open"),
            vec![participant_row(1, "Alice"), participant_row(2, "Bob")],
        )
        .expect("valid rows");

        assert_eq!(exchange.code().get(), 9);
        assert!(exchange.status().is_open());
        let names: Vec<&str> = exchange
            .participants()
            .iter()
            .map(|participant| participant.name().as_str())
            .collect();
        assert_eq!(names, ["Alice", "Bob"]);
    }

    #[rstest]
    #[case(exchange_row("pending"), Vec::new())]
    #[case(exchange_row("open"), vec![participant_row(1, "  ")])]
    fn corrupt_rows_are_query_errors(
        #[case] row: ExchangeRow,
        #[case] participant_rows: Vec<ParticipantRow>,
    ) {
        let err = exchange_from_rows(row, participant_rows).expect_err("corrupt row");
        assert!(matches!(err, ExchangeRepositoryError::Query { .. }));
    }
}
