//! In-process exchange storage.
//!
//! Used when no database is configured and by integration tests. A single
//! mutex guards all state, so every port operation is atomic, including the
//! status check and write in `add_participant` and `close_with_assignment`,
//! and the roster comparison a draw is committed against.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CloseOutcome, ExchangeRepository, ExchangeRepositoryError, JoinOutcome, givers_match,
};
use crate::domain::{
    ContactAddress, Exchange, ExchangeCode, ExchangeDraft, ExchangeStatus, NewParticipant,
    Pairing, Participant, ParticipantId,
};

struct StoredExchange {
    creator_contact: ContactAddress,
    status: ExchangeStatus,
    created_at: DateTime<Utc>,
    participants: Vec<Participant>,
    pairings: Vec<Pairing>,
}

impl StoredExchange {
    fn snapshot(&self, code: ExchangeCode) -> Exchange {
        Exchange::new(ExchangeDraft {
            code,
            creator_contact: self.creator_contact.clone(),
            status: self.status,
            participants: self.participants.clone(),
            created_at: self.created_at,
        })
    }
}

#[derive(Default)]
struct MemoryState {
    last_code: i64,
    last_participant_id: i64,
    exchanges: BTreeMap<ExchangeCode, StoredExchange>,
}

/// Mutex-guarded implementation of [`ExchangeRepository`].
///
/// Codes and participant ids are allocated sequentially from 1 and never
/// reused, even after a delete.
#[derive(Default)]
pub struct InMemoryExchangeRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryExchangeRepository {
    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, ExchangeRepositoryError> {
        self.state
            .lock()
            .map_err(|_| ExchangeRepositoryError::query("in-memory repository lock poisoned"))
    }
}

#[async_trait]
impl ExchangeRepository for InMemoryExchangeRepository {
    async fn create_exchange(
        &self,
        creator: &ContactAddress,
    ) -> Result<Exchange, ExchangeRepositoryError> {
        let mut state = self.lock()?;
        state.last_code += 1;
        let code = ExchangeCode::new(state.last_code)
            .map_err(|err| ExchangeRepositoryError::query(err.to_string()))?;
        let stored = StoredExchange {
            creator_contact: creator.clone(),
            status: ExchangeStatus::Open,
            created_at: Utc::now(),
            participants: Vec::new(),
            pairings: Vec::new(),
        };
        let exchange = stored.snapshot(code);
        state.exchanges.insert(code, stored);
        Ok(exchange)
    }

    async fn find_exchange(
        &self,
        code: ExchangeCode,
    ) -> Result<Option<Exchange>, ExchangeRepositoryError> {
        let state = self.lock()?;
        Ok(state.exchanges.get(&code).map(|stored| stored.snapshot(code)))
    }

    async fn add_participant(
        &self,
        code: ExchangeCode,
        participant: &NewParticipant,
    ) -> Result<JoinOutcome, ExchangeRepositoryError> {
        let mut state = self.lock()?;
        let id = ParticipantId::new(state.last_participant_id + 1);
        let Some(stored) = state.exchanges.get_mut(&code) else {
            return Ok(JoinOutcome::NotFound);
        };
        if !stored.status.is_open() {
            return Ok(JoinOutcome::Closed);
        }
        let joined = Participant::new(
            id,
            code,
            participant.name.clone(),
            participant.contact.clone(),
        );
        stored.participants.push(joined.clone());
        state.last_participant_id = id.get();
        Ok(JoinOutcome::Joined(joined))
    }

    async fn close_with_assignment(
        &self,
        code: ExchangeCode,
        assignment: &[Pairing],
    ) -> Result<CloseOutcome, ExchangeRepositoryError> {
        let mut state = self.lock()?;
        let Some(stored) = state.exchanges.get_mut(&code) else {
            return Ok(CloseOutcome::NotFound);
        };
        if !stored.status.is_open() {
            return Ok(CloseOutcome::AlreadyClosed);
        }
        let stored_ids = stored.participants.iter().map(Participant::id);
        if !givers_match(stored_ids, assignment) {
            return Ok(CloseOutcome::RosterChanged);
        }
        stored.status = ExchangeStatus::Closed;
        stored.pairings = assignment.to_vec();
        Ok(CloseOutcome::Closed)
    }

    async fn find_assignment(
        &self,
        code: ExchangeCode,
    ) -> Result<Option<Vec<Pairing>>, ExchangeRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .exchanges
            .get(&code)
            .filter(|stored| !stored.pairings.is_empty())
            .map(|stored| stored.pairings.clone()))
    }

    async fn delete_exchange(&self, code: ExchangeCode) -> Result<bool, ExchangeRepositoryError> {
        let mut state = self.lock()?;
        Ok(state.exchanges.remove(&code).is_some())
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ParticipantName;

    const CREATOR: &str = "whatsapp:+15550000";

    #[fixture]
    fn repo() -> InMemoryExchangeRepository {
        InMemoryExchangeRepository::default()
    }

    fn contact(raw: &str) -> ContactAddress {
        ContactAddress::new(raw).expect("valid contact")
    }

    fn joiner(name: &str) -> NewParticipant {
        NewParticipant {
            name: ParticipantName::new(name).expect("valid name"),
            contact: contact(&format!("whatsapp:+1{name}")),
        }
    }

    async fn join(repo: &InMemoryExchangeRepository, code: ExchangeCode, name: &str) -> Participant {
        match repo.add_participant(code, &joiner(name)).await.expect("join") {
            JoinOutcome::Joined(participant) => participant,
            other => panic!("unexpected join outcome: {other:?}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn codes_are_sequential_and_never_reused(repo: InMemoryExchangeRepository) {
        let first = repo.create_exchange(&contact(CREATOR)).await.expect("create");
        assert!(repo.delete_exchange(first.code()).await.expect("delete"));
        let second = repo.create_exchange(&contact(CREATOR)).await.expect("create");

        assert_eq!(first.code().get(), 1);
        assert_eq!(second.code().get(), 2);
        assert!(second.status().is_open());
    }

    #[rstest]
    #[tokio::test]
    async fn participants_are_kept_in_join_order(repo: InMemoryExchangeRepository) {
        let code = repo.create_exchange(&contact(CREATOR)).await.expect("create").code();
        for name in ["Alice", "Bob", "Carol"] {
            join(&repo, code, name).await;
        }

        let exchange = repo.find_exchange(code).await.expect("find").expect("exists");
        let names: Vec<&str> = exchange
            .participants()
            .iter()
            .map(|participant| participant.name().as_str())
            .collect();
        assert_eq!(names, ["Alice", "Bob", "Carol"]);
    }

    #[rstest]
    #[tokio::test]
    async fn close_happens_exactly_once(repo: InMemoryExchangeRepository) {
        let code = repo.create_exchange(&contact(CREATOR)).await.expect("create").code();
        let alice = join(&repo, code, "Alice").await;
        let bob = join(&repo, code, "Bob").await;
        let pairings = vec![
            Pairing {
                giver: alice.clone(),
                receiver: bob.clone(),
            },
            Pairing {
                giver: bob,
                receiver: alice,
            },
        ];

        let first = repo.close_with_assignment(code, &pairings).await.expect("close");
        let second = repo.close_with_assignment(code, &[]).await.expect("close");

        assert_eq!(first, CloseOutcome::Closed);
        assert_eq!(second, CloseOutcome::AlreadyClosed);
        assert_eq!(
            repo.find_assignment(code).await.expect("find"),
            Some(pairings)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn stale_draw_is_not_committed(repo: InMemoryExchangeRepository) {
        let code = repo.create_exchange(&contact(CREATOR)).await.expect("create").code();
        let alice = join(&repo, code, "Alice").await;
        let bob = join(&repo, code, "Bob").await;
        let stale = vec![
            Pairing {
                giver: alice.clone(),
                receiver: bob.clone(),
            },
            Pairing {
                giver: bob,
                receiver: alice,
            },
        ];
        join(&repo, code, "Carol").await;

        let outcome = repo.close_with_assignment(code, &stale).await.expect("close");

        assert_eq!(outcome, CloseOutcome::RosterChanged);
        let exchange = repo.find_exchange(code).await.expect("find").expect("exists");
        assert!(exchange.status().is_open());
        assert!(repo.find_assignment(code).await.expect("find").is_none());
        join(&repo, code, "Dave").await;
    }

    #[rstest]
    #[tokio::test]
    async fn closed_exchange_rejects_joins(repo: InMemoryExchangeRepository) {
        let code = repo.create_exchange(&contact(CREATOR)).await.expect("create").code();
        repo.close_with_assignment(code, &[]).await.expect("close");

        let outcome = repo.add_participant(code, &joiner("Dave")).await.expect("join");

        assert_eq!(outcome, JoinOutcome::Closed);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_codes_are_reported(repo: InMemoryExchangeRepository) {
        let code = ExchangeCode::new(42).expect("valid code");

        assert!(repo.find_exchange(code).await.expect("find").is_none());
        assert_eq!(
            repo.add_participant(code, &joiner("Eve")).await.expect("join"),
            JoinOutcome::NotFound
        );
        assert_eq!(
            repo.close_with_assignment(code, &[]).await.expect("close"),
            CloseOutcome::NotFound
        );
        assert!(repo.find_assignment(code).await.expect("find").is_none());
        assert!(!repo.delete_exchange(code).await.expect("delete"));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_cascades(repo: InMemoryExchangeRepository) {
        let code = repo.create_exchange(&contact(CREATOR)).await.expect("create").code();
        join(&repo, code, "Alice").await;

        assert!(repo.delete_exchange(code).await.expect("delete"));
        assert!(repo.find_exchange(code).await.expect("find").is_none());
        assert_eq!(
            repo.add_participant(code, &joiner("Bob")).await.expect("join"),
            JoinOutcome::NotFound
        );
    }
}
