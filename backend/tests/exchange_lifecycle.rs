//! Registry behaviour over the in-memory store, including concurrent draws.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use backend::domain::ports::{
    CloseOutcome, ExchangeRepository, ExchangeRepositoryError, FixtureNotifier,
    GiftExchangeCommand, GiftExchangeQuery, JoinOutcome,
};
use backend::domain::{
    AssignmentEngine, ContactAddress, Exchange, ExchangeCode, ExchangeError, ExchangeRegistry,
    ExchangeStatus, NewParticipant, Pairing, ParticipantName,
};
use backend::outbound::memory::InMemoryExchangeRepository;
use backend::outbound::random::OsRandomSource;
use futures_util::future::join_all;
use rstest::rstest;

mod support;

use support::memory_registry;

fn contact(raw: &str) -> ContactAddress {
    ContactAddress::new(raw).expect("valid contact")
}

fn joiner(index: usize) -> NewParticipant {
    NewParticipant {
        name: ParticipantName::new(format!("Guest {index}")).expect("valid name"),
        contact: contact(&format!("whatsapp:+1555010{index}")),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_runs_commit_exactly_one_draw() {
    let (registry, notifier) = memory_registry(11);
    let code = registry
        .create_exchange(contact("whatsapp:+15550000"))
        .await
        .expect("create")
        .code();
    for index in 0..5 {
        registry
            .add_participant(code, joiner(index))
            .await
            .expect("join");
    }
    notifier.clear();

    let attempts = (0..8).map(|_| {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move { registry.close_and_assign(code).await })
    });
    let outcomes: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task completes"))
        .collect();

    let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(outcomes.iter().all(|outcome| matches!(
        outcome,
        Ok(_) | Err(ExchangeError::NotOpen { .. })
    )));
    let summary = registry.exchange_summary(code).await.expect("summary");
    assert_eq!(summary.status, ExchangeStatus::Closed);
}

#[rstest]
#[tokio::test]
async fn committed_draw_is_a_derangement_of_the_roster() {
    let repository = Arc::new(InMemoryExchangeRepository::default());
    let registry = ExchangeRegistry::new(
        Arc::clone(&repository),
        Arc::new(FixtureNotifier),
        AssignmentEngine::new(Arc::new(OsRandomSource)),
    );
    let code = registry
        .create_exchange(contact("whatsapp:+15550000"))
        .await
        .expect("create")
        .code();
    for index in 0..6 {
        registry
            .add_participant(code, joiner(index))
            .await
            .expect("join");
    }

    let result = registry.close_and_assign(code).await.expect("draw");
    let stored = repository
        .find_assignment(code)
        .await
        .expect("lookup")
        .expect("assignment stored");

    assert_eq!(stored, result.pairings());
    assert_eq!(stored.len(), 6);
    let mut givers: Vec<_> = stored.iter().map(|pairing| pairing.giver.id()).collect();
    let mut receivers: Vec<_> = stored.iter().map(|pairing| pairing.receiver.id()).collect();
    givers.sort();
    receivers.sort();
    assert_eq!(givers, receivers);
    assert!(stored
        .iter()
        .all(|pairing| pairing.giver.id() != pairing.receiver.id()));
}

#[rstest]
#[tokio::test]
async fn cancelled_exchange_rejects_everything() {
    let (registry, _) = memory_registry(3);
    let code = registry
        .create_exchange(contact("whatsapp:+15550000"))
        .await
        .expect("create")
        .code();

    assert!(registry.cancel_exchange(code).await.expect("cancel"));
    assert!(!registry.cancel_exchange(code).await.expect("cancel again"));
    assert_eq!(
        registry.add_participant(code, joiner(1)).await,
        Err(ExchangeError::NotFound { code })
    );
    assert_eq!(
        registry.close_and_assign(code).await.map(|_| ()),
        Err(ExchangeError::NotFound { code })
    );
}

/// Store that lets one more guest join just before the first draw commits.
struct JoinDuringDraw {
    inner: InMemoryExchangeRepository,
    late_joiner: NewParticipant,
    joined: AtomicBool,
}

#[async_trait]
impl ExchangeRepository for JoinDuringDraw {
    async fn create_exchange(
        &self,
        creator: &ContactAddress,
    ) -> Result<Exchange, ExchangeRepositoryError> {
        self.inner.create_exchange(creator).await
    }

    async fn find_exchange(
        &self,
        code: ExchangeCode,
    ) -> Result<Option<Exchange>, ExchangeRepositoryError> {
        self.inner.find_exchange(code).await
    }

    async fn add_participant(
        &self,
        code: ExchangeCode,
        participant: &NewParticipant,
    ) -> Result<JoinOutcome, ExchangeRepositoryError> {
        self.inner.add_participant(code, participant).await
    }

    async fn close_with_assignment(
        &self,
        code: ExchangeCode,
        pairings: &[Pairing],
    ) -> Result<CloseOutcome, ExchangeRepositoryError> {
        if !self.joined.swap(true, Ordering::SeqCst) {
            self.inner.add_participant(code, &self.late_joiner).await?;
        }
        self.inner.close_with_assignment(code, pairings).await
    }

    async fn find_assignment(
        &self,
        code: ExchangeCode,
    ) -> Result<Option<Vec<Pairing>>, ExchangeRepositoryError> {
        self.inner.find_assignment(code).await
    }

    async fn delete_exchange(&self, code: ExchangeCode) -> Result<bool, ExchangeRepositoryError> {
        self.inner.delete_exchange(code).await
    }
}

#[rstest]
#[tokio::test]
async fn join_racing_the_draw_is_included_in_the_committed_pairs() {
    let repository = Arc::new(JoinDuringDraw {
        inner: InMemoryExchangeRepository::default(),
        late_joiner: joiner(9),
        joined: AtomicBool::new(false),
    });
    let registry = ExchangeRegistry::new(
        Arc::clone(&repository),
        Arc::new(FixtureNotifier),
        AssignmentEngine::new(Arc::new(OsRandomSource)),
    );
    let code = registry
        .create_exchange(contact("whatsapp:+15550000"))
        .await
        .expect("create")
        .code();
    for index in 0..3 {
        registry
            .add_participant(code, joiner(index))
            .await
            .expect("join");
    }

    let result = registry.close_and_assign(code).await.expect("draw");

    let exchange = repository
        .find_exchange(code)
        .await
        .expect("lookup")
        .expect("exchange exists");
    assert_eq!(exchange.status(), ExchangeStatus::Closed);
    assert_eq!(exchange.participants().len(), 4);
    let stored = repository
        .find_assignment(code)
        .await
        .expect("lookup")
        .expect("assignment stored");
    assert_eq!(stored, result.pairings());
    let mut roster: Vec<_> = exchange.participants().iter().map(|p| p.id()).collect();
    let mut givers: Vec<_> = stored.iter().map(|pairing| pairing.giver.id()).collect();
    let mut receivers: Vec<_> = stored.iter().map(|pairing| pairing.receiver.id()).collect();
    roster.sort();
    givers.sort();
    receivers.sort();
    assert_eq!(givers, roster);
    assert_eq!(receivers, roster);
}
