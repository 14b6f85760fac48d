//! Port for exchange, participant, and assignment persistence.

use async_trait::async_trait;

use crate::domain::{
    ContactAddress, Exchange, ExchangeCode, NewParticipant, Pairing, Participant, ParticipantId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by exchange repository adapters.
    pub enum ExchangeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "exchange repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "exchange repository query failed: {message}",
    }
}

/// Result of attempting to join an exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The participant was stored.
    Joined(Participant),
    /// No exchange uses the code.
    NotFound,
    /// The exchange is closed; nothing was written.
    Closed,
}

/// Result of attempting to commit a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Status flipped to closed and every pairing was stored.
    Closed,
    /// No exchange uses the code.
    NotFound,
    /// Another request closed the exchange first; nothing was written.
    AlreadyClosed,
    /// The stored participants no longer match the draw's givers, so the
    /// draw is stale; nothing was written.
    RosterChanged,
}

/// Whether `pairings` has exactly one giver per stored participant id.
///
/// Adapters call this while the exchange is locked, before committing a draw.
pub fn givers_match(
    stored: impl IntoIterator<Item = ParticipantId>,
    pairings: &[Pairing],
) -> bool {
    let mut stored: Vec<ParticipantId> = stored.into_iter().collect();
    let mut givers: Vec<ParticipantId> = pairings.iter().map(|p| p.giver.id()).collect();
    stored.sort_unstable();
    givers.sort_unstable();
    stored == givers
}

/// Port for storing exchanges and their committed draws.
///
/// Mutations with a status precondition check it inside the same transaction
/// that writes: `close_with_assignment` pairs the conditional `open -> closed`
/// update with the pairing inserts so concurrent draws cannot both succeed,
/// and it locks the exchange against joins while it compares the stored
/// participants with the draw.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeRepository: Send + Sync {
    /// Allocate a fresh open exchange with no participants.
    async fn create_exchange(
        &self,
        creator: &ContactAddress,
    ) -> Result<Exchange, ExchangeRepositoryError>;

    /// Load an exchange and its participants in join order.
    async fn find_exchange(
        &self,
        code: ExchangeCode,
    ) -> Result<Option<Exchange>, ExchangeRepositoryError>;

    /// Append a participant to an open exchange. The status check and the
    /// insert share one transaction.
    async fn add_participant(
        &self,
        code: ExchangeCode,
        participant: &NewParticipant,
    ) -> Result<JoinOutcome, ExchangeRepositoryError>;

    /// Close an open exchange and store its pairings atomically.
    ///
    /// The givers must be exactly the stored participants; otherwise
    /// [`CloseOutcome::RosterChanged`] is returned and nothing changes.
    async fn close_with_assignment(
        &self,
        code: ExchangeCode,
        pairings: &[Pairing],
    ) -> Result<CloseOutcome, ExchangeRepositoryError>;

    /// Read the committed pairings for a closed exchange.
    async fn find_assignment(
        &self,
        code: ExchangeCode,
    ) -> Result<Option<Vec<Pairing>>, ExchangeRepositoryError>;

    /// Delete an exchange with its participants and pairings.
    /// Returns whether anything was removed.
    async fn delete_exchange(&self, code: ExchangeCode) -> Result<bool, ExchangeRepositoryError>;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn pairing(giver: i64, receiver: i64) -> Pairing {
        let person = |id: i64| {
            Participant::new(
                ParticipantId::new(id),
                ExchangeCode::new(1).expect("valid code"),
                crate::domain::ParticipantName::new(format!("p{id}")).expect("valid name"),
                ContactAddress::new(format!("whatsapp:+1555{id}")).expect("valid contact"),
            )
        };
        Pairing {
            giver: person(giver),
            receiver: person(receiver),
        }
    }

    #[rstest]
    #[case(&[1, 2], &[(2, 1), (1, 2)], true)]
    #[case(&[1, 2, 3], &[(1, 2), (2, 1)], false)]
    #[case(&[1, 2], &[(1, 2), (2, 3), (3, 1)], false)]
    #[case(&[1, 3], &[(1, 2), (2, 1)], false)]
    #[case(&[], &[], true)]
    fn givers_match_compares_id_sets(
        #[case] stored: &[i64],
        #[case] pairs: &[(i64, i64)],
        #[case] expected: bool,
    ) {
        let pairings: Vec<Pairing> = pairs.iter().map(|&(g, r)| pairing(g, r)).collect();
        let stored = stored.iter().copied().map(ParticipantId::new);
        assert_eq!(givers_match(stored, &pairings), expected);
    }

    #[rstest]
    fn connection_error_formats_message() {
        let err = ExchangeRepositoryError::connection("pool timed out");
        assert_eq!(
            err.to_string(),
            "exchange repository connection failed: pool timed out"
        );
    }
}
