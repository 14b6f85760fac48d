//! Assignment engine: turns a finalised participant list into a draw.
//!
//! The engine owns no state beyond its injected [`RandomSource`]. Each call
//! seeds a fresh `ChaCha8Rng`, so repeated calls on the same input produce
//! independent draws; only the registry enforces run-once semantics.

use std::sync::Arc;

use derangement::{DerangementError, draw_indices, is_derangement};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::ports::RandomSource;
use super::{AssignmentResult, ExchangeCode, ExchangeError, Pairing, Participant};

/// Draws uniformly random derangements of an exchange's participants.
#[derive(Clone)]
pub struct AssignmentEngine {
    random: Arc<dyn RandomSource>,
}

impl AssignmentEngine {
    /// Create an engine drawing seeds from `random`.
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// Pair every participant with someone else.
    ///
    /// Givers keep the input order; receivers follow a uniformly random
    /// derangement, so each participant gives once, receives once, and never
    /// draws themselves.
    ///
    /// # Errors
    /// Returns [`ExchangeError::InsufficientParticipants`] for fewer than two
    /// participants.
    pub fn assign(
        &self,
        code: ExchangeCode,
        participants: &[Participant],
    ) -> Result<AssignmentResult, ExchangeError> {
        let mut rng = ChaCha8Rng::from_seed(self.random.seed());
        let draw = draw_indices(participants.len(), &mut rng).map_err(|err| match err {
            DerangementError::TooFewItems { count } => {
                ExchangeError::InsufficientParticipants { code, count }
            }
        })?;
        debug_assert!(is_derangement(draw.indices()));
        debug!(
            exchange = %code,
            participants = participants.len(),
            attempts = draw.attempts(),
            "assignment drawn"
        );

        let pairings = participants
            .iter()
            .zip(draw.indices())
            .filter_map(|(giver, &receiver)| {
                participants.get(receiver).map(|receiver| Pairing {
                    giver: giver.clone(),
                    receiver: receiver.clone(),
                })
            })
            .collect();
        Ok(AssignmentResult::new(code, pairings))
    }
}
