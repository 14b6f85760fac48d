//! Early-rejection derangement sampler.
//!
//! Each attempt runs a Fisher-Yates shuffle from the tail. Position `i` is
//! final as soon as it has been swapped, so an attempt is abandoned the moment
//! a final position holds its own index. Accepted attempts are exactly the
//! fixed-point-free outcomes of a uniform shuffle, which keeps the result
//! uniform over all derangements. The expected number of attempts tends to
//! `e` as the item count grows.

use rand::Rng;

use crate::error::DerangementError;

/// Smallest number of items that admits a derangement.
pub const MIN_ITEMS: usize = 2;

/// A sampled derangement together with the number of attempts it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    indices: Vec<usize>,
    attempts: u32,
}

impl Draw {
    /// Receiver index for each giver position.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of shuffles started before one was accepted.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Consume the draw and return the index permutation.
    #[must_use]
    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }
}

/// Draw a uniformly random derangement of `0..len`.
///
/// # Errors
///
/// Returns [`DerangementError::TooFewItems`] when `len` is below
/// [`MIN_ITEMS`].
///
/// # Examples
///
/// ```
/// use derangement::{draw_indices, is_derangement};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let draw = draw_indices(5, &mut rng).expect("five items");
/// assert!(is_derangement(draw.indices()));
/// assert!(draw.attempts() >= 1);
/// ```
pub fn draw_indices<R>(len: usize, rng: &mut R) -> Result<Draw, DerangementError>
where
    R: Rng + ?Sized,
{
    if len < MIN_ITEMS {
        return Err(DerangementError::TooFewItems { count: len });
    }

    let mut indices: Vec<usize> = (0..len).collect();
    let mut attempts: u32 = 0;
    loop {
        attempts = attempts.saturating_add(1);
        if shuffle_without_fixed_points(&mut indices, rng) {
            return Ok(Draw { indices, attempts });
        }
    }
}

/// Draw a uniformly random derangement of `0..len` and return only the
/// permutation.
///
/// # Errors
///
/// Returns [`DerangementError::TooFewItems`] when `len` is below
/// [`MIN_ITEMS`].
pub fn derangement_indices<R>(len: usize, rng: &mut R) -> Result<Vec<usize>, DerangementError>
where
    R: Rng + ?Sized,
{
    draw_indices(len, rng).map(Draw::into_indices)
}

/// Pair every item with another item so nobody is paired with itself.
///
/// The output keeps the input order for givers: `pairs[i].0` is `items[i]`.
///
/// # Errors
///
/// Returns [`DerangementError::TooFewItems`] when fewer than [`MIN_ITEMS`]
/// items are supplied.
pub fn derange<T, R>(items: &[T], rng: &mut R) -> Result<Vec<(T, T)>, DerangementError>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let draw = draw_indices(items.len(), rng)?;
    Ok(items
        .iter()
        .zip(draw.indices())
        .filter_map(|(giver, &receiver)| {
            items
                .get(receiver)
                .map(|receiver| (giver.clone(), receiver.clone()))
        })
        .collect())
}

/// Return `true` when `perm` is a permutation of `0..perm.len()` without fixed
/// points.
#[must_use]
pub fn is_derangement(perm: &[usize]) -> bool {
    let mut seen = vec![false; perm.len()];
    for (position, &target) in perm.iter().enumerate() {
        if position == target {
            return false;
        }
        match seen.get_mut(target) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

/// Run one tail-first Fisher-Yates attempt, bailing out on the first fixed
/// point. `indices` is reset before shuffling so retries start clean.
fn shuffle_without_fixed_points<R>(indices: &mut [usize], rng: &mut R) -> bool
where
    R: Rng + ?Sized,
{
    for (position, slot) in indices.iter_mut().enumerate() {
        *slot = position;
    }

    for position in (0..indices.len()).rev() {
        let pick = rng.random_range(0..=position);
        indices.swap(position, pick);
        if indices.get(position) == Some(&position) {
            return false;
        }
    }
    true
}
