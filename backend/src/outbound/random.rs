//! Operating-system entropy for the assignment engine.

use rand::RngCore;

use crate::domain::ports::RandomSource;

/// Seeds each draw from the thread-local OS-seeded RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandomSource;

impl RandomSource for OsRandomSource {
    fn seed(&self) -> [u8; 32] {
        let mut seed = [0_u8; 32];
        rand::rng().fill_bytes(&mut seed);
        seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successive_seeds_differ() {
        let source = OsRandomSource;
        assert_ne!(source.seed(), source.seed());
    }
}
