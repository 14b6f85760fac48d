//! Port supplying entropy to the assignment engine.

/// Source of seeds for the assignment engine's RNG.
///
/// Each draw asks for a new seed, so repeated draws are independent. Tests
/// inject fixed seeds to make draws reproducible.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send + Sync {
    /// Return 32 bytes of fresh seed material.
    fn seed(&self) -> [u8; 32];
}

/// Random source that always returns the same seed.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandomSource([u8; 32]);

impl FixedRandomSource {
    /// Build a source from a small integer seed.
    pub fn from_u64(seed: u64) -> Self {
        let mut bytes = [0_u8; 32];
        for chunk in bytes.chunks_exact_mut(8) {
            chunk.copy_from_slice(&seed.to_le_bytes());
        }
        Self(bytes)
    }
}

impl RandomSource for FixedRandomSource {
    fn seed(&self) -> [u8; 32] {
        self.0
    }
}
