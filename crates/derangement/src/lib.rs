//! Uniform random derangements for gift-exchange draws.
//!
//! A derangement is a permutation with no fixed points: when participants are
//! paired with `items[i] -> items[σ(i)]`, nobody is paired with themselves.
//! The crate is independent of any backend types so the sampler can be tested
//! and reused in isolation.
//!
//! # Example
//!
//! ```
//! use derangement::derange;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let pairs = derange(&["alice", "bob", "carol"], &mut rng).expect("three items");
//!
//! assert_eq!(pairs.len(), 3);
//! assert!(pairs.iter().all(|(giver, receiver)| giver != receiver));
//! ```

mod error;
mod sampler;

pub use error::DerangementError;
pub use sampler::{Draw, MIN_ITEMS, derange, derangement_indices, draw_indices, is_derangement};
