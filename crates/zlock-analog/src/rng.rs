//! Seeded random streams owned by the component simulators.
//!
//! Every simulator owns one [`SimRng`]. ChaCha8 is used because its output is
//! portable across platforms and releases, so a seed reproduces the same error
//! sequence everywhere, and because it supports random access by word
//! position, which the DNL profile relies on.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Random generator type used by every component.
pub type SimRng = ChaCha8Rng;

/// Generator seeded from a 64-bit seed.
pub fn seeded(seed: u64) -> SimRng {
    SimRng::seed_from_u64(seed)
}
