//! Identity seeding.
//!
//! An identity's canonical string is hashed with BLAKE3 and reduced modulo
//! `10^8`. The seed then initialises a ChaCha8 generator, whose output stream
//! is fixed by the algorithm, so a given identity renders the same path on
//! every platform and build.

use crate::domain::Identity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeds are reduced into `[0, SEED_MODULUS)`.
pub const SEED_MODULUS: u128 = 100_000_000;

/// Derives reproducible seeds and generators from identities.
///
/// Stateless: every generator it hands out is fresh, so concurrent callers
/// never share random state.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentitySeeder;

impl IdentitySeeder {
    /// Stable numeric seed for an identity.
    ///
    /// The first 16 bytes of the BLAKE3 digest are read as a big-endian
    /// integer before the modulus, so all digest bits up to 128 contribute.
    pub fn seed(identity: &Identity) -> u64 {
        let hash = blake3::hash(identity.as_str().as_bytes());
        let mut head = [0u8; 16];
        head.copy_from_slice(&hash.as_bytes()[..16]);
        (u128::from_be_bytes(head) % SEED_MODULUS) as u64
    }

    /// Fresh generator seeded from the identity alone.
    pub fn rng_for(identity: &Identity) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(Self::seed(identity))
    }
}
