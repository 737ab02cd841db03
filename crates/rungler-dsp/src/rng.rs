//! Deterministic RNG using PCG32 with BLAKE3 seed derivation.
//!
//! All randomness in the generator flows through this module. Every
//! [`Rungler`](crate::Rungler) owns its own stream; nothing here is
//! process-wide, so independent instances stay reproducible and tests can
//! pin exact output.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Seed used by a freshly constructed generator until
/// [`Rungler::seed`](crate::Rungler::seed) is called.
pub const DEFAULT_SEED: u32 = 0x72756e67;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Derives a seed for a specific component from the base seed.
///
/// Hashes the base seed concatenated with the component key using BLAKE3
/// and truncates to 32 bits, producing an independent stream per component.
pub fn derive_component_seed(base_seed: u32, key: &str) -> u32 {
    let mut input = Vec::with_capacity(4 + key.len());
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(key.as_bytes());

    let hash = blake3::hash(&input);
    let bytes: [u8; 4] = hash.as_bytes()[0..4].try_into().unwrap();
    u32::from_le_bytes(bytes)
}
