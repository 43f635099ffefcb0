//! Passphrase-driven randomness.
//!
//! Provides the cost parameters and the deterministic seeder that key
//! generation draws its "entropy" from.

pub mod cost;
pub mod seeder;

pub use cost::CostParams;
pub use seeder::Seeder;

/// Length of the evolving seed (SHA-512 output, 64 bytes).
pub const SEED_LEN: usize = 64;
/// Length of the evolving salt (RIPEMD-160 output, 20 bytes).
pub const SALT_LEN: usize = 20;
/// Smallest block Argon2 will produce (4 bytes).
pub const MIN_BLOCK_LEN: usize = 4;
