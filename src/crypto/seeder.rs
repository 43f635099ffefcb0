//! Deterministic stand-in for a CSPRNG.
//!
//! Every read advances the seed with PBKDF2-HMAC-SHA512 and the salt with
//! PBKDF2-HMAC-RIPEMD160, then stretches the pair with Argon2id into the
//! requested number of bytes. The chain is sequential: block `n` can only be
//! reproduced by replaying reads `0..n` with the same lengths.
//!
//! Changing any step here changes every key ever derived from a passphrase.

use std::sync::{Mutex, MutexGuard};

use pbkdf2::pbkdf2_hmac;
use rand_core::{CryptoRng, RngCore};
use ripemd::Ripemd160;
use sha2::Sha512;
use tracing::debug;
use zeroize::Zeroizing;

use super::{CostParams, MIN_BLOCK_LEN, SALT_LEN, SEED_LEN};
use crate::error::{KeydgenError, Result};

struct State {
    seed: Zeroizing<Vec<u8>>,
    salt: Zeroizing<Vec<u8>>,
    reads: u64,
}

pub struct Seeder {
    cost: CostParams,
    state: Mutex<State>,
}

impl Seeder {
    pub fn new(seed: &[u8], salt: &[u8], cost: CostParams) -> Result<Self> {
        if seed.is_empty() {
            return Err(KeydgenError::EmptySeed);
        }
        if salt.is_empty() {
            return Err(KeydgenError::EmptySalt);
        }
        cost.validate()?;

        Ok(Self {
            cost,
            state: Mutex::new(State {
                seed: Zeroizing::new(seed.to_vec()),
                salt: Zeroizing::new(salt.to_vec()),
                reads: 0,
            }),
        })
    }

    /// Seeds and salts the chain with the passphrase itself.
    pub fn from_passphrase(passphrase: &[u8], cost: CostParams) -> Result<Self> {
        Self::new(passphrase, passphrase, cost)
    }

    /// Number of blocks emitted so far, also after a panic poisoned the state.
    pub fn reads(&self) -> u64 {
        match self.state.lock() {
            Ok(state) => state.reads,
            Err(poisoned) => poisoned.into_inner().reads,
        }
    }

    /// Fills `buf` entirely with the next block of the chain.
    ///
    /// An empty buffer is a no-op and does not advance the chain. Buffers
    /// shorter than four bytes receive a prefix of a four byte block.
    ///
    /// # Panics
    ///
    /// Panics if the internal state is found invalid.
    pub fn fill(&self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut state = self.lock()?;
        self.verify_state(&state);

        let mut seed = Zeroizing::new(vec![0u8; SEED_LEN]);
        pbkdf2_hmac::<Sha512>(&state.seed, &state.salt, self.cost.rounds(), &mut seed);

        let mut salt = Zeroizing::new(vec![0u8; SALT_LEN]);
        pbkdf2_hmac::<Ripemd160>(&state.salt, &seed, self.cost.rounds(), &mut salt);

        let mut block = Zeroizing::new(vec![0u8; buf.len().max(MIN_BLOCK_LEN)]);
        self.cost
            .argon2()?
            .hash_password_into(&seed, &salt, &mut block)
            .map_err(KeydgenError::Argon2)?;

        state.seed = seed;
        state.salt = salt;
        state.reads += 1;
        debug!(read = state.reads, len = buf.len(), "derived seeder block");

        buf.copy_from_slice(&block[..buf.len()]);
        Ok(buf.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| KeydgenError::Poisoned)
    }

    fn verify_state(&self, state: &State) {
        if state.seed.is_empty() || state.salt.is_empty() {
            panic!("seeder used without a seed and salt");
        }
        if let Err(err) = self.cost.validate() {
            panic!("seeder used with invalid cost parameters: {err}");
        }
    }
}

impl RngCore for Seeder {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(err) = Seeder::fill(self, dest) {
            panic!("deterministic seeder failed: {err}");
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand_core::Error> {
        Seeder::fill(self, dest)
            .map(|_| ())
            .map_err(rand_core::Error::new)
    }
}

impl CryptoRng for Seeder {}

/// Lets several holders of one shared seeder draw from the same chain.
impl RngCore for &Seeder {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(err) = Seeder::fill(self, dest) {
            panic!("deterministic seeder failed: {err}");
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand_core::Error> {
        Seeder::fill(self, dest)
            .map(|_| ())
            .map_err(rand_core::Error::new)
    }
}

impl CryptoRng for &Seeder {}
