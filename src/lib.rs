//! Deterministic SSH key generation.
//!
//! A passphrase seeds a slow, memory-hard byte stream ([`Seeder`]) that is
//! fed to standard key generators in place of the OS random number
//! generator. The same passphrase and [`CostParams`] always give the same key.
//!
//! ```no_run
//! use ssh_keydgen::{CostParams, KeySpec, Keydgen, Seeder};
//!
//! let mut rng = Seeder::from_passphrase(b"correct horse", CostParams::default())?;
//! let mut keydgen = Keydgen::new(KeySpec::ed25519());
//! keydgen.generate(&mut rng)?;
//! print!("{}", keydgen.marshal_public_key()?);
//! # Ok::<(), ssh_keydgen::KeydgenError>(())
//! ```

pub mod crypto;
mod error;
pub mod format;
pub mod keys;
mod storage;

pub use crate::crypto::{CostParams, Seeder};
pub use crate::error::{KeydgenError, Result};
pub use crate::keys::{Algorithm, GeneratedKey, KeySpec};
pub use crate::storage::Storage;
use directories::UserDirs;
use rand_core::CryptoRngCore;
use std::path::PathBuf;
use zeroize::Zeroizing;

pub struct Keydgen {
    spec: KeySpec,
    comment: String,
    key: Option<GeneratedKey>,
}

impl Keydgen {
    pub fn new(spec: KeySpec) -> Self {
        Self {
            spec,
            comment: String::new(),
            key: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Generates the key, or returns the one generated by an earlier call.
    pub fn generate<R: CryptoRngCore>(&mut self, rng: &mut R) -> Result<&GeneratedKey> {
        if self.key.is_none() {
            self.key = Some(keys::generate(&self.spec, rng)?);
        }
        Ok(self.generated())
    }

    /// The generated key, e.g. for handing to an agent.
    pub fn key(&self) -> Option<&GeneratedKey> {
        self.key.as_ref()
    }

    /// # Panics
    ///
    /// Panics if [`Keydgen::generate`] has not succeeded yet.
    pub fn marshal_private_key(&self) -> Result<Zeroizing<String>> {
        self.generated().private_key_pem(&self.comment)
    }

    /// # Panics
    ///
    /// Panics if [`Keydgen::generate`] has not succeeded yet.
    pub fn marshal_public_key(&self) -> Result<String> {
        self.generated().public_key_line(&self.comment)
    }

    fn generated(&self) -> &GeneratedKey {
        match &self.key {
            Some(key) => key,
            None => panic!("private key has not been generated yet"),
        }
    }
}

/// `~/.ssh/id_<algorithm>`, the path ssh-keygen would suggest.
pub fn default_key_path(algorithm: Algorithm) -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    Some(dirs.home_dir().join(".ssh").join(format!("id_{algorithm}")))
}
