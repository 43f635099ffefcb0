//! Key selection and generation.
//!
//! The generator is written against `CryptoRngCore` only; which source backs
//! it is the caller's business. Size and curve checks happen before the
//! source is touched.

use std::fmt;
use std::str::FromStr;

use dsa::{Components, KeySize};
use rand_core::CryptoRngCore;
use rsa::RsaPrivateKey;
use ssh_key::private::Ed25519Keypair;
use tracing::{info, warn};

use crate::error::{KeydgenError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Dsa,
    Ecdsa,
    Rsa,
    Ed25519,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Dsa => "dsa",
            Algorithm::Ecdsa => "ecdsa",
            Algorithm::Rsa => "rsa",
            Algorithm::Ed25519 => "ed25519",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = KeydgenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dsa" => Ok(Algorithm::Dsa),
            "ecdsa" => Ok(Algorithm::Ecdsa),
            "rsa" => Ok(Algorithm::Rsa),
            "ed25519" => Ok(Algorithm::Ed25519),
            _ => Err(KeydgenError::UnsupportedKeyType(s.to_string())),
        }
    }
}

/// Standard DSA (L, N) parameter sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DsaSize {
    L1024N160,
    L2048N256,
    L3072N256,
}

impl DsaSize {
    /// 2048 always maps to the larger N.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            1024 => Ok(DsaSize::L1024N160),
            2048 => Ok(DsaSize::L2048N256),
            3072 => Ok(DsaSize::L3072N256),
            _ => Err(KeydgenError::UnsupportedKeyLength(bits)),
        }
    }

    pub fn bits(&self) -> u32 {
        match self {
            DsaSize::L1024N160 => 1024,
            DsaSize::L2048N256 => 2048,
            DsaSize::L3072N256 => 3072,
        }
    }

    #[allow(deprecated)]
    fn key_size(&self) -> KeySize {
        match self {
            DsaSize::L1024N160 => KeySize::DSA_1024_160,
            DsaSize::L2048N256 => KeySize::DSA_2048_256,
            DsaSize::L3072N256 => KeySize::DSA_3072_256,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcdsaCurve {
    NistP256,
    NistP384,
    NistP521,
}

impl EcdsaCurve {
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            256 => Ok(EcdsaCurve::NistP256),
            384 => Ok(EcdsaCurve::NistP384),
            521 => Ok(EcdsaCurve::NistP521),
            _ => Err(KeydgenError::UnsupportedCurve(bits)),
        }
    }

    pub fn bits(&self) -> u32 {
        match self {
            EcdsaCurve::NistP256 => 256,
            EcdsaCurve::NistP384 => 384,
            EcdsaCurve::NistP521 => 521,
        }
    }
}

/// Algorithm plus the size or curve requested for it.
///
/// The size is kept raw so that an unsupported value is reported by
/// [`generate`] without consuming any randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySpec {
    algorithm: Algorithm,
    size: u32,
}

impl KeySpec {
    pub fn new(algorithm: Algorithm, size: u32) -> Self {
        Self { algorithm, size }
    }

    pub fn dsa(bits: u32) -> Self {
        Self::new(Algorithm::Dsa, bits)
    }

    pub fn ecdsa(curve: u32) -> Self {
        Self::new(Algorithm::Ecdsa, curve)
    }

    pub fn rsa(bits: u32) -> Self {
        Self::new(Algorithm::Rsa, bits)
    }

    pub fn ed25519() -> Self {
        Self::new(Algorithm::Ed25519, 256)
    }

    /// Picks `curve` for ECDSA and `bits` for everything else.
    pub fn from_parts(algorithm: Algorithm, bits: u32, curve: u32) -> Self {
        match algorithm {
            Algorithm::Ecdsa => Self::ecdsa(curve),
            Algorithm::Ed25519 => Self::ed25519(),
            Algorithm::Dsa | Algorithm::Rsa => Self::new(algorithm, bits),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

pub enum EcdsaKey {
    NistP256(p256::SecretKey),
    NistP384(p384::SecretKey),
    NistP521(p521::SecretKey),
}

impl EcdsaKey {
    pub fn curve(&self) -> EcdsaCurve {
        match self {
            EcdsaKey::NistP256(_) => EcdsaCurve::NistP256,
            EcdsaKey::NistP384(_) => EcdsaCurve::NistP384,
            EcdsaKey::NistP521(_) => EcdsaCurve::NistP521,
        }
    }
}

/// Private key as produced by the primitive crate, never mutated afterwards.
pub enum GeneratedKey {
    Dsa(dsa::SigningKey),
    Ecdsa(EcdsaKey),
    Rsa(RsaPrivateKey),
    Ed25519(Ed25519Keypair),
}

impl GeneratedKey {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            GeneratedKey::Dsa(_) => Algorithm::Dsa,
            GeneratedKey::Ecdsa(_) => Algorithm::Ecdsa,
            GeneratedKey::Rsa(_) => Algorithm::Rsa,
            GeneratedKey::Ed25519(_) => Algorithm::Ed25519,
        }
    }
}

impl fmt::Debug for GeneratedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedKey")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

/// Generates the key described by `spec`, drawing all randomness from `rng`.
///
/// Primitive failures are returned as-is and never retried.
pub fn generate<R: CryptoRngCore>(spec: &KeySpec, rng: &mut R) -> Result<GeneratedKey> {
    let key = match spec.algorithm() {
        Algorithm::Dsa => {
            let size = DsaSize::from_bits(spec.size())?;
            info!(bits = size.bits(), "generating dsa key");
            if size == DsaSize::L1024N160 {
                warn!("1024-bit DSA is a legacy key size");
            }
            generate_dsa(size, rng)
        }
        Algorithm::Ecdsa => {
            let curve = EcdsaCurve::from_bits(spec.size())?;
            info!(curve = curve.bits(), "generating ecdsa key");
            generate_ecdsa(curve, rng)
        }
        Algorithm::Rsa => {
            info!(bits = spec.size(), "generating rsa key");
            GeneratedKey::Rsa(RsaPrivateKey::new(rng, spec.size() as usize)?)
        }
        Algorithm::Ed25519 => {
            info!("generating ed25519 key");
            GeneratedKey::Ed25519(Ed25519Keypair::random(rng))
        }
    };

    info!(algorithm = %key.algorithm(), "key generated");
    Ok(key)
}

fn generate_dsa<R: CryptoRngCore>(size: DsaSize, rng: &mut R) -> GeneratedKey {
    let components = Components::generate(rng, size.key_size());
    GeneratedKey::Dsa(dsa::SigningKey::generate(rng, components))
}

fn generate_ecdsa<R: CryptoRngCore>(curve: EcdsaCurve, rng: &mut R) -> GeneratedKey {
    let key = match curve {
        EcdsaCurve::NistP256 => EcdsaKey::NistP256(p256::SecretKey::random(rng)),
        EcdsaCurve::NistP384 => EcdsaKey::NistP384(p384::SecretKey::random(rng)),
        EcdsaCurve::NistP521 => EcdsaKey::NistP521(p521::SecretKey::random(rng)),
    };
    GeneratedKey::Ecdsa(key)
}
