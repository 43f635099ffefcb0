use thiserror::Error;

pub type Result<T> = std::result::Result<T, KeydgenError>;

#[derive(Debug, Error)]
pub enum KeydgenError {
    #[error("seeder seed not set")]
    EmptySeed,

    #[error("seeder salt not set")]
    EmptySalt,

    #[error("seeder requires {0}")]
    InvalidCost(&'static str),

    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    #[error("unsupported key length: {0}")]
    UnsupportedKeyLength(u32),

    #[error("unsupported curve: {0} (only P-256, P-384 and P-521 EC keys are supported)")]
    UnsupportedCurve(u32),

    #[error("argon2 derivation failed: {0}")]
    Argon2(argon2::Error),

    #[error("seeder state poisoned by an earlier panic")]
    Poisoned,

    #[error(transparent)]
    Rsa(#[from] rsa::Error),

    #[error(transparent)]
    Pkcs1(#[from] rsa::pkcs1::Error),

    #[error(transparent)]
    Der(#[from] der::Error),

    #[error(transparent)]
    EllipticCurve(#[from] p256::elliptic_curve::Error),

    #[error(transparent)]
    SshKey(#[from] ssh_key::Error),
}

impl KeydgenError {
    /// Returns `true` for errors caused by bad input rather than a failing primitive.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            KeydgenError::EmptySeed
                | KeydgenError::EmptySalt
                | KeydgenError::InvalidCost(_)
                | KeydgenError::UnsupportedKeyType(_)
                | KeydgenError::UnsupportedKeyLength(_)
                | KeydgenError::UnsupportedCurve(_)
        )
    }
}
