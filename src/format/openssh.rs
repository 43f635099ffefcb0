//! Public keys in the OpenSSH wire format.

use p256::elliptic_curve::sec1::ToEncodedPoint;
use rsa::traits::PublicKeyParts;
use ssh_key::public::{DsaPublicKey, EcdsaPublicKey, KeyData, RsaPublicKey};
use ssh_key::{HashAlg, Mpint, PublicKey};

use crate::error::Result;
use crate::keys::{EcdsaKey, GeneratedKey};

pub fn key_data(key: &GeneratedKey) -> Result<KeyData> {
    let data = match key {
        GeneratedKey::Dsa(key) => {
            let verifying = key.verifying_key();
            let components = verifying.components();
            KeyData::Dsa(DsaPublicKey {
                p: mpint(&components.p().to_bytes_be())?,
                q: mpint(&components.q().to_bytes_be())?,
                g: mpint(&components.g().to_bytes_be())?,
                y: mpint(&verifying.y().to_bytes_be())?,
            })
        }
        GeneratedKey::Ecdsa(key) => KeyData::Ecdsa(ecdsa_public(key)?),
        GeneratedKey::Rsa(key) => KeyData::Rsa(RsaPublicKey {
            e: mpint(&key.e().to_bytes_be())?,
            n: mpint(&key.n().to_bytes_be())?,
        }),
        GeneratedKey::Ed25519(keypair) => KeyData::Ed25519(keypair.public),
    };
    Ok(data)
}

fn ecdsa_public(key: &EcdsaKey) -> Result<EcdsaPublicKey> {
    let point = match key {
        EcdsaKey::NistP256(key) => key.public_key().to_encoded_point(false).as_bytes().to_vec(),
        EcdsaKey::NistP384(key) => key.public_key().to_encoded_point(false).as_bytes().to_vec(),
        EcdsaKey::NistP521(key) => key.public_key().to_encoded_point(false).as_bytes().to_vec(),
    };
    Ok(EcdsaPublicKey::from_sec1_bytes(&point).map_err(ssh_key::Error::from)?)
}

fn mpint(bytes: &[u8]) -> Result<Mpint> {
    Ok(Mpint::from_positive_bytes(bytes).map_err(ssh_key::Error::from)?)
}

pub fn public_key(key: &GeneratedKey, comment: &str) -> Result<PublicKey> {
    Ok(PublicKey::new(key_data(key)?, comment))
}

/// `<type> <base64>[ <comment>]` terminated by a newline.
pub fn authorized_key(key: &GeneratedKey, comment: &str) -> Result<String> {
    let mut line = public_key(key, comment)?.to_openssh()?;
    line.push('\n');
    Ok(line)
}

pub fn fingerprint(key: &GeneratedKey) -> Result<String> {
    Ok(key_data(key)?.fingerprint(HashAlg::Sha256).to_string())
}
