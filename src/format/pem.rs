//! Private key envelopes.
//!
//! ```text
//! DSA     DSA PRIVATE KEY      SEQUENCE { version 0, p, q, g, y, x }
//! ECDSA   EC PRIVATE KEY       SEC1 ECPrivateKey
//! RSA     RSA PRIVATE KEY      PKCS#1 RSAPrivateKey
//! ED25519 OPENSSH PRIVATE KEY  openssh-key-v1, unencrypted
//! ```

use der::asn1::UintRef;
use der::{Encode, Sequence};
use rsa::pkcs1::EncodeRsaPrivateKey;
use ssh_key::private::KeypairData;
use zeroize::Zeroizing;

use super::{DSA_LABEL, LINE_ENDING};
use crate::error::Result;
use crate::keys::{EcdsaKey, GeneratedKey};

/// OpenSSL's traditional DSA private key structure.
#[derive(Sequence)]
pub(crate) struct DsaPrivateKeyDer<'a> {
    pub version: u8,
    pub p: UintRef<'a>,
    pub q: UintRef<'a>,
    pub g: UintRef<'a>,
    pub y: UintRef<'a>,
    pub x: UintRef<'a>,
}

pub fn encode(key: &GeneratedKey, comment: &str) -> Result<Zeroizing<String>> {
    match key {
        GeneratedKey::Dsa(key) => encode_dsa(key),
        GeneratedKey::Ecdsa(key) => encode_ecdsa(key),
        GeneratedKey::Rsa(key) => Ok(key.to_pkcs1_pem(LINE_ENDING)?),
        GeneratedKey::Ed25519(keypair) => {
            let private =
                ssh_key::PrivateKey::new(KeypairData::Ed25519(keypair.clone()), comment)?;
            Ok(private.to_openssh(ssh_key::LineEnding::LF)?)
        }
    }
}

fn encode_dsa(key: &dsa::SigningKey) -> Result<Zeroizing<String>> {
    let verifying = key.verifying_key();
    let components = verifying.components();

    let p = components.p().to_bytes_be();
    let q = components.q().to_bytes_be();
    let g = components.g().to_bytes_be();
    let y = verifying.y().to_bytes_be();
    let x = Zeroizing::new(key.x().to_bytes_be());

    let der = Zeroizing::new(
        DsaPrivateKeyDer {
            version: 0,
            p: UintRef::new(&p)?,
            q: UintRef::new(&q)?,
            g: UintRef::new(&g)?,
            y: UintRef::new(&y)?,
            x: UintRef::new(&x)?,
        }
        .to_der()?,
    );

    let pem = der::pem::encode_string(DSA_LABEL, LINE_ENDING, &der).map_err(der::Error::from)?;
    Ok(Zeroizing::new(pem))
}

fn encode_ecdsa(key: &EcdsaKey) -> Result<Zeroizing<String>> {
    let pem = match key {
        EcdsaKey::NistP256(key) => key.to_sec1_pem(LINE_ENDING)?,
        EcdsaKey::NistP384(key) => key.to_sec1_pem(LINE_ENDING)?,
        EcdsaKey::NistP521(key) => key.to_sec1_pem(LINE_ENDING)?,
    };
    Ok(pem)
}
