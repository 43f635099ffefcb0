//! Serialization of generated keys.
//!
//! Private keys become a PEM envelope labelled after the algorithm, public keys
//! a single authorized_keys line.

use der::pem::LineEnding;
use zeroize::Zeroizing;

use crate::error::Result;
use crate::keys::GeneratedKey;

pub mod openssh;
pub mod pem;

pub const DSA_LABEL: &str = "DSA PRIVATE KEY";
pub const EC_LABEL: &str = "EC PRIVATE KEY";
pub const RSA_LABEL: &str = "RSA PRIVATE KEY";
pub const OPENSSH_LABEL: &str = "OPENSSH PRIVATE KEY";

pub(crate) const LINE_ENDING: LineEnding = LineEnding::LF;

impl GeneratedKey {
    /// PEM label the private key is wrapped in.
    pub fn pem_label(&self) -> &'static str {
        match self {
            GeneratedKey::Dsa(_) => DSA_LABEL,
            GeneratedKey::Ecdsa(_) => EC_LABEL,
            GeneratedKey::Rsa(_) => RSA_LABEL,
            GeneratedKey::Ed25519(_) => OPENSSH_LABEL,
        }
    }

    /// Private key in its PEM envelope. `comment` only ends up in the
    /// OpenSSH container used for Ed25519.
    pub fn private_key_pem(&self, comment: &str) -> Result<Zeroizing<String>> {
        pem::encode(self, comment)
    }

    pub fn public_key_line(&self, comment: &str) -> Result<String> {
        openssh::authorized_key(self, comment)
    }

    /// `SHA256:<base64>` fingerprint of the public key.
    pub fn fingerprint(&self) -> Result<String> {
        openssh::fingerprint(self)
    }
}

#[cfg(test)]
mod tests {
    use der::Decode;
    use p256::elliptic_curve::sec1::ToEncodedPoint;
    use rsa::pkcs1::DecodeRsaPrivateKey;

    use super::pem::DsaPrivateKeyDer;
    use super::*;
    use crate::crypto::{CostParams, Seeder};
    use crate::keys::{EcdsaKey, KeySpec, generate};

    fn generate_cheap(spec: KeySpec) -> GeneratedKey {
        let mut rng =
            Seeder::from_passphrase(b"keygen", CostParams::new(1, 1, 8, 1).unwrap()).unwrap();
        generate(&spec, &mut rng).unwrap()
    }

    fn assert_envelope(pem: &str, label: &str) {
        assert!(pem.starts_with(&format!("-----BEGIN {label}-----\n")));
        assert!(pem.ends_with(&format!("-----END {label}-----\n")));
    }

    /// Parses the private PEM back with the primitive crate and re-derives the
    /// public line from the parsed key.
    fn reparse(key: &GeneratedKey, pem: &str) -> GeneratedKey {
        match key {
            GeneratedKey::Dsa(_) => {
                let (label, der) = der::pem::decode_vec(pem.as_bytes()).unwrap();
                assert_eq!(label, DSA_LABEL);
                let parsed = DsaPrivateKeyDer::from_der(&der).unwrap();
                assert_eq!(parsed.version, 0);

                let int = |u: der::asn1::UintRef<'_>| dsa::BigUint::from_bytes_be(u.as_bytes());
                let components =
                    dsa::Components::from_components(int(parsed.p), int(parsed.q), int(parsed.g))
                        .unwrap();
                let verifying =
                    dsa::VerifyingKey::from_components(components, int(parsed.y)).unwrap();
                let signing = dsa::SigningKey::from_components(verifying, int(parsed.x)).unwrap();
                GeneratedKey::Dsa(signing)
            }
            GeneratedKey::Ecdsa(ecdsa) => GeneratedKey::Ecdsa(match ecdsa {
                EcdsaKey::NistP256(_) => {
                    EcdsaKey::NistP256(p256::SecretKey::from_sec1_pem(pem).unwrap())
                }
                EcdsaKey::NistP384(_) => {
                    EcdsaKey::NistP384(p384::SecretKey::from_sec1_pem(pem).unwrap())
                }
                EcdsaKey::NistP521(_) => {
                    EcdsaKey::NistP521(p521::SecretKey::from_sec1_pem(pem).unwrap())
                }
            }),
            GeneratedKey::Rsa(_) => {
                GeneratedKey::Rsa(rsa::RsaPrivateKey::from_pkcs1_pem(pem).unwrap())
            }
            GeneratedKey::Ed25519(_) => {
                let private = ssh_key::PrivateKey::from_openssh(pem).unwrap();
                match private.key_data() {
                    ssh_key::private::KeypairData::Ed25519(keypair) => {
                        GeneratedKey::Ed25519(keypair.clone())
                    }
                    _ => panic!("expected ed25519 keypair"),
                }
            }
        }
    }

    fn assert_round_trip(spec: KeySpec, label: &str) {
        let key = generate_cheap(spec);
        let pem = key.private_key_pem("").unwrap();
        assert_envelope(&pem, label);

        let public = key.public_key_line("").unwrap();
        let reparsed = reparse(&key, &pem);
        assert_eq!(reparsed.public_key_line("").unwrap(), public);
        assert_eq!(*reparsed.private_key_pem("").unwrap(), *pem);
    }

    #[test]
    fn ed25519_round_trip() {
        assert_round_trip(KeySpec::ed25519(), OPENSSH_LABEL);
    }

    #[test]
    fn ecdsa_round_trip() {
        assert_round_trip(KeySpec::ecdsa(256), EC_LABEL);
        assert_round_trip(KeySpec::ecdsa(384), EC_LABEL);
        assert_round_trip(KeySpec::ecdsa(521), EC_LABEL);
    }

    #[test]
    fn rsa_1024_round_trip() {
        assert_round_trip(KeySpec::rsa(1024), RSA_LABEL);
    }

    #[test]
    #[ignore = "slow: 2048-bit prime search"]
    fn rsa_2048_round_trip() {
        assert_round_trip(KeySpec::rsa(2048), RSA_LABEL);
    }

    #[test]
    fn dsa_1024_round_trip() {
        assert_round_trip(KeySpec::dsa(1024), DSA_LABEL);
    }

    #[test]
    #[ignore = "slow: dsa parameter search"]
    fn dsa_2048_round_trip() {
        assert_round_trip(KeySpec::dsa(2048), DSA_LABEL);
    }

    #[test]
    #[ignore = "slow: dsa parameter search"]
    fn dsa_3072_round_trip() {
        assert_round_trip(KeySpec::dsa(3072), DSA_LABEL);
    }

    #[test]
    fn public_lines_carry_type_prefix() {
        let cases = [
            (KeySpec::ed25519(), "ssh-ed25519 "),
            (KeySpec::ecdsa(256), "ecdsa-sha2-nistp256 "),
            (KeySpec::ecdsa(384), "ecdsa-sha2-nistp384 "),
            (KeySpec::ecdsa(521), "ecdsa-sha2-nistp521 "),
        ];

        for (spec, prefix) in cases {
            let line = generate_cheap(spec).public_key_line("").unwrap();
            assert!(line.starts_with(prefix), "{line}");
            assert!(line.ends_with('\n'));
            assert_eq!(line.matches(' ').count(), 1);
        }
    }

    #[test]
    fn comment_is_appended_to_public_line() {
        let key = generate_cheap(KeySpec::ed25519());
        let line = key.public_key_line("user@host").unwrap();
        assert!(line.ends_with(" user@host\n"));
    }

    #[test]
    fn ecdsa_public_point_matches_secret() {
        let key = generate_cheap(KeySpec::ecdsa(256));
        let GeneratedKey::Ecdsa(EcdsaKey::NistP256(secret)) = &key else {
            panic!("expected p256 key");
        };

        let expected = secret.public_key().to_encoded_point(false);
        match openssh::key_data(&key).unwrap() {
            ssh_key::public::KeyData::Ecdsa(public) => {
                assert_eq!(public.as_sec1_bytes(), expected.as_bytes())
            }
            other => panic!("expected ecdsa key data, got: {other:?}"),
        }
    }

    #[test]
    fn fingerprint_is_sha256() {
        let key = generate_cheap(KeySpec::ed25519());
        assert!(key.fingerprint().unwrap().starts_with("SHA256:"));
    }
}
