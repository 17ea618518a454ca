//! ML-KEM-768 facade: key generation, encapsulation, decapsulation.
//!
//! A thin, error-mapped layer over the pure Rust `ml-kem` crate. Every
//! provider failure is collapsed into one of three coarse errors so
//! nothing about the underlying cause leaks to callers.
//!
//! ML-KEM decapsulation never rejects: feeding it a foreign ciphertext
//! deterministically yields some shared secret rather than an error
//! (implicit rejection, FIPS 203). Integrity is established afterwards by
//! the DEK-wrap AEAD check, which fails to authenticate under a
//! non-matching secret. That division of labor is essential to the
//! protocol and must not be "fixed".

use base64ct::{Base64, Encoding};
use ml_kem::kem::{Decapsulate, Encapsulate};
use ml_kem::{Ciphertext, EncodedSizeUser, KemCore, MlKem768};
use rand::rngs::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::CaskError;

/// ML-KEM-768 encapsulation key size in bytes.
pub const PUBLIC_KEY_SIZE: usize = 1184;

/// ML-KEM-768 ciphertext size in bytes.
pub const CIPHERTEXT_SIZE: usize = 1088;

/// ML-KEM shared secret size in bytes.
pub const SHARED_SECRET_SIZE: usize = 32;

/// An ML-KEM-768 encapsulation (public) key.
///
/// Carries the raw 1184-byte encoding; construction from bytes validates
/// through the primitive.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    raw: Vec<u8>,
}

impl PublicKey {
    /// Build a public key from its raw byte encoding.
    ///
    /// # Errors
    ///
    /// Returns [`CaskError::InvalidKeyRepresentation`] if the bytes do not
    /// form a valid ML-KEM-768 encapsulation key.
    pub fn from_raw(bytes: &[u8]) -> Result<Self, CaskError> {
        let encoded = bytes
            .try_into()
            .map_err(|_| CaskError::InvalidKeyRepresentation)?;
        let _ = <MlKem768 as KemCore>::EncapsulationKey::from_bytes(&encoded);
        Ok(Self {
            raw: bytes.to_vec(),
        })
    }

    /// Build a public key from standard base64 of its raw encoding.
    ///
    /// # Errors
    ///
    /// Returns [`CaskError::InvalidBase64`] if the string does not decode,
    /// or [`CaskError::InvalidKeyRepresentation`] if the decoded bytes are
    /// not a valid key.
    pub fn from_base64(encoded: &str) -> Result<Self, CaskError> {
        let bytes = Base64::decode_vec(encoded).map_err(|_| CaskError::InvalidBase64)?;
        Self::from_raw(&bytes)
    }

    /// Standard base64 of the raw encoding.
    pub fn to_base64(&self) -> String {
        Base64::encode_string(&self.raw)
    }

    /// Raw byte encoding of the key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({} bytes)", self.raw.len())
    }
}

/// An ML-KEM-768 decapsulation (private) key.
///
/// Lives only as long as the caller retains it; this library never
/// serializes or persists it.
pub struct PrivateKey {
    key: <MlKem768 as KemCore>::DecapsulationKey,
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

/// A validated ML-KEM-768 ciphertext (exactly 1088 bytes).
#[derive(Clone, PartialEq, Eq)]
pub struct KemCiphertext {
    bytes: [u8; CIPHERTEXT_SIZE],
}

impl KemCiphertext {
    /// Build a ciphertext from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CaskError::InvalidCiphertextRepresentation`] for any
    /// length other than 1088.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CaskError> {
        if bytes.len() != CIPHERTEXT_SIZE {
            return Err(CaskError::InvalidCiphertextRepresentation);
        }
        let mut ct = [0u8; CIPHERTEXT_SIZE];
        ct.copy_from_slice(bytes);
        Ok(Self { bytes: ct })
    }

    /// Ciphertext bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for KemCiphertext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KemCiphertext({} bytes)", CIPHERTEXT_SIZE)
    }
}

/// A 32-byte KEM shared secret. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    bytes: [u8; SHARED_SECRET_SIZE],
}

impl SharedSecret {
    /// Secret bytes, for feeding the KDF.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedSecret([REDACTED])")
    }
}

/// Generate a fresh ML-KEM-768 key pair.
///
/// # Errors
///
/// Returns [`CaskError::KeyGenerationFailed`] if the provider cannot
/// produce a key pair.
pub fn generate_key_pair() -> Result<(PublicKey, PrivateKey), CaskError> {
    let mut rng = OsRng;
    let (dk, ek) = MlKem768::generate(&mut rng);
    let raw = ek.as_bytes().to_vec();
    Ok((PublicKey { raw }, PrivateKey { key: dk }))
}

/// Encapsulate a fresh shared secret to `public_key`.
///
/// Returns the shared secret and the 1088-byte ciphertext to transport.
///
/// # Errors
///
/// Returns [`CaskError::KemEncapsulationFailed`] on any provider failure.
pub fn encapsulate(public_key: &PublicKey) -> Result<(SharedSecret, KemCiphertext), CaskError> {
    let mut rng = OsRng;
    let encoded = public_key
        .raw
        .as_slice()
        .try_into()
        .map_err(|_| CaskError::KemEncapsulationFailed)?;
    let ek = <MlKem768 as KemCore>::EncapsulationKey::from_bytes(&encoded);
    let (ct, shared) = ek
        .encapsulate(&mut rng)
        .map_err(|_| CaskError::KemEncapsulationFailed)?;

    let mut secret = [0u8; SHARED_SECRET_SIZE];
    secret.copy_from_slice(shared.as_slice());
    let ciphertext = KemCiphertext::from_bytes(ct.as_slice())?;
    Ok((SharedSecret { bytes: secret }, ciphertext))
}

/// Recover the shared secret from `ciphertext` with `private_key`.
///
/// # Errors
///
/// Returns [`CaskError::KemDecapsulationFailed`] on any provider failure.
/// Note that a structurally valid but foreign ciphertext does not fail
/// here; it yields a non-matching secret (see the module docs).
pub fn decapsulate(
    private_key: &PrivateKey,
    ciphertext: &KemCiphertext,
) -> Result<SharedSecret, CaskError> {
    let ct: Ciphertext<MlKem768> = ciphertext
        .as_bytes()
        .try_into()
        .map_err(|_| CaskError::KemDecapsulationFailed)?;
    let shared = private_key
        .key
        .decapsulate(&ct)
        .map_err(|_| CaskError::KemDecapsulationFailed)?;

    let mut secret = [0u8; SHARED_SECRET_SIZE];
    secret.copy_from_slice(shared.as_slice());
    Ok(SharedSecret { bytes: secret })
}
