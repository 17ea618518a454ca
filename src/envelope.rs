//! Producing and opening containers.
//!
//! `seal` encrypts a payload once under a fresh data encryption key and
//! wraps that key independently for every recipient. `open` walks the
//! recipient entries looking for the caller's fingerprint and recovers
//! the payload through the first entry that unwraps.
//!
//! Failure reporting is intentionally flat: a container that is simply
//! not addressed to the caller and one whose matching entry fails to
//! authenticate both come back as [`CaskError::AccessDenied`]; a payload
//! that will not authenticate after a successful unwrap is
//! [`CaskError::CannotOpen`]. No further detail is exposed.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::aead;
use crate::container::{AlgorithmId, CipherParts, Container, ContainerHeader, ContainerId, RecipientEntry};
use crate::errors::CaskError;
use crate::fingerprint::Fingerprint;
use crate::format;
use crate::kdf::SymmetricKey;
use crate::kem::{self, KemCiphertext, PrivateKey, PublicKey};
use crate::wrap;

/// Encrypt `plaintext` into a container readable by every `recipient`.
///
/// # Arguments
///
/// * `plaintext` - The payload to protect.
/// * `recipients` - Public keys of everyone who may open the container.
///
/// # Returns
///
/// The serialized v1 container bytes.
///
/// # Errors
///
/// - [`CaskError::LimitsExceeded`] for 0 or more than 100 recipients, or
///   a payload over 512 MiB.
/// - [`CaskError::KeyGenerationFailed`] if the random source fails.
/// - [`CaskError::KemEncapsulationFailed`] if encapsulation to a
///   recipient key fails.
///
/// # Example
///
/// ```rust
/// use pqcask::{generate_key_pair, open, seal};
///
/// # fn main() -> Result<(), pqcask::CaskError> {
/// let (alice_pk, alice_sk) = generate_key_pair()?;
/// let (bob_pk, bob_sk) = generate_key_pair()?;
///
/// let container = seal(b"meet at dawn", &[alice_pk.clone(), bob_pk.clone()])?;
///
/// assert_eq!(open(&container, &alice_pk, &alice_sk)?, b"meet at dawn");
/// assert_eq!(open(&container, &bob_pk, &bob_sk)?, b"meet at dawn");
/// # Ok(())
/// # }
/// ```
pub fn seal(plaintext: &[u8], recipients: &[PublicKey]) -> Result<Vec<u8>, CaskError> {
    if recipients.is_empty() || recipients.len() > format::MAX_RECIPIENTS {
        return Err(CaskError::LimitsExceeded);
    }

    let dek = SymmetricKey::generate()?;
    let container_id = ContainerId::random();

    let mut iv = [0u8; aead::NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut iv)
        .map_err(|_| CaskError::KeyGenerationFailed)?;
    let (ciphertext, tag) = aead::seal(plaintext, &dek, &iv, &[])?;

    let mut entries = Vec::with_capacity(recipients.len());
    for public_key in recipients {
        let key_id = Fingerprint::from_public_key(public_key);
        let (shared_secret, kem_ciphertext) = kem::encapsulate(public_key)?;
        let wrapped_dek = wrap::wrap_dek(&dek, &container_id, &key_id, shared_secret.as_bytes())?;
        entries.push(RecipientEntry::new(
            key_id,
            kem_ciphertext.as_bytes().to_vec(),
            wrapped_dek,
        ));
    }

    let header = ContainerHeader::new(
        AlgorithmId::MLKEM768_HKDF_SHA256_AES256GCM,
        container_id,
        entries.len() as u16,
        0,
        &[0u8; ContainerHeader::RESERVED_SIZE],
    )?;
    let cipher = CipherParts::new(&iv, ciphertext, &tag)?;

    format::encode(&Container {
        header,
        recipients: entries,
        cipher,
    })
}

/// Decrypt a container with the caller's key pair.
///
/// Recipient entries are scanned in wire order; the first entry whose key
/// id matches the fingerprint of `public_key` and whose wrap
/// authenticates under `private_key` yields the DEK. Duplicate entries
/// for the same fingerprint are tolerated.
///
/// # Arguments
///
/// * `bytes` - Serialized v1 container.
/// * `public_key` - The caller's public key (identifies the entry).
/// * `private_key` - The matching decapsulation key.
///
/// # Returns
///
/// The decrypted payload.
///
/// # Errors
///
/// - [`CaskError::InvalidFormat`], [`CaskError::UnsupportedVersion`], or
///   [`CaskError::LimitsExceeded`] if the bytes do not decode.
/// - [`CaskError::UnsupportedVersion`] if the container was produced
///   under an unregistered algorithm suite.
/// - [`CaskError::AccessDenied`] if no recipient entry yields a DEK for
///   this key pair.
/// - [`CaskError::CannotOpen`] if a DEK was recovered but the payload
///   does not authenticate.
pub fn open(
    bytes: &[u8],
    public_key: &PublicKey,
    private_key: &PrivateKey,
) -> Result<Vec<u8>, CaskError> {
    let container = format::decode(bytes)?;
    if !container.header.algorithm_id().is_registered() {
        return Err(CaskError::UnsupportedVersion);
    }

    let key_id = Fingerprint::from_public_key(public_key);
    let container_id = container.header.container_id();

    let mut dek: Option<SymmetricKey> = None;
    for entry in container.recipients.iter().filter(|e| e.key_id == key_id) {
        let Ok(kem_ciphertext) = KemCiphertext::from_bytes(&entry.kem_ciphertext) else {
            continue;
        };
        let Ok(shared_secret) = kem::decapsulate(private_key, &kem_ciphertext) else {
            continue;
        };
        if let Ok(recovered) = wrap::unwrap_dek(
            &entry.wrapped_dek,
            container_id,
            &key_id,
            shared_secret.as_bytes(),
        ) {
            dek = Some(recovered);
            break;
        }
    }
    let Some(dek) = dek else {
        return Err(CaskError::AccessDenied);
    };

    aead::open(
        container.cipher.ciphertext(),
        container.cipher.auth_tag(),
        &dek,
        container.cipher.iv(),
        &[],
    )
    .map_err(|_| CaskError::CannotOpen)
}
