//! DEK wrapping under a per-recipient KEM shared secret.
//!
//! The wrap key and the wrap nonce are both derived from the shared
//! secret via HKDF-SHA-256, salted with the 48-byte context
//! `container_id || recipient_key_id`. The same context rides along as
//! AEAD associated data, so a wrapped DEK only opens inside the container
//! and recipient slot it was produced for. The info strings and the
//! concatenation order are part of the wire contract.

use zeroize::Zeroize;

use crate::aead;
use crate::container::ContainerId;
use crate::errors::CaskError;
use crate::fingerprint::Fingerprint;
use crate::kdf::{self, SymmetricKey, KEY_SIZE};

/// HKDF info for the wrap key. Exact ASCII bytes, part of the format.
pub const WRAP_KEY_INFO: &[u8] = b"DEK_WRAP_KEY";

/// HKDF info for the wrap nonce. Exact ASCII bytes, part of the format.
pub const WRAP_NONCE_INFO: &[u8] = b"DEK_WRAP_NONCE";

/// Wrapped DEK size under the registered suite: 32-byte DEK plus tag.
pub const WRAPPED_DEK_SIZE: usize = KEY_SIZE + aead::TAG_SIZE;

const CONTEXT_SIZE: usize = ContainerId::SIZE + Fingerprint::SIZE;

fn wrap_context(container_id: &ContainerId, recipient_key_id: &Fingerprint) -> [u8; CONTEXT_SIZE] {
    let mut context = [0u8; CONTEXT_SIZE];
    context[..ContainerId::SIZE].copy_from_slice(container_id.as_bytes());
    context[ContainerId::SIZE..].copy_from_slice(recipient_key_id.as_bytes());
    context
}

/// Seal `dek` for one recipient.
///
/// Returns ciphertext with the tag appended, exactly
/// [`WRAPPED_DEK_SIZE`] bytes for a 32-byte DEK.
///
/// # Errors
///
/// Propagates KDF and AEAD failures unchanged.
pub fn wrap_dek(
    dek: &SymmetricKey,
    container_id: &ContainerId,
    recipient_key_id: &Fingerprint,
    shared_secret: &[u8],
) -> Result<Vec<u8>, CaskError> {
    let context = wrap_context(container_id, recipient_key_id);
    let wrap_key = kdf::derive(shared_secret, &context, WRAP_KEY_INFO, KEY_SIZE)?;
    let wrap_nonce = kdf::derive_bytes(shared_secret, &context, WRAP_NONCE_INFO, aead::NONCE_SIZE)?;
    let (mut wrapped, tag) = aead::seal(dek.as_bytes(), &wrap_key, &wrap_nonce, &context)?;
    wrapped.extend_from_slice(&tag);
    Ok(wrapped)
}

/// Recover the DEK from `wrapped` for one recipient.
///
/// # Errors
///
/// - [`CaskError::InvalidWrappedDekRepresentation`] if `wrapped` is too
///   short to contain a tag, or if the recovered DEK is not 32 bytes.
/// - [`CaskError::AeadFailed`] if authentication fails for any reason
///   (wrong secret, tampered bytes, foreign container or recipient).
pub fn unwrap_dek(
    wrapped: &[u8],
    container_id: &ContainerId,
    recipient_key_id: &Fingerprint,
    shared_secret: &[u8],
) -> Result<SymmetricKey, CaskError> {
    if wrapped.len() <= aead::TAG_SIZE {
        return Err(CaskError::InvalidWrappedDekRepresentation);
    }
    let (ciphertext, tag) = wrapped.split_at(wrapped.len() - aead::TAG_SIZE);

    let context = wrap_context(container_id, recipient_key_id);
    let wrap_key = kdf::derive(shared_secret, &context, WRAP_KEY_INFO, KEY_SIZE)?;
    let wrap_nonce = kdf::derive_bytes(shared_secret, &context, WRAP_NONCE_INFO, aead::NONCE_SIZE)?;

    let mut dek_bytes = aead::open(ciphertext, tag, &wrap_key, &wrap_nonce, &context)?;
    if dek_bytes.len() != KEY_SIZE {
        dek_bytes.zeroize();
        return Err(CaskError::InvalidWrappedDekRepresentation);
    }
    let dek = SymmetricKey::from_bytes(&dek_bytes);
    dek_bytes.zeroize();
    Ok(dek)
}
