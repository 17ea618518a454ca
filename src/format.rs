//! Container format v1 encoder and decoder.
//!
//! Wire layout, all integers little-endian:
//!
//! ```text
//! magic "PQCK" (4) | version u16 = 1 | headerLength u32 | header bytes
//! per recipient: keyId (32) | kemLen u16 | kemCiphertext | wrappedLen u16 | wrappedDek
//! iv (12) | ciphertextLength u64 | ciphertext | authTag (16)
//! ```
//!
//! The header is length-prefixed so a future v1 producer may append bytes
//! after the fixed 40-byte region; this decoder skips such bytes. A new
//! version number is a breaking change and is rejected.
//!
//! The decoder performs no cryptography: it does not check recipient
//! uniqueness, does not enforce the algorithm id allowlist (the value is
//! preserved for the caller), and validates nothing beyond structure and
//! the declared size limits.

use crate::aead;
use crate::codec::{Reader, Writer};
use crate::container::{
    AlgorithmId, CipherParts, Container, ContainerHeader, ContainerId, RecipientEntry,
};
use crate::errors::CaskError;
use crate::fingerprint::Fingerprint;

/// Magic bytes opening every container.
pub const MAGIC: [u8; 4] = *b"PQCK";

/// Format version this library reads and writes.
pub const VERSION: u16 = 1;

/// Most recipient entries a container may carry.
pub const MAX_RECIPIENTS: usize = 100;

/// Largest accepted KEM ciphertext, per entry.
pub const MAX_KEM_CIPHERTEXT_SIZE: usize = 2048;

/// Largest accepted wrapped DEK, per entry.
pub const MAX_WRAPPED_DEK_SIZE: usize = 128;

/// Largest accepted header block.
pub const MAX_HEADER_SIZE: usize = 4096;

/// Largest accepted payload ciphertext (512 MiB).
pub const MAX_PAYLOAD_SIZE: u64 = 512 * 1024 * 1024;

fn header_bytes(header: &ContainerHeader) -> Vec<u8> {
    let mut w = Writer::with_capacity(ContainerHeader::SIZE);
    w.append_u16_le(header.algorithm_id().value());
    w.append(header.container_id().as_bytes());
    w.append_u16_le(header.recipients_count());
    w.append_u32_le(header.flags());
    w.append(header.reserved());
    w.into_bytes()
}

/// Serialize a container to v1 bytes.
///
/// All validation happens before the first byte is written; the call
/// either returns a complete, valid byte string or an error.
///
/// # Errors
///
/// - [`CaskError::InvalidFormat`] if the header recipient count disagrees
///   with the entry list.
/// - [`CaskError::LimitsExceeded`] if the recipient count, an entry size,
///   or the payload size violates the v1 limits.
pub fn encode(container: &Container) -> Result<Vec<u8>, CaskError> {
    let recipients = &container.recipients;
    if usize::from(container.header.recipients_count()) != recipients.len() {
        return Err(CaskError::InvalidFormat);
    }
    if recipients.is_empty() || recipients.len() > MAX_RECIPIENTS {
        return Err(CaskError::LimitsExceeded);
    }

    let header = header_bytes(&container.header);
    if header.len() != ContainerHeader::SIZE {
        return Err(CaskError::InvalidFormat);
    }
    // Cannot trip for the fixed v1 header; kept for forward safety.
    if header.len() > MAX_HEADER_SIZE {
        return Err(CaskError::LimitsExceeded);
    }

    for entry in recipients {
        let kem_len = entry.kem_ciphertext.len();
        if kem_len == 0 || kem_len > MAX_KEM_CIPHERTEXT_SIZE {
            return Err(CaskError::LimitsExceeded);
        }
        let wrapped_len = entry.wrapped_dek.len();
        if wrapped_len == 0 || wrapped_len > MAX_WRAPPED_DEK_SIZE {
            return Err(CaskError::LimitsExceeded);
        }
    }

    let payload_len = container.cipher.ciphertext().len();
    if payload_len as u64 > MAX_PAYLOAD_SIZE {
        return Err(CaskError::LimitsExceeded);
    }

    let entries_size: usize = recipients
        .iter()
        .map(|e| Fingerprint::SIZE + 2 + e.kem_ciphertext.len() + 2 + e.wrapped_dek.len())
        .sum();
    let capacity = MAGIC.len()
        + 2
        + 4
        + header.len()
        + entries_size
        + aead::NONCE_SIZE
        + 8
        + payload_len
        + aead::TAG_SIZE;

    let mut w = Writer::with_capacity(capacity);
    w.append(&MAGIC);
    w.append_u16_le(VERSION);
    w.append_u32_le(header.len() as u32);
    w.append(&header);
    for entry in recipients {
        w.append(entry.key_id.as_bytes());
        w.append_u16_le(entry.kem_ciphertext.len() as u16);
        w.append(&entry.kem_ciphertext);
        w.append_u16_le(entry.wrapped_dek.len() as u16);
        w.append(&entry.wrapped_dek);
    }
    w.append(container.cipher.iv());
    w.append_u64_le(payload_len as u64);
    w.append(container.cipher.ciphertext());
    w.append(container.cipher.auth_tag());
    Ok(w.into_bytes())
}

/// Parse v1 bytes into a container.
///
/// The buffer must be consumed exactly; trailing bytes are an error.
///
/// # Errors
///
/// - [`CaskError::InvalidFormat`] for bad magic, truncation, zero-length
///   fields, trailing bytes, or any other structural violation.
/// - [`CaskError::UnsupportedVersion`] for a version other than 1 (only
///   after the magic has matched).
/// - [`CaskError::LimitsExceeded`] when a declared size is over the v1
///   limits.
pub fn decode(bytes: &[u8]) -> Result<Container, CaskError> {
    let mut r = Reader::new(bytes, 0)?;

    if r.read_bytes(MAGIC.len())? != MAGIC {
        return Err(CaskError::InvalidFormat);
    }
    if r.read_u16_le()? != VERSION {
        return Err(CaskError::UnsupportedVersion);
    }

    let header_len = r.read_u32_le()? as usize;
    if header_len < ContainerHeader::SIZE {
        return Err(CaskError::InvalidFormat);
    }
    if header_len > MAX_HEADER_SIZE {
        return Err(CaskError::LimitsExceeded);
    }
    let header_block = r.read_bytes(header_len)?;

    let mut hr = Reader::new(header_block, 0)?;
    let algorithm_id = AlgorithmId::new(hr.read_u16_le()?);
    let container_id = ContainerId::from_bytes(hr.read_bytes(ContainerId::SIZE)?)?;
    let recipients_count = hr.read_u16_le()?;
    let flags = hr.read_u32_le()?;
    let reserved = hr.read_bytes(ContainerHeader::RESERVED_SIZE)?;
    // Bytes past the fixed region belong to a future v1 revision; skip them.
    let header = ContainerHeader::new(algorithm_id, container_id, recipients_count, flags, reserved)?;

    let count = usize::from(recipients_count);
    if count == 0 || count > MAX_RECIPIENTS {
        return Err(CaskError::LimitsExceeded);
    }
    let mut recipients = Vec::with_capacity(count);
    for _ in 0..count {
        let key_id = Fingerprint::from_bytes(r.read_bytes(Fingerprint::SIZE)?)?;

        let kem_len = usize::from(r.read_u16_le()?);
        if kem_len == 0 {
            return Err(CaskError::InvalidFormat);
        }
        if kem_len > MAX_KEM_CIPHERTEXT_SIZE {
            return Err(CaskError::LimitsExceeded);
        }
        let kem_ciphertext = r.read_bytes(kem_len)?.to_vec();

        let wrapped_len = usize::from(r.read_u16_le()?);
        if wrapped_len == 0 {
            return Err(CaskError::InvalidFormat);
        }
        if wrapped_len > MAX_WRAPPED_DEK_SIZE {
            return Err(CaskError::LimitsExceeded);
        }
        let wrapped_dek = r.read_bytes(wrapped_len)?.to_vec();

        recipients.push(RecipientEntry::new(key_id, kem_ciphertext, wrapped_dek));
    }

    let iv = r.read_bytes(aead::NONCE_SIZE)?;
    let ciphertext_len = r.read_u64_le()?;
    if ciphertext_len > MAX_PAYLOAD_SIZE || ciphertext_len > isize::MAX as u64 {
        return Err(CaskError::LimitsExceeded);
    }
    let ciphertext = r.read_bytes(ciphertext_len as usize)?.to_vec();
    let auth_tag = r.read_bytes(aead::TAG_SIZE)?;
    let cipher = CipherParts::new(iv, ciphertext, auth_tag)?;

    if !r.is_at_end() {
        return Err(CaskError::InvalidFormat);
    }

    Ok(Container {
        header,
        recipients,
        cipher,
    })
}
