#![allow(clippy::unwrap_used)] // unwrap() is idiomatic in property tests

use proptest::prelude::*;

use pqcask::format::{decode, encode};
use pqcask::wrap::{unwrap_dek, wrap_dek, WRAPPED_DEK_SIZE};
use pqcask::*;

// ============================================================================
// Strategies: arbitrary structurally valid containers
// ============================================================================

prop_compose! {
    fn arb_entry()(
        key_id in proptest::array::uniform32(any::<u8>()),
        kem_ciphertext in prop::collection::vec(any::<u8>(), 1..=300),
        wrapped_dek in prop::collection::vec(any::<u8>(), 1..=128),
    ) -> RecipientEntry {
        RecipientEntry::new(
            Fingerprint::from_bytes(&key_id).unwrap(),
            kem_ciphertext,
            wrapped_dek,
        )
    }
}

prop_compose! {
    fn arb_container()(
        algorithm in any::<u16>(),
        container_id in proptest::array::uniform16(any::<u8>()),
        flags in any::<u32>(),
        reserved in proptest::array::uniform16(any::<u8>()),
        recipients in prop::collection::vec(arb_entry(), 1..=5),
        iv in proptest::array::uniform12(any::<u8>()),
        payload in prop::collection::vec(any::<u8>(), 0..512),
        tag in proptest::array::uniform16(any::<u8>()),
    ) -> Container {
        let header = ContainerHeader::new(
            AlgorithmId::new(algorithm),
            ContainerId::from_bytes(&container_id).unwrap(),
            recipients.len() as u16,
            flags,
            &reserved,
        )
        .unwrap();
        let cipher = CipherParts::new(&iv, payload, &tag).unwrap();
        Container { header, recipients, cipher }
    }
}

// ============================================================================
// Property: codec round-trip and strictness
// ============================================================================

proptest! {
    #[test]
    fn prop_codec_roundtrip(container in arb_container()) {
        let bytes = encode(&container)?;
        let decoded = decode(&bytes)?;
        prop_assert_eq!(decoded, container);
    }
}

proptest! {
    #[test]
    fn prop_trailing_byte_rejected(container in arb_container(), extra in any::<u8>()) {
        let mut bytes = encode(&container)?;
        bytes.push(extra);
        prop_assert_eq!(decode(&bytes).unwrap_err(), CaskError::InvalidFormat);
    }
}

proptest! {
    #[test]
    fn prop_truncation_rejected(container in arb_container(), cut in any::<prop::sample::Index>()) {
        let bytes = encode(&container)?;
        let keep = cut.index(bytes.len()); // strictly shorter than bytes.len()
        prop_assert_eq!(decode(&bytes[..keep]).unwrap_err(), CaskError::InvalidFormat);
    }
}

// ============================================================================
// Property: DEK wrap round-trip and binding
// ============================================================================

proptest! {
    #[test]
    fn prop_wrap_roundtrip(
        dek_bytes in proptest::array::uniform32(any::<u8>()),
        shared_secret in proptest::array::uniform32(any::<u8>()),
        cid in proptest::array::uniform16(any::<u8>()),
        rid in proptest::array::uniform32(any::<u8>()),
    ) {
        let dek = SymmetricKey::from_bytes(&dek_bytes);
        let container_id = ContainerId::from_bytes(&cid).unwrap();
        let key_id = Fingerprint::from_bytes(&rid).unwrap();

        let wrapped = wrap_dek(&dek, &container_id, &key_id, &shared_secret)?;
        prop_assert_eq!(wrapped.len(), WRAPPED_DEK_SIZE);

        let recovered = unwrap_dek(&wrapped, &container_id, &key_id, &shared_secret)?;
        prop_assert_eq!(recovered.as_bytes(), dek.as_bytes());
    }
}

proptest! {
    #[test]
    fn prop_wrap_bit_flip_fails(
        dek_bytes in proptest::array::uniform32(any::<u8>()),
        shared_secret in proptest::array::uniform32(any::<u8>()),
        cid in proptest::array::uniform16(any::<u8>()),
        rid in proptest::array::uniform32(any::<u8>()),
        bit in 0usize..(WRAPPED_DEK_SIZE * 8),
    ) {
        let dek = SymmetricKey::from_bytes(&dek_bytes);
        let container_id = ContainerId::from_bytes(&cid).unwrap();
        let key_id = Fingerprint::from_bytes(&rid).unwrap();

        let mut wrapped = wrap_dek(&dek, &container_id, &key_id, &shared_secret)?;
        wrapped[bit / 8] ^= 1 << (bit % 8);

        prop_assert_eq!(
            unwrap_dek(&wrapped, &container_id, &key_id, &shared_secret).unwrap_err(),
            CaskError::AeadFailed
        );
    }
}

// ============================================================================
// Property: seal/open end to end
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]
    #[test]
    fn prop_seal_open_roundtrip(
        payload in prop::collection::vec(any::<u8>(), 0..2000),
        num_recipients in 1usize..3,
    ) {
        let pairs: Vec<_> = (0..num_recipients)
            .map(|_| generate_key_pair().unwrap())
            .collect();
        let pub_keys: Vec<_> = pairs.iter().map(|(pk, _)| pk.clone()).collect();

        let container = seal(&payload, &pub_keys)?;

        for (pk, sk) in &pairs {
            let opened = open(&container, pk, sk)?;
            prop_assert_eq!(&opened, &payload);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]
    #[test]
    fn prop_corruption_fails_closed(
        payload in prop::collection::vec(any::<u8>(), 1..500),
        position in 0usize..4000,
    ) {
        let (pk, sk) = generate_key_pair().unwrap();
        let bytes = seal(&payload, std::slice::from_ref(&pk)).unwrap();

        // The flags and reserved header fields (absolute offsets 30..50)
        // are carried verbatim and not bound to the payload, so they are
        // the only bytes a flip does not have to break.
        if position < bytes.len() && !(30..50).contains(&position) {
            let mut corrupted = bytes.clone();
            corrupted[position] ^= 0xFF;
            prop_assert!(open(&corrupted, &pk, &sk).is_err());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]
    #[test]
    fn prop_unbound_header_fields_do_not_gate_opening(
        payload in prop::collection::vec(any::<u8>(), 1..200),
        position in 30usize..50,
        flip in 1u8..=255,
    ) {
        let (pk, sk) = generate_key_pair().unwrap();
        let mut bytes = seal(&payload, std::slice::from_ref(&pk)).unwrap();

        // Flags and reserved are preserved verbatim and excluded from the
        // wrap context, so altering them must not affect opening.
        bytes[position] ^= flip;
        prop_assert_eq!(open(&bytes, &pk, &sk).unwrap(), payload);
    }
}
