use num_bigint::BigUint;
use proptest::prelude::*;
use zkid_test_fixtures::{
    ecdsa::SECP256K1_ORDER, hash_message, verify_signature, KeyPair, MessageEncoding,
};

fn secret_key() -> impl Strategy<Value = BigUint> {
    prop::array::uniform32(any::<u8>()).prop_map(|bytes| {
        let n: &BigUint = &SECP256K1_ORDER;
        BigUint::from_bytes_be(&bytes) % (n - 1u32) + 1u32
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn signatures_are_low_s_and_verify(
        secret in secret_key(),
        message in prop::collection::vec(any::<u8>(), 0..96),
    ) {
        let pair = KeyPair::from_secret(&secret).unwrap();
        let digest = hash_message(&message);
        let signature = pair.sign_digest(&digest).unwrap();

        prop_assert!(signature.is_low_s());
        prop_assert!(verify_signature(pair.public(), &digest, &signature).unwrap());
        prop_assert_eq!(pair.sign_digest(&digest).unwrap(), signature);
    }

    #[test]
    fn ethereum_framing_changes_the_digest(message in prop::collection::vec(any::<u8>(), 0..96)) {
        let raw = MessageEncoding::Raw.digest(&message, None).unwrap();
        let framed = MessageEncoding::EthereumSigned.digest(&message, None).unwrap();
        prop_assert_ne!(raw, framed);
        prop_assert_eq!(
            MessageEncoding::EthereumSigned.digest(&message, Some(message.len())).unwrap(),
            framed
        );
    }
}
