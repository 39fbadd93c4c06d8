//! Property tests for the codec and Merkle engine.

use num_bigint::BigUint;
use proptest::prelude::*;
use zkid_common::{
    bytes_to_scalar, compose_limbs, decompose_limbs, scalar_to_bytes, FieldHash, LimbLayout,
    MerkleTree, MimcSponge,
};

fn scalar_below(bits: u64) -> impl Strategy<Value = BigUint> {
    let bytes = ((bits + 7) / 8) as usize;
    prop::collection::vec(any::<u8>(), bytes).prop_map(move |raw| {
        let value = BigUint::from_bytes_be(&raw);
        let excess = (bytes as u64 * 8).saturating_sub(bits);
        value >> excess
    })
}

proptest! {
    #[test]
    fn bytes_round_trip(x in scalar_below(256)) {
        let bytes = scalar_to_bytes(&x).unwrap();
        prop_assert_eq!(bytes_to_scalar(&bytes), x);
    }

    #[test]
    fn limbs_round_trip(
        (layout, x) in prop_oneof![
            Just(LimbLayout::K3_86),
            Just(LimbLayout::K4_64),
            (1u32..=96, 1usize..=5).prop_map(|(bits, count)| LimbLayout::new(bits, count)),
        ]
        .prop_flat_map(|layout| (Just(layout), scalar_below(layout.capacity_bits())))
    ) {
        let limbs = decompose_limbs(&x, layout).unwrap();
        prop_assert_eq!(limbs.len(), layout.limb_count);
        prop_assert!(limbs.iter().all(|limb| limb.bits() <= u64::from(layout.bits_per_limb)));
        prop_assert_eq!(compose_limbs(&limbs, layout.bits_per_limb), x);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn merkle_paths_recompute_root(
        depth in 1usize..=5,
        raw_leaves in prop::collection::vec(any::<u64>(), 0..=32),
        index_seed in any::<usize>(),
    ) {
        let hasher = MimcSponge::default();
        let capacity = 1usize << depth;
        let leaves: Vec<BigUint> = raw_leaves.into_iter().take(capacity).map(BigUint::from).collect();
        let tree = MerkleTree::build(depth, leaves.clone(), &hasher).unwrap();
        let index = index_seed % capacity;
        let path = tree.path(index).unwrap();

        let expected_leaf = leaves.get(index).cloned().unwrap_or_default();
        prop_assert_eq!(&path.leaf, &expected_leaf);
        prop_assert_eq!(path.elements.len(), depth);
        prop_assert_eq!(path.compute_root(&expected_leaf, &hasher), tree.root());
        prop_assert_eq!(&path.root, &tree.root());
    }
}

#[test]
fn unsupplied_slots_are_zero() {
    let hasher = MimcSponge::default();
    let leaves = vec![hasher.hash1(&BigUint::from(1u32)), BigUint::from(5u32)];
    let tree = MerkleTree::build(3, leaves, &hasher).unwrap();
    for index in 2..8 {
        assert_eq!(tree.leaf(index).unwrap(), BigUint::default());
    }
}
