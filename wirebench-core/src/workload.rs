// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Deterministic per-client workload generation.
//!
//! Every logical client owns one seeded pseudo-random sequence derived from
//! a fixed base seed and the client's index, so repeated runs are
//! reproducible and independent across clients. A secondary ChaCha-based
//! byte stream, seeded from a single draw off the primary sequence,
//! supplies the large hex payloads without desynchronizing tree/scalar
//! generation order.

use rand::rngs::{SmallRng, StdRng};
use rand::{Rng, SeedableRng};

use crate::tree::{TreeNode, TreeValue};

/// Maximum size of a `toHex` input. This doubles on the wire, so it also
/// bounds the message size a transport must be able to carry.
pub const MAX_HEX_ENCODE_SIZE: usize = 128 * 1024;

/// Base seed shared by all clients; combined with the client index by
/// [`client_seed`].
pub const BASE_SEED: u64 = 0x0102_0304;

/// Number of reference trees in one client's corpus.
pub const CORPUS_TREES: usize = 6;

/// Derive the primary RNG seed for one logical client.
///
/// SplitMix64 finalizer over `base ^ index`, so neighboring client indices
/// produce unrelated streams.
pub fn client_seed(base: u64, client_index: u64) -> u64 {
    let mut z = base ^ client_index.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Give every node of the subtree a fixed number of children, recursing
/// until `depth` reaches zero.
pub fn fill_dense(node: &mut dyn TreeNode, branch_factor: usize, depth: usize) {
    if depth == 0 {
        return;
    }
    node.init_children(branch_factor);
    for i in 0..branch_factor {
        fill_dense(node.child_mut(i), branch_factor, depth - 1);
    }
}

/// Grow a randomly shaped subtree: a branch count in `[0, max_branch)` at
/// each level, with the branch bound shrinking for children; terminates
/// when depth or the branch bound reaches zero.
pub fn fill_random_tree(
    node: &mut dyn TreeNode,
    rng: &mut impl Rng,
    max_depth: usize,
    max_branch: usize,
) {
    if max_depth == 0 || max_branch == 0 {
        return;
    }
    let n = rng.random_range(0..max_branch);
    node.init_children(n);
    for i in 0..n {
        let shrink = if max_branch >= 2 {
            rng.random_range(0..max_branch / 2)
        } else {
            0
        };
        fill_random_tree(node.child_mut(i), rng, max_depth - 1, max_branch - shrink);
    }
}

/// Assign a random value to every node, preserving shape.
pub fn fill_random_values(node: &mut dyn TreeNode, rng: &mut impl Rng) {
    node.set_value(rng.random());
    for i in 0..node.children_count() {
        fill_random_values(node.child_mut(i), rng);
    }
}

fn fill_chain(node: &mut dyn TreeNode, depth: usize) {
    if depth == 0 {
        return;
    }
    node.init_children(1);
    fill_chain(node.child_mut(0), depth - 1);
}

/// One logical client's exclusively-owned workload state: the reference
/// tree corpus, scratch buffers for the hex call, and both random streams.
///
/// Corpora are shared across the calls made by one client but never across
/// clients, to keep client interference out of the measurements.
pub struct ClientWorkload {
    /// Primary deterministic sequence: operands, tree picks, sizes.
    pub rng: SmallRng,
    /// Secondary high-quality stream for bulk hex payloads.
    pub byte_stream: StdRng,
    /// Six structurally distinct reference trees; shapes are stable for the
    /// client's lifetime, values are overwritten per tree-call.
    pub trees: [TreeValue; CORPUS_TREES],
    /// Raw input scratch for the hex call.
    pub hex_in: Vec<u8>,
    /// Reply scratch, twice the input capacity.
    pub hex_out: Vec<u8>,
    /// Decode scratch used to round-trip-check the reply.
    pub hex_check: Vec<u8>,
}

impl ClientWorkload {
    /// Build the corpus and buffers for client `client_index`.
    pub fn new(client_index: usize) -> Self {
        let mut rng = SmallRng::seed_from_u64(client_seed(BASE_SEED, client_index as u64));
        let byte_stream = StdRng::seed_from_u64(rng.random());

        let mut trees: [TreeValue; CORPUS_TREES] = Default::default();

        // First one is only a single node.

        // Second one is deep and narrow.
        fill_chain(&mut trees[1], 64);

        // Third one is broad, but shallow.
        trees[2].init_children(64);

        // Fourth is dense (deep and broad).
        fill_dense(&mut trees[3], 5, 6);

        // Fifth and sixth are random.
        fill_random_tree(&mut trees[4], &mut rng, 8, 5);
        fill_random_tree(&mut trees[5], &mut rng, 8, 5);

        Self {
            rng,
            byte_stream,
            trees,
            hex_in: vec![0; MAX_HEX_ENCODE_SIZE],
            hex_out: vec![0; MAX_HEX_ENCODE_SIZE * 2],
            hex_check: vec![0; MAX_HEX_ENCODE_SIZE],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn test_client_seed_is_stable() {
        assert_eq!(client_seed(BASE_SEED, 0), client_seed(BASE_SEED, 0));
        assert_ne!(client_seed(BASE_SEED, 0), client_seed(BASE_SEED, 1));
        assert_ne!(client_seed(BASE_SEED, 1), client_seed(BASE_SEED, 2));
    }

    #[test]
    fn test_corpus_shapes() {
        let w = ClientWorkload::new(0);

        // Singleton.
        assert_eq!(w.trees[0].total_nodes(), 1);

        // 64 nested nodes under the root.
        assert_eq!(w.trees[1].total_nodes(), 65);
        let mut depth = 0;
        let mut node: &dyn TreeNode = &w.trees[1];
        while node.children_count() == 1 {
            node = node.child(0);
            depth += 1;
        }
        assert_eq!(depth, 64);

        // 64 leaf children.
        assert_eq!(w.trees[2].children_count(), 64);
        assert_eq!(w.trees[2].total_nodes(), 65);

        // Dense: sum of 5^0 .. 5^6.
        assert_eq!(w.trees[3].total_nodes(), 19_531);
    }

    #[test]
    fn test_random_trees_bounded() {
        for index in 0..4 {
            let w = ClientWorkload::new(index);
            for tree in &w.trees[4..] {
                assert!(tree.children_count() < 5);
                // Root plus at most 8 filled levels.
                assert!(max_depth(tree) <= 9);
            }
        }
    }

    #[test]
    fn test_workload_is_deterministic_per_client() {
        let a = ClientWorkload::new(3);
        let b = ClientWorkload::new(3);
        assert_eq!(a.trees, b.trees);

        let mut rng_a = a.rng;
        let mut rng_b = b.rng;
        for _ in 0..16 {
            assert_eq!(rng_a.random::<i64>(), rng_b.random::<i64>());
        }
    }

    #[test]
    fn test_clients_are_independent() {
        let a = ClientWorkload::new(0);
        let b = ClientWorkload::new(1);
        let mut rng_a = a.rng;
        let mut rng_b = b.rng;
        let draws_a: Vec<i64> = (0..8).map(|_| rng_a.random()).collect();
        let draws_b: Vec<i64> = (0..8).map(|_| rng_b.random()).collect();
        assert_ne!(draws_a, draws_b);
    }

    #[test]
    fn test_byte_stream_does_not_disturb_primary() {
        let mut a = ClientWorkload::new(5);
        let mut b = ClientWorkload::new(5);

        // Consuming the byte stream must not shift the primary sequence.
        let mut buf = [0u8; 1024];
        a.byte_stream.fill_bytes(&mut buf);

        for _ in 0..16 {
            assert_eq!(a.rng.random::<i64>(), b.rng.random::<i64>());
        }
    }

    #[test]
    fn test_fill_random_values_preserves_shape() {
        let mut w = ClientWorkload::new(2);
        let before = w.trees[3].total_nodes();
        fill_random_values(&mut w.trees[3], &mut w.rng);
        assert_eq!(w.trees[3].total_nodes(), before);
    }

    #[test]
    fn test_fill_dense_zero_depth_is_leaf() {
        let mut t = TreeValue::new();
        fill_dense(&mut t, 5, 0);
        assert_eq!(t.total_nodes(), 1);
    }

    fn max_depth(node: &dyn TreeNode) -> usize {
        let mut deepest = 0;
        for i in 0..node.children_count() {
            deepest = deepest.max(max_depth(node.child(i)));
        }
        deepest + 1
    }
}
