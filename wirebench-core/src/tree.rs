// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! The polymorphic tree capability model.
//!
//! Transports exchange recursively nested trees of signed 64-bit values.
//! Each transport is free to back the [`TreeNode`] capability with its own
//! native (possibly zero-copy) representation; [`TreeValue`] is the generic
//! in-memory implementation used for the workload corpus and as the oracle
//! replies are verified against.

use std::fmt::Write as _;

/// Capability over one node of a nested tree of `i64` values.
///
/// After `init_children(n)`, children are addressable by a contiguous
/// 0-based index; indexing outside `[0, n)` is a programming error and
/// panics like slice indexing. Mutating a node never invalidates sibling
/// indices.
pub trait TreeNode {
    /// Current value of this node.
    fn value(&self) -> i64;

    /// Overwrite the value of this node.
    fn set_value(&mut self, v: i64);

    /// Allocate or reset storage for exactly `n` ordered children,
    /// reusing existing capacity when present.
    fn init_children(&mut self, n: usize);

    /// Number of children initialized on this node.
    fn children_count(&self) -> usize;

    /// Borrow child `i`.
    fn child(&self, i: usize) -> &dyn TreeNode;

    /// Mutably borrow child `i`.
    fn child_mut(&mut self, i: usize) -> &mut dyn TreeNode;

    /// Total node count of the subtree rooted here (1 + children totals).
    fn total_nodes(&self) -> usize {
        let mut total = 1;
        for i in 0..self.children_count() {
            total += self.child(i).total_nodes();
        }
        total
    }
}

/// Generic owned tree, the reference [`TreeNode`] implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeValue {
    value: i64,
    children: Vec<TreeValue>,
}

impl TreeValue {
    /// A fresh single node with value 0 and no children.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all children but keep the allocation for reuse by the next
    /// `init_children` call.
    pub fn reset(&mut self) {
        self.children.clear();
    }
}

impl TreeNode for TreeValue {
    fn value(&self) -> i64 {
        self.value
    }

    fn set_value(&mut self, v: i64) {
        self.value = v;
    }

    fn init_children(&mut self, n: usize) {
        self.children.resize_with(n, TreeValue::default);
    }

    fn children_count(&self) -> usize {
        self.children.len()
    }

    fn child(&self, i: usize) -> &dyn TreeNode {
        &self.children[i]
    }

    fn child_mut(&mut self, i: usize) -> &mut dyn TreeNode {
        &mut self.children[i]
    }
}

/// Copy `src`'s shape and values into `dst`, reinitializing `dst`'s
/// children at every level.
pub fn copy_tree(src: &dyn TreeNode, dst: &mut dyn TreeNode) {
    dst.set_value(src.value());
    dst.init_children(src.children_count());
    for i in 0..src.children_count() {
        copy_tree(src.child(i), dst.child_mut(i));
    }
}

/// Check that `reply` equals `expected` with every value multiplied by
/// `mult` (two's-complement wraparound) and identical children counts at
/// every level.
pub fn tree_matches_for_mult(reply: &dyn TreeNode, expected: &dyn TreeNode, mult: i64) -> bool {
    if reply.value() != expected.value().wrapping_mul(mult) {
        return false;
    }
    if reply.children_count() != expected.children_count() {
        return false;
    }
    for i in 0..reply.children_count() {
        if !tree_matches_for_mult(reply.child(i), expected.child(i), mult) {
            return false;
        }
    }
    true
}

/// Render a tree, one indented line per node, each value multiplied by
/// `mult`. Used to print both sides of a verification mismatch.
pub fn render_tree(node: &dyn TreeNode, mult: i64) -> String {
    let mut out = String::new();
    render_into(node, mult, "", &mut out);
    out
}

fn render_into(node: &dyn TreeNode, mult: i64, prefix: &str, out: &mut String) {
    let _ = writeln!(out, "{}{}", prefix, node.value().wrapping_mul(mult));
    let child_prefix = format!("{}    ", prefix);
    for i in 0..node.children_count() {
        render_into(node.child(i), mult, &child_prefix, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> TreeValue {
        let mut t = TreeValue::new();
        t.set_value(1);
        t.init_children(2);
        t.child_mut(0).set_value(2);
        t.child_mut(1).set_value(3);
        t.child_mut(1).init_children(1);
        t.child_mut(1).child_mut(0).set_value(4);
        t
    }

    fn multiply_all(node: &mut dyn TreeNode, mult: i64) {
        node.set_value(node.value().wrapping_mul(mult));
        for i in 0..node.children_count() {
            multiply_all(node.child_mut(i), mult);
        }
    }

    #[test]
    fn test_total_nodes() {
        let t = sample_tree();
        assert_eq!(t.total_nodes(), 4);
        assert_eq!(TreeValue::new().total_nodes(), 1);
    }

    #[test]
    fn test_init_children_resets_count() {
        let mut t = sample_tree();
        assert_eq!(t.children_count(), 2);
        t.init_children(5);
        assert_eq!(t.children_count(), 5);
        t.init_children(0);
        assert_eq!(t.children_count(), 0);
    }

    #[test]
    fn test_reset_keeps_node_value() {
        let mut t = sample_tree();
        t.reset();
        assert_eq!(t.children_count(), 0);
        assert_eq!(t.value(), 1);
    }

    #[test]
    #[should_panic]
    fn test_child_out_of_range_panics() {
        let t = sample_tree();
        let _ = t.child(2);
    }

    #[test]
    fn test_copy_tree_matches_source() {
        let src = sample_tree();
        let mut dst = TreeValue::new();
        copy_tree(&src, &mut dst);
        assert_eq!(src, dst);
    }

    #[test]
    fn test_copy_tree_overwrites_previous_shape() {
        let src = sample_tree();
        let mut dst = TreeValue::new();
        dst.init_children(7);
        copy_tree(&src, &mut dst);
        assert_eq!(dst.children_count(), 2);
        assert_eq!(dst.total_nodes(), 4);
    }

    #[test]
    fn test_tree_matches_for_mult() {
        let src = sample_tree();
        let mut reply = TreeValue::new();
        copy_tree(&src, &mut reply);
        multiply_all(&mut reply, 3);

        assert!(tree_matches_for_mult(&reply, &src, 3));
        assert!(!tree_matches_for_mult(&reply, &src, 4));

        reply.child_mut(0).set_value(999);
        assert!(!tree_matches_for_mult(&reply, &src, 3));
    }

    #[test]
    fn test_tree_matches_for_mult_wraps() {
        let mut src = TreeValue::new();
        src.set_value(i64::MAX);
        let mut reply = TreeValue::new();
        reply.set_value(i64::MAX.wrapping_mul(2));
        assert!(tree_matches_for_mult(&reply, &src, 2));
    }

    #[test]
    fn test_tree_matches_rejects_shape_difference() {
        let src = sample_tree();
        let mut reply = TreeValue::new();
        copy_tree(&src, &mut reply);
        reply.child_mut(0).init_children(1);
        assert!(!tree_matches_for_mult(&reply, &src, 1));
    }

    #[test]
    fn test_render_tree_indents_children() {
        let t = sample_tree();
        let rendered = render_tree(&t, 2);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "2");
        assert_eq!(lines[1], "    4");
        assert_eq!(lines[3], "        8");
    }
}
