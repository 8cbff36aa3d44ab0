// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Wirebench Core Library
//!
//! Shared building blocks for the wirebench transport micro-benchmarks:
//! the polymorphic tree capability model, the deterministic per-client
//! workload generator, the transport contract every backend implements,
//! and the preorder wire helpers used by the byte-oriented transports.

pub mod contract;
pub mod error;
pub mod tree;
pub mod wire;
pub mod workload;

// Re-export commonly used types
pub use contract::{ClientCall, RpcClient, RpcFactory, RpcServer, TreeFill};
pub use error::RpcError;
pub use tree::{copy_tree, tree_matches_for_mult, TreeNode, TreeValue};
pub use workload::{client_seed, ClientWorkload, BASE_SEED, MAX_HEX_ENCODE_SIZE};
