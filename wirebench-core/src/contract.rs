// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! The fixed contract every transport backend satisfies.
//!
//! A transport exposes a factory producing one server bound to an
//! already-bound listener and any number of clients sharing the server's
//! address. The four client calls are uniform across every transport; the
//! benchmark runner depends only on this module, never on a transport's
//! concrete representation.

use std::fmt;
use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::error::RpcError;
use crate::tree::TreeNode;

/// The four call kinds exercised by the benchmark matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientCall {
    /// Pure call overhead.
    Nop,
    /// Scalar request/response.
    Add,
    /// Nested-structure transfer with a shape-preserving transform.
    TreeMult,
    /// Arbitrarily large flat payloads.
    ToHex,
}

impl ClientCall {
    /// Every call kind, in matrix order.
    pub fn all() -> [ClientCall; 4] {
        [
            ClientCall::Nop,
            ClientCall::Add,
            ClientCall::TreeMult,
            ClientCall::ToHex,
        ]
    }

    /// Short name used in case identifiers.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientCall::Nop => "nop",
            ClientCall::Add => "add",
            ClientCall::TreeMult => "tree",
            ClientCall::ToHex => "hex",
        }
    }
}

impl fmt::Display for ClientCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Population callback for the two-phase tree call.
///
/// The client hands this callback a fresh tree handle belonging to the
/// outgoing message and invokes it exactly once before dispatching, so
/// every transport has to build (and own) a real message buffer rather
/// than replaying a pre-serialized constant.
pub type TreeFill<'a> = &'a mut (dyn FnMut(&mut dyn TreeNode) + Send);

/// One client of a transport.
///
/// A client is driven by a single task at a time; the harness never
/// multiplexes concurrent calls onto one client.
#[async_trait]
pub trait RpcClient: Send {
    /// No-op round trip. Measures the minimum per-call overhead a
    /// transport imposes.
    async fn nop(&mut self) -> Result<(), RpcError>;

    /// Returns `a + b` computed server-side with two's-complement
    /// wraparound (overflow is not an error).
    async fn add(&mut self, a: i64, b: i64) -> Result<i64, RpcError>;

    /// Two-phase nested-structure call: obtain a fresh outgoing tree
    /// handle, run `fill` against it, dispatch, and return a view of the
    /// reply tree in which the server multiplied every value by `mult`
    /// while preserving shape. The view borrows the client and stays
    /// valid until its next call.
    async fn mult_tree_values(
        &mut self,
        mult: i64,
        fill: TreeFill<'_>,
    ) -> Result<&dyn TreeNode, RpcError>;

    /// Server-side hex-encodes `input`; the reply fills `output`, which
    /// the caller sizes to exactly `2 * input.len()`.
    async fn to_hex(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), RpcError>;
}

/// One server of a transport, bound to a listener by the factory.
#[async_trait]
pub trait RpcServer: Send {
    /// Serve until `shutdown` is cancelled. Returns `Ok(())` for a clean
    /// cancellation-induced shutdown and an error for any other
    /// termination (an accept failure, for instance).
    async fn run(self: Box<Self>, shutdown: CancellationToken) -> Result<(), RpcError>;
}

/// Factory producing the server and clients of one transport.
#[async_trait]
pub trait RpcFactory: Send + Sync {
    /// Bind business logic to an already-bound listener.
    fn new_server(&self, listener: TcpListener) -> Result<Box<dyn RpcServer>, RpcError>;

    /// Establish (or lazily prepare) one client connection to `addr`.
    async fn new_client(&self, addr: SocketAddr) -> Result<Box<dyn RpcClient>, RpcError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_call_names() {
        let names: Vec<&str> = ClientCall::all().iter().map(|c| c.as_str()).collect();
        assert_eq!(names, ["nop", "add", "tree", "hex"]);
    }

    #[test]
    fn test_client_call_display_matches_as_str() {
        for call in ClientCall::all() {
            assert_eq!(call.to_string(), call.as_str());
        }
    }
}
