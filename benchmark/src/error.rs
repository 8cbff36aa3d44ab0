// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Harness-level error types.
//!
//! Transport errors bubble up wrapped; verification and shutdown failures
//! are distinct harness outcomes, not transport errors.

use thiserror::Error;

use wirebench_core::{ClientCall, RpcError};

/// Errors terminating one benchmark case.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A transport-level failure (connection, protocol, I/O).
    #[error("transport failure: {0}")]
    Rpc(#[from] RpcError),

    /// A reply did not match the independently computed expectation.
    /// Always fatal to the case, never retried.
    #[error("verification failed for {call} call: {detail}")]
    Verification { call: ClientCall, detail: String },

    /// The server did not finish `run` within the teardown bound.
    #[error("server did not shut down within {timeout_ms}ms")]
    ShutdownTimeout { timeout_ms: u64 },

    /// The server task ended abnormally (panic or abort).
    #[error("server task ended abnormally: {0}")]
    ServerExit(String),

    /// A parallel worker task panicked or was aborted.
    #[error("worker task ended abnormally: {0}")]
    WorkerExit(String),
}

impl HarnessError {
    /// Verification failure with call context.
    pub fn verification(call: ClientCall, detail: impl Into<String>) -> Self {
        Self::Verification {
            call,
            detail: detail.into(),
        }
    }
}
