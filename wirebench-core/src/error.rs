// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Error types shared by the transport contract and its implementations.
//!
//! All errors are explicit enum variants. Verification and harness-level
//! failures live in the benchmark crate; this module only covers what a
//! transport itself can produce.

use thiserror::Error;

/// Errors produced by transport factories, servers and clients.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Dial, accept or handshake failure. Fatal to harness setup.
    #[error("connection error during {context}: {source}")]
    Connection {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Malformed or unexpected bytes on the wire. Fatal to the current call.
    #[error("protocol error: {reason}")]
    Protocol { reason: String },

    /// Read/write failure on an established connection.
    #[error("I/O error during {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Failure reported by a transport with its own error type (HTTP stacks
    /// and similar); boxed so the contract stays transport-agnostic.
    #[error("transport error during {context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A server terminated for a reason other than cancellation.
    #[error("server terminated: {reason}")]
    ServerTerminated { reason: String },
}

impl RpcError {
    /// Connection-phase error with context.
    pub fn connection(context: &'static str, source: std::io::Error) -> Self {
        Self::Connection { context, source }
    }

    /// Protocol violation with a human-readable reason.
    pub fn protocol(reason: impl Into<String>) -> Self {
        Self::Protocol {
            reason: reason.into(),
        }
    }

    /// Established-connection I/O error with context.
    pub fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    /// Transport-specific error with context.
    pub fn transport(
        context: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            context,
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_context() {
        let err = RpcError::connection(
            "dial",
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        );
        assert!(err.to_string().contains("dial"));

        let err = RpcError::protocol("unknown command byte 9");
        assert!(err.to_string().contains("unknown command byte 9"));
    }

    #[test]
    fn test_io_error_preserves_source() {
        use std::error::Error;

        let err = RpcError::io(
            "read reply",
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof"),
        );
        assert!(err.source().is_some());
    }
}
