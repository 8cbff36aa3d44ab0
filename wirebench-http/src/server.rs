// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Axum-based server for the HTTP/1 transport.

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use wirebench_core::{RpcError, RpcServer, MAX_HEX_ENCODE_SIZE};

/// HTTP server bound to an already-bound listener.
pub struct HttpServer {
    listener: TcpListener,
}

impl HttpServer {
    pub fn new(listener: TcpListener) -> Self {
        Self { listener }
    }
}

#[async_trait]
impl RpcServer for HttpServer {
    async fn run(self: Box<Self>, shutdown: CancellationToken) -> Result<(), RpcError> {
        let app = Router::new()
            .route("/nop", get(handle_nop))
            .route("/add", post(handle_add))
            .route("/multTree", post(handle_mult_tree))
            .route("/toHex", post(handle_to_hex));

        if let Ok(addr) = self.listener.local_addr() {
            tracing::debug!(%addr, "http transport serving");
        }

        axum::serve(self.listener, app)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(|e| RpcError::ServerTerminated {
                reason: e.to_string(),
            })
    }
}

async fn handle_nop() -> StatusCode {
    StatusCode::OK
}

async fn handle_add(body: Bytes) -> Result<Vec<u8>, StatusCode> {
    if body.len() != 16 {
        return Err(StatusCode::BAD_REQUEST);
    }
    let a = i64::from_le_bytes(body[0..8].try_into().unwrap());
    let b = i64::from_le_bytes(body[8..16].try_into().unwrap());
    Ok(a.wrapping_add(b).to_le_bytes().to_vec())
}

async fn handle_mult_tree(body: Bytes) -> Result<Vec<u8>, StatusCode> {
    // mult, node count, then exactly count preorder values.
    if body.len() < 16 {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mult = i64::from_le_bytes(body[0..8].try_into().unwrap());
    let total = i64::from_le_bytes(body[8..16].try_into().unwrap());
    if total < 1 || body.len() != 16 + total as usize * 8 {
        return Err(StatusCode::BAD_REQUEST);
    }

    // Same streaming transform as the reference transport: no tree is
    // reconstructed, the values pass through in preorder.
    let mut reply = Vec::with_capacity(total as usize * 8);
    for chunk in body[16..].chunks_exact(8) {
        let v = i64::from_le_bytes(chunk.try_into().unwrap());
        reply.extend_from_slice(&v.wrapping_mul(mult).to_le_bytes());
    }
    Ok(reply)
}

async fn handle_to_hex(body: Bytes) -> Result<String, StatusCode> {
    if body.len() > MAX_HEX_ENCODE_SIZE {
        return Err(StatusCode::PAYLOAD_TOO_LARGE);
    }
    Ok(hex::encode(&body))
}
