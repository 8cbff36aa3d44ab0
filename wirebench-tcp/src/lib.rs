// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Reference byte-stream transport.
//!
//! The leanest backend wirebench ships: a single-byte command prefix per
//! call, fixed 8-byte little-endian integers, and trees flattened to bare
//! preorder value streams. Its bit layout is the one binding wire format
//! in the workspace; other transports only have to satisfy the call
//! contract.

mod client;
mod protocol;
mod server;

pub use client::TcpClient;
pub use server::TcpServer;

use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::net::TcpListener;

use wirebench_core::{RpcClient, RpcError, RpcFactory, RpcServer};

/// Factory for the reference byte-stream transport.
pub struct TcpFactory;

#[async_trait]
impl RpcFactory for TcpFactory {
    fn new_server(&self, listener: TcpListener) -> Result<Box<dyn RpcServer>, RpcError> {
        Ok(Box::new(TcpServer::new(listener)))
    }

    async fn new_client(&self, addr: SocketAddr) -> Result<Box<dyn RpcClient>, RpcError> {
        Ok(Box::new(TcpClient::connect(addr).await?))
    }
}
