// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! HTTP/1 transport adapter.
//!
//! Maps the four calls onto `GET /nop` and `POST /add`, `/multTree`,
//! `/toHex` with binary request/response bodies, reusing the byte layouts
//! of the reference transport minus the command byte (the path carries the
//! command instead). Exists to measure what a full request/response HTTP
//! stack costs over the raw byte-stream baseline.

mod client;
mod server;

pub use client::HttpClient;
pub use server::HttpServer;

use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::net::TcpListener;

use wirebench_core::{RpcClient, RpcError, RpcFactory, RpcServer};

/// Factory for the HTTP/1 transport.
pub struct HttpFactory;

#[async_trait]
impl RpcFactory for HttpFactory {
    fn new_server(&self, listener: TcpListener) -> Result<Box<dyn RpcServer>, RpcError> {
        Ok(Box::new(HttpServer::new(listener)))
    }

    async fn new_client(&self, addr: SocketAddr) -> Result<Box<dyn RpcClient>, RpcError> {
        Ok(Box::new(HttpClient::new(addr)?))
    }
}
