// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Reqwest-based client for the HTTP/1 transport.

use std::net::SocketAddr;

use async_trait::async_trait;
use bytes::Bytes;

use wirebench_core::wire::{decode_tree_values, encode_mult_tree_request};
use wirebench_core::{RpcClient, RpcError, TreeFill, TreeNode, TreeValue};

/// HTTP client for one logical benchmark client.
///
/// Each instance owns its own connection pool: HTTP/1 does not multiplex
/// concurrent requests, so sharing a pool across logical clients would
/// serialize the parallel benchmark mode.
pub struct HttpClient {
    http: reqwest::Client,
    tree: TreeValue,
    encode_buf: Vec<u8>,
    nop_url: String,
    add_url: String,
    tree_url: String,
    hex_url: String,
}

impl HttpClient {
    pub fn new(addr: SocketAddr) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RpcError::transport("client setup", e))?;

        Ok(Self {
            http,
            tree: TreeValue::new(),
            encode_buf: Vec::new(),
            nop_url: format!("http://{addr}/nop"),
            add_url: format!("http://{addr}/add"),
            tree_url: format!("http://{addr}/multTree"),
            hex_url: format!("http://{addr}/toHex"),
        })
    }

    async fn post_bytes(&self, url: &str, body: Vec<u8>) -> Result<Bytes, RpcError> {
        let response = self
            .http
            .post(url)
            .body(body)
            .send()
            .await
            .map_err(|e| RpcError::transport("send request", e))?
            .error_for_status()
            .map_err(|e| RpcError::transport("response status", e))?;
        response
            .bytes()
            .await
            .map_err(|e| RpcError::transport("read response body", e))
    }
}

#[async_trait]
impl RpcClient for HttpClient {
    async fn nop(&mut self) -> Result<(), RpcError> {
        self.http
            .get(&self.nop_url)
            .send()
            .await
            .map_err(|e| RpcError::transport("send request", e))?
            .error_for_status()
            .map_err(|e| RpcError::transport("response status", e))?;
        Ok(())
    }

    async fn add(&mut self, a: i64, b: i64) -> Result<i64, RpcError> {
        let mut body = Vec::with_capacity(16);
        body.extend_from_slice(&a.to_le_bytes());
        body.extend_from_slice(&b.to_le_bytes());

        let reply = self.post_bytes(&self.add_url, body).await?;
        let bytes: [u8; 8] = reply
            .as_ref()
            .try_into()
            .map_err(|_| RpcError::protocol(format!("add reply of {} bytes", reply.len())))?;
        Ok(i64::from_le_bytes(bytes))
    }

    async fn mult_tree_values(
        &mut self,
        mult: i64,
        fill: TreeFill<'_>,
    ) -> Result<&dyn TreeNode, RpcError> {
        self.tree.reset();
        fill(&mut self.tree);

        self.encode_buf.clear();
        encode_mult_tree_request(&mut self.encode_buf, mult, &self.tree);
        let body = self.encode_buf.clone();

        let reply = self.post_bytes(&self.tree_url, body).await?;
        let expected_len = self.tree.total_nodes() * 8;
        if reply.len() != expected_len {
            return Err(RpcError::protocol(format!(
                "tree reply of {} bytes, expected {expected_len}",
                reply.len()
            )));
        }
        decode_tree_values(&mut self.tree, &reply)?;

        Ok(&self.tree)
    }

    async fn to_hex(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), RpcError> {
        debug_assert_eq!(output.len(), input.len() * 2);

        let reply = self.post_bytes(&self.hex_url, input.to_vec()).await?;
        if reply.len() != output.len() {
            return Err(RpcError::protocol(format!(
                "hex reply of {} bytes, expected {}",
                reply.len(),
                output.len()
            )));
        }
        output.copy_from_slice(&reply);
        Ok(())
    }
}
