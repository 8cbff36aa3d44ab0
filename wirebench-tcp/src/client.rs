// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Buffered client for the reference byte-stream protocol.
//!
//! The client retains one tree and two scratch buffers across calls, so a
//! steady-state call allocates nothing and the measurement stays on the
//! wire, not on harness bookkeeping.

use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use wirebench_core::wire::{decode_tree_values, encode_mult_tree_request};
use wirebench_core::{RpcClient, RpcError, TreeFill, TreeNode, TreeValue, MAX_HEX_ENCODE_SIZE};

use crate::protocol::{CMD_ADD, CMD_MULT_TREE, CMD_NOP, CMD_TO_HEX};

/// Byte-stream client over one TCP connection.
pub struct TcpClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    tree: TreeValue,
    encode_buf: Vec<u8>,
    reply_buf: Vec<u8>,
}

impl TcpClient {
    /// Dial `addr` and wrap the connection in large stream buffers.
    pub async fn connect(addr: SocketAddr) -> Result<Self, RpcError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| RpcError::connection("dial", e))?;
        stream
            .set_nodelay(true)
            .map_err(|e| RpcError::connection("set_nodelay", e))?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::with_capacity(MAX_HEX_ENCODE_SIZE * 2, read_half),
            writer: BufWriter::with_capacity(MAX_HEX_ENCODE_SIZE * 2, write_half),
            tree: TreeValue::new(),
            encode_buf: Vec::new(),
            reply_buf: Vec::new(),
        })
    }
}

#[async_trait]
impl RpcClient for TcpClient {
    async fn nop(&mut self) -> Result<(), RpcError> {
        self.writer
            .write_u8(CMD_NOP)
            .await
            .map_err(|e| RpcError::io("write nop", e))?;
        self.writer
            .flush()
            .await
            .map_err(|e| RpcError::io("flush nop", e))?;

        let echo = self
            .reader
            .read_u8()
            .await
            .map_err(|e| RpcError::io("read nop reply", e))?;
        if echo != CMD_NOP {
            return Err(RpcError::protocol(format!("unexpected nop reply {echo}")));
        }
        Ok(())
    }

    async fn add(&mut self, a: i64, b: i64) -> Result<i64, RpcError> {
        self.writer
            .write_u8(CMD_ADD)
            .await
            .map_err(|e| RpcError::io("write add", e))?;
        self.writer
            .write_i64_le(a)
            .await
            .map_err(|e| RpcError::io("write add", e))?;
        self.writer
            .write_i64_le(b)
            .await
            .map_err(|e| RpcError::io("write add", e))?;
        self.writer
            .flush()
            .await
            .map_err(|e| RpcError::io("flush add", e))?;

        self.reader
            .read_i64_le()
            .await
            .map_err(|e| RpcError::io("read add reply", e))
    }

    async fn mult_tree_values(
        &mut self,
        mult: i64,
        fill: TreeFill<'_>,
    ) -> Result<&dyn TreeNode, RpcError> {
        // Phase one: the outgoing message owns a fresh handle and the
        // caller populates it before anything hits the wire.
        self.tree.reset();
        fill(&mut self.tree);

        self.encode_buf.clear();
        self.encode_buf.push(CMD_MULT_TREE);
        encode_mult_tree_request(&mut self.encode_buf, mult, &self.tree);
        self.writer
            .write_all(&self.encode_buf)
            .await
            .map_err(|e| RpcError::io("write tree request", e))?;
        self.writer
            .flush()
            .await
            .map_err(|e| RpcError::io("flush tree request", e))?;

        // The reply is the same preorder stream; the retained tree
        // supplies the shape, so only values come back.
        let total = self.tree.total_nodes();
        self.reply_buf.resize(total * 8, 0);
        self.reader
            .read_exact(&mut self.reply_buf)
            .await
            .map_err(|e| RpcError::io("read tree reply", e))?;
        decode_tree_values(&mut self.tree, &self.reply_buf)?;

        Ok(&self.tree)
    }

    async fn to_hex(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), RpcError> {
        debug_assert_eq!(output.len(), input.len() * 2);

        self.writer
            .write_u8(CMD_TO_HEX)
            .await
            .map_err(|e| RpcError::io("write hex", e))?;
        self.writer
            .write_i64_le(input.len() as i64)
            .await
            .map_err(|e| RpcError::io("write hex length", e))?;
        self.writer
            .write_all(input)
            .await
            .map_err(|e| RpcError::io("write hex payload", e))?;
        self.writer
            .flush()
            .await
            .map_err(|e| RpcError::io("flush hex", e))?;

        self.reader
            .read_exact(output)
            .await
            .map_err(|e| RpcError::io("read hex reply", e))?;
        Ok(())
    }
}
