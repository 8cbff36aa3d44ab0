// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Streaming server for the reference byte-stream protocol.
//!
//! The accept loop and the per-connection handlers form one supervised
//! group: cancellation stops the accept loop and is observed by every
//! handler at its next command boundary, while the first non-cancellation
//! error from any task cancels the siblings and becomes the run result.

use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use wirebench_core::{RpcError, RpcServer, MAX_HEX_ENCODE_SIZE};

use crate::protocol::{CMD_ADD, CMD_MULT_TREE, CMD_NOP, CMD_TO_HEX, HEX_CHUNK_SIZE};

const CONN_BUFFER_SIZE: usize = 64 * 1024;

/// Byte-stream server bound to an already-bound listener.
pub struct TcpServer {
    listener: TcpListener,
}

impl TcpServer {
    pub fn new(listener: TcpListener) -> Self {
        Self { listener }
    }
}

#[async_trait]
impl RpcServer for TcpServer {
    async fn run(self: Box<Self>, shutdown: CancellationToken) -> Result<(), RpcError> {
        let TcpServer { listener } = *self;
        let conn_token = shutdown.child_token();
        let mut handlers: JoinSet<Result<(), RpcError>> = JoinSet::new();
        let mut result: Result<(), RpcError> = Ok(());

        loop {
            tokio::select! {
                _ = conn_token.cancelled() => break,

                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        tracing::debug!(%peer, "accepted connection");
                        handlers.spawn(handle_conn(stream, conn_token.clone()));
                    }
                    Err(e) => {
                        result = Err(RpcError::connection("accept", e));
                        conn_token.cancel();
                        break;
                    }
                },

                Some(joined) = handlers.join_next(), if !handlers.is_empty() => {
                    if let Err(e) = flatten(joined) {
                        result = Err(e);
                        conn_token.cancel();
                        break;
                    }
                }
            }
        }

        // Stop accepting, then drain the handlers; each observes the
        // cancelled token at its next command boundary.
        drop(listener);
        while let Some(joined) = handlers.join_next().await {
            if let Err(e) = flatten(joined) {
                if result.is_ok() {
                    result = Err(e);
                }
                conn_token.cancel();
            }
        }

        result
    }
}

fn flatten(joined: Result<Result<(), RpcError>, tokio::task::JoinError>) -> Result<(), RpcError> {
    match joined {
        Ok(res) => res,
        Err(e) => Err(RpcError::ServerTerminated {
            reason: format!("connection task failed: {e}"),
        }),
    }
}

/// Serve one connection until EOF, error or cancellation.
async fn handle_conn(stream: TcpStream, shutdown: CancellationToken) -> Result<(), RpcError> {
    stream
        .set_nodelay(true)
        .map_err(|e| RpcError::connection("set_nodelay", e))?;
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::with_capacity(CONN_BUFFER_SIZE, read_half);
    let mut writer = BufWriter::with_capacity(CONN_BUFFER_SIZE, write_half);

    let mut raw = vec![0u8; HEX_CHUNK_SIZE];
    let mut encoded = vec![0u8; HEX_CHUNK_SIZE * 2];

    loop {
        let cmd = tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),

            read = reader.read_u8() => match read {
                Ok(cmd) => cmd,
                // EOF here means the remote or local side is winding down.
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
                Err(e) => return Err(RpcError::io("read command", e)),
            },
        };

        match cmd {
            CMD_NOP => {
                writer
                    .write_u8(CMD_NOP)
                    .await
                    .map_err(|e| RpcError::io("write nop reply", e))?;
            }

            CMD_ADD => {
                let a = reader
                    .read_i64_le()
                    .await
                    .map_err(|e| RpcError::io("read add operands", e))?;
                let b = reader
                    .read_i64_le()
                    .await
                    .map_err(|e| RpcError::io("read add operands", e))?;
                writer
                    .write_i64_le(a.wrapping_add(b))
                    .await
                    .map_err(|e| RpcError::io("write add reply", e))?;
            }

            CMD_MULT_TREE => {
                let mult = reader
                    .read_i64_le()
                    .await
                    .map_err(|e| RpcError::io("read mult", e))?;
                let total = reader
                    .read_i64_le()
                    .await
                    .map_err(|e| RpcError::io("read node count", e))?;
                if total < 1 {
                    return Err(RpcError::protocol(format!("invalid node count {total}")));
                }

                // The tree is never reconstructed here: multiplication is
                // structure-preserving and the client retains the shape it
                // sent, so the values stream through one at a time in the
                // same preorder sequence.
                for _ in 0..total {
                    let v = reader
                        .read_i64_le()
                        .await
                        .map_err(|e| RpcError::io("read tree value", e))?;
                    writer
                        .write_i64_le(v.wrapping_mul(mult))
                        .await
                        .map_err(|e| RpcError::io("write tree value", e))?;
                }
            }

            CMD_TO_HEX => {
                let len = reader
                    .read_i64_le()
                    .await
                    .map_err(|e| RpcError::io("read hex length", e))?;
                if len < 0 || len as usize > MAX_HEX_ENCODE_SIZE {
                    return Err(RpcError::protocol(format!("invalid hex length {len}")));
                }

                let mut remaining = len as usize;
                while remaining > 0 {
                    let want = remaining.min(HEX_CHUNK_SIZE);
                    let n = reader
                        .read(&mut raw[..want])
                        .await
                        .map_err(|e| RpcError::io("read hex payload", e))?;
                    if n == 0 {
                        return Err(RpcError::protocol("hex payload truncated"));
                    }
                    hex::encode_to_slice(&raw[..n], &mut encoded[..n * 2])
                        .map_err(|e| RpcError::protocol(format!("hex encode: {e}")))?;
                    writer
                        .write_all(&encoded[..n * 2])
                        .await
                        .map_err(|e| RpcError::io("write hex reply", e))?;
                    remaining -= n;
                }
            }

            other => {
                return Err(RpcError::protocol(format!("unknown command byte {other}")));
            }
        }

        writer
            .flush()
            .await
            .map_err(|e| RpcError::io("flush reply", e))?;
    }
}
