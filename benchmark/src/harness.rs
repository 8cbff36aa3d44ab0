// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Server and client harnesses shared by both execution modes.
//!
//! A case binds one server to an OS-assigned loopback port and builds N
//! client harnesses against the resulting address. Teardown cancels the
//! shared token and awaits the server within a bounded timeout; blowing
//! the timeout is a harness failure, not something to ignore.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use wirebench_core::{ClientWorkload, RpcClient, RpcError, RpcFactory};

use crate::error::HarnessError;

/// Upper bound on waiting for the server's `run` to return at teardown.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// A transport server running on an OS-assigned loopback port.
pub struct ServerHarness {
    /// The address clients dial; the sole handshake value.
    pub addr: SocketAddr,
    cancel: CancellationToken,
    task: JoinHandle<Result<(), RpcError>>,
}

impl ServerHarness {
    /// Bind `127.0.0.1:0` and start the factory's server on it.
    pub async fn start(factory: &dyn RpcFactory) -> Result<Self, HarnessError> {
        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .map_err(|e| RpcError::connection("bind", e))?;
        let addr = listener
            .local_addr()
            .map_err(|e| RpcError::connection("local_addr", e))?;

        let server = factory.new_server(listener)?;
        let cancel = CancellationToken::new();
        let task = tokio::spawn(server.run(cancel.clone()));
        tracing::debug!(%addr, "server harness started");

        Ok(Self { addr, cancel, task })
    }

    /// Cancel the server and await its clean exit within
    /// [`SHUTDOWN_TIMEOUT`].
    pub async fn shutdown(mut self) -> Result<(), HarnessError> {
        self.cancel.cancel();
        match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut self.task).await {
            Err(_) => {
                self.task.abort();
                Err(HarnessError::ShutdownTimeout {
                    timeout_ms: SHUTDOWN_TIMEOUT.as_millis() as u64,
                })
            }
            Ok(Err(join_err)) => Err(HarnessError::ServerExit(join_err.to_string())),
            Ok(Ok(Err(run_err))) => Err(HarnessError::ServerExit(run_err.to_string())),
            Ok(Ok(Ok(()))) => Ok(()),
        }
    }
}

/// One transport client paired with its exclusively-owned workload.
pub struct BenchClient {
    pub client: Box<dyn RpcClient>,
    pub workload: ClientWorkload,
}

/// The set of logical clients for one case: one for sequential mode,
/// available-parallelism many for parallel mode.
pub struct ClientHarness {
    pub clients: Vec<BenchClient>,
}

impl ClientHarness {
    /// Connect `count` clients to `addr`, each seeded by its index.
    pub async fn connect(
        factory: &dyn RpcFactory,
        addr: SocketAddr,
        count: usize,
    ) -> Result<Self, HarnessError> {
        let mut clients = Vec::with_capacity(count);
        for index in 0..count {
            let client = factory.new_client(addr).await?;
            clients.push(BenchClient {
                client,
                workload: ClientWorkload::new(index),
            });
        }
        Ok(Self { clients })
    }
}
