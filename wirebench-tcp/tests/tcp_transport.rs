// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! End-to-end tests for the reference byte-stream transport.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use wirebench_core::{
    copy_tree, tree_matches_for_mult, RpcClient, RpcError, RpcFactory, TreeNode, TreeValue,
};
use wirebench_core::workload::fill_dense;
use wirebench_tcp::TcpFactory;

struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<Result<(), RpcError>>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = TcpFactory.new_server(listener).unwrap();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(server.run(shutdown.clone()));
        Self {
            addr,
            shutdown,
            task,
        }
    }

    async fn client(&self) -> Box<dyn RpcClient> {
        TcpFactory.new_client(self.addr).await.unwrap()
    }

    async fn stop(self) {
        self.shutdown.cancel();
        let run_result = self.task.await.unwrap();
        assert!(run_result.is_ok(), "server run: {:?}", run_result);
    }
}

#[tokio::test]
async fn test_nop_is_idempotent() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    for _ in 0..10 {
        client.nop().await.unwrap();
    }

    // State observable through other calls is unchanged.
    assert_eq!(client.add(2, 3).await.unwrap(), 5);
    server.stop().await;
}

#[tokio::test]
async fn test_add_exact_and_wrapping() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    assert_eq!(client.add(1, 2).await.unwrap(), 3);
    assert_eq!(client.add(-5, 5).await.unwrap(), 0);
    assert_eq!(client.add(i64::MAX, 1).await.unwrap(), i64::MIN);
    assert_eq!(client.add(i64::MIN, -1).await.unwrap(), i64::MAX);

    server.stop().await;
}

#[tokio::test]
async fn test_mult_tree_singleton() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    let mut src = TreeValue::new();
    src.set_value(7);
    let mut fill = |node: &mut dyn TreeNode| copy_tree(&src, node);

    let reply = client.mult_tree_values(3, &mut fill).await.unwrap();
    assert_eq!(reply.value(), 21);
    assert_eq!(reply.children_count(), 0);

    server.stop().await;
}

#[tokio::test]
async fn test_mult_tree_preserves_shape() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    let mut src = TreeValue::new();
    fill_dense(&mut src, 3, 4);
    let mut next = 1i64;
    assign_sequential(&mut src, &mut next);
    let total = src.total_nodes();

    {
        let mut fill = |node: &mut dyn TreeNode| copy_tree(&src, node);
        let reply = client.mult_tree_values(-2, &mut fill).await.unwrap();
        assert_eq!(reply.total_nodes(), total);
        assert!(tree_matches_for_mult(reply, &src, -2));
    }

    server.stop().await;
}

#[tokio::test]
async fn test_mult_tree_wraps_values() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    let mut src = TreeValue::new();
    src.set_value(i64::MAX);
    src.init_children(1);
    src.child_mut(0).set_value(i64::MIN);

    let mut fill = |node: &mut dyn TreeNode| copy_tree(&src, node);
    let reply = client.mult_tree_values(2, &mut fill).await.unwrap();
    assert_eq!(reply.value(), i64::MAX.wrapping_mul(2));
    assert_eq!(reply.child(0).value(), 0);

    server.stop().await;
}

#[tokio::test]
async fn test_to_hex_known_bytes() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    let input = [0xAB, 0xCD];
    let mut output = [0u8; 4];
    client.to_hex(&input, &mut output).await.unwrap();
    assert_eq!(&output, b"abcd");

    server.stop().await;
}

#[tokio::test]
async fn test_to_hex_empty_input() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    let mut output = [0u8; 0];
    client.to_hex(&[], &mut output).await.unwrap();

    // The connection is still usable afterwards.
    client.nop().await.unwrap();
    server.stop().await;
}

#[tokio::test]
async fn test_to_hex_round_trip_at_capacity() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    // One byte under the maximum message size; crosses many server-side
    // chunks.
    let len = wirebench_core::MAX_HEX_ENCODE_SIZE - 1;
    let input: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    let mut output = vec![0u8; input.len() * 2];
    client.to_hex(&input, &mut output).await.unwrap();

    let decoded = hex::decode(&output).unwrap();
    assert_eq!(decoded, input);

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_clients_do_not_interfere() {
    let server = TestServer::start().await;

    let mut tasks = Vec::new();
    for offset in 0..4i64 {
        let mut client = server.client().await;
        tasks.push(tokio::spawn(async move {
            for i in 0..50 {
                let sum = client.add(offset, i).await.unwrap();
                assert_eq!(sum, offset + i);
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    server.stop().await;
}

#[tokio::test]
async fn test_shutdown_with_idle_connection_is_clean() {
    let server = TestServer::start().await;
    let mut client = server.client().await;
    client.nop().await.unwrap();

    // Idle connection open at shutdown: handler observes the token.
    server.stop().await;
}

fn assign_sequential(node: &mut dyn TreeNode, next: &mut i64) {
    node.set_value(*next);
    *next += 1;
    for i in 0..node.children_count() {
        assign_sequential(node.child_mut(i), next);
    }
}
