// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Criterion benchmarks over the sequential case matrix.
//!
//! Harness setup (server bind, client connect, corpus build) happens
//! outside the timed region; only the steady-state call loop is measured.

use std::time::Instant;

use criterion::{criterion_group, criterion_main, Criterion};

use wirebench_benchmark::runner::make_call;
use wirebench_benchmark::{builtin_systems, ClientHarness, ServerHarness};
use wirebench_core::ClientCall;

fn bench_sequential_calls(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");

    for system in builtin_systems() {
        for call in ClientCall::all() {
            let id = format!("sequential/{}/{}", call, system.name);
            let factory = system.factory.clone();

            c.bench_function(&id, |b| {
                b.to_async(&rt).iter_custom(|iters| {
                    let factory = factory.clone();
                    async move {
                        let server = ServerHarness::start(factory.as_ref())
                            .await
                            .expect("server harness");
                        let mut clients =
                            ClientHarness::connect(factory.as_ref(), server.addr, 1)
                                .await
                                .expect("client harness");
                        let bcli = &mut clients.clients[0];

                        let start = Instant::now();
                        for _ in 0..iters {
                            make_call(call, bcli).await.expect("verified call");
                        }
                        let elapsed = start.elapsed();

                        server.shutdown().await.expect("clean shutdown");
                        elapsed
                    }
                });
            });
        }
    }
}

criterion_group!(benches, bench_sequential_calls);
criterion_main!(benches);
