// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Sequential and parallel case drivers with per-call verification.
//!
//! Every call's reply is checked against an expectation the runner
//! computes itself; any mismatch terminates the case. Sequential mode is
//! one task making back-to-back calls on one client. Parallel mode binds
//! each worker permanently to one pre-built client and lets the workers
//! drain a shared iteration budget, so no client is ever shared and the
//! aggregate is the exact sum of per-worker totals.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::{Rng, RngCore};
use tokio::task::JoinSet;

use wirebench_core::tree::render_tree;
use wirebench_core::workload::fill_random_values;
use wirebench_core::{copy_tree, tree_matches_for_mult, ClientCall, TreeNode};

use crate::error::HarnessError;
use crate::harness::{BenchClient, ClientHarness, ServerHarness};
use crate::matrix::BenchCase;
use crate::metrics::CaseReport;

/// Knobs for one case execution.
#[derive(Debug, Clone, Copy)]
pub struct CaseOptions {
    /// Total number of calls to issue (shared across workers in parallel
    /// mode).
    pub iterations: u64,
}

impl Default for CaseOptions {
    fn default() -> Self {
        Self { iterations: 1_000 }
    }
}

/// Run one case to completion and report its throughput.
pub async fn run_case(case: &BenchCase, opts: CaseOptions) -> Result<CaseReport, HarnessError> {
    tracing::info!(case = %case.name(), iterations = opts.iterations, "running case");
    if case.parallel {
        run_parallel(case, opts).await
    } else {
        run_sequential(case, opts).await
    }
}

/// Issue one verified call; returns the payload bytes it moved.
pub async fn make_call(call: ClientCall, bcli: &mut BenchClient) -> Result<u64, HarnessError> {
    let BenchClient { client, workload } = bcli;

    match call {
        ClientCall::Nop => {
            client.nop().await?;
            Ok(0)
        }

        ClientCall::Add => {
            let a: i64 = workload.rng.random();
            let b: i64 = workload.rng.random();
            let sum = client.add(a, b).await?;
            let want = a.wrapping_add(b);
            if sum != want {
                return Err(HarnessError::verification(
                    call,
                    format!("add({a}, {b}) returned {sum}, want {want}"),
                ));
            }
            Ok(0)
        }

        ClientCall::TreeMult => {
            // Pick a corpus tree, re-randomize the target values, then let
            // the fill callback copy it into the transport's own handle.
            let chosen = workload.rng.random_range(0..workload.trees.len());
            let mult: i64 = workload.rng.random();
            fill_random_values(&mut workload.trees[chosen], &mut workload.rng);
            let target = &workload.trees[chosen];

            let mut fill = |node: &mut dyn TreeNode| copy_tree(target, node);
            let reply = client.mult_tree_values(mult, &mut fill).await?;

            if !tree_matches_for_mult(reply, target, mult) {
                return Err(HarnessError::verification(
                    call,
                    format!(
                        "reply tree does not match target × {mult}\nreply:\n{}expected:\n{}",
                        render_tree(reply, 1),
                        render_tree(target, mult),
                    ),
                ));
            }
            Ok(0)
        }

        ClientCall::ToHex => {
            let size = workload.rng.random_range(0..workload.hex_in.len());
            workload.byte_stream.fill_bytes(&mut workload.hex_in[..size]);

            client
                .to_hex(&workload.hex_in[..size], &mut workload.hex_out[..size * 2])
                .await?;

            hex::decode_to_slice(
                &workload.hex_out[..size * 2],
                &mut workload.hex_check[..size],
            )
            .map_err(|e| {
                HarnessError::verification(call, format!("reply is not valid hex: {e}"))
            })?;
            if workload.hex_check[..size] != workload.hex_in[..size] {
                return Err(HarnessError::verification(
                    call,
                    format!("decoded reply differs from {size}-byte input"),
                ));
            }
            Ok((size + size * 2) as u64)
        }
    }
}

async fn run_sequential(case: &BenchCase, opts: CaseOptions) -> Result<CaseReport, HarnessError> {
    let server = ServerHarness::start(case.system.factory.as_ref()).await?;
    let clients = ClientHarness::connect(case.system.factory.as_ref(), server.addr, 1).await;

    let outcome = match clients {
        Ok(mut harness) => drive_sequential(case, opts, &mut harness).await,
        Err(e) => Err(e),
    };
    let shutdown = server.shutdown().await;

    let (calls, bytes, elapsed) = outcome?;
    shutdown?;
    Ok(CaseReport::new(case.name(), calls, bytes, elapsed))
}

async fn drive_sequential(
    case: &BenchCase,
    opts: CaseOptions,
    harness: &mut ClientHarness,
) -> Result<(u64, u64, std::time::Duration), HarnessError> {
    let bcli = &mut harness.clients[0];
    let start = Instant::now();
    let mut total_bytes = 0u64;
    for _ in 0..opts.iterations {
        total_bytes += make_call(case.call, bcli).await?;
    }
    Ok((opts.iterations, total_bytes, start.elapsed()))
}

#[derive(Debug, Default, Clone, Copy)]
struct WorkerTotals {
    calls: u64,
    bytes: u64,
}

async fn run_parallel(case: &BenchCase, opts: CaseOptions) -> Result<CaseReport, HarnessError> {
    let workers = num_cpus::get().max(1);
    let server = ServerHarness::start(case.system.factory.as_ref()).await?;
    let clients =
        ClientHarness::connect(case.system.factory.as_ref(), server.addr, workers).await;

    let outcome = match clients {
        Ok(harness) => drive_parallel(case, opts, harness).await,
        Err(e) => Err(e),
    };
    let shutdown = server.shutdown().await;

    let (calls, bytes, elapsed) = outcome?;
    shutdown?;
    Ok(CaseReport::new(case.name(), calls, bytes, elapsed))
}

async fn drive_parallel(
    case: &BenchCase,
    opts: CaseOptions,
    harness: ClientHarness,
) -> Result<(u64, u64, std::time::Duration), HarnessError> {
    // Workers claim iterations from a shared budget one at a time, so the
    // total issued is exact regardless of how unevenly they progress.
    let budget = Arc::new(AtomicU64::new(opts.iterations));
    let call = case.call;

    let start = Instant::now();
    let mut workers: JoinSet<Result<WorkerTotals, HarnessError>> = JoinSet::new();
    for mut bcli in harness.clients {
        let budget = Arc::clone(&budget);
        workers.spawn(async move {
            let mut totals = WorkerTotals::default();
            while budget
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
                .is_ok()
            {
                match make_call(call, &mut bcli).await {
                    Ok(bytes) => {
                        totals.calls += 1;
                        totals.bytes += bytes;
                    }
                    Err(e) => {
                        // Stop the siblings quickly; first error wins.
                        budget.store(0, Ordering::Release);
                        return Err(e);
                    }
                }
            }
            Ok(totals)
        });
    }

    let mut calls = 0u64;
    let mut bytes = 0u64;
    let mut first_err: Option<HarnessError> = None;
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(Ok(totals)) => {
                calls += totals.calls;
                bytes += totals.bytes;
            }
            Ok(Err(e)) => {
                first_err.get_or_insert(e);
            }
            Err(join_err) => {
                first_err.get_or_insert(HarnessError::WorkerExit(join_err.to_string()));
            }
        }
    }
    let elapsed = start.elapsed();

    match first_err {
        Some(e) => Err(e),
        None => Ok((calls, bytes, elapsed)),
    }
}
