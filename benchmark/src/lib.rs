// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Wirebench Benchmark Runner
//!
//! Drives the {transport × call × parallel-mode} case matrix against the
//! transports behind the wirebench contract, verifies every reply against
//! an independently computed expectation, and accounts throughput.
//!
//! # Fairness
//!
//! Workload corpora and scratch buffers are built once per logical client
//! and reused across calls, so steady-state measurements attribute
//! overhead to the transport rather than to the harness's own
//! allocations. Verification failures are hard failures and are never
//! retried: a retry would mask a transport correctness bug.

pub mod error;
pub mod harness;
pub mod matrix;
pub mod metrics;
pub mod reporter;
pub mod runner;

pub use error::HarnessError;
pub use harness::{BenchClient, ClientHarness, ServerHarness};
pub use matrix::{builtin_systems, full_matrix, BenchCase, RpcSystem};
pub use metrics::{CaseReport, RunReport, SystemInfo};
pub use reporter::JsonReporter;
pub use runner::{run_case, CaseOptions};
