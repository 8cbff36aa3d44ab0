// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! The benchmark case matrix: {transport × call kind × parallel mode}.

use std::fmt;
use std::sync::Arc;

use wirebench_core::{ClientCall, RpcFactory};
use wirebench_http::HttpFactory;
use wirebench_tcp::TcpFactory;

/// One pluggable transport registered with the matrix.
#[derive(Clone)]
pub struct RpcSystem {
    /// Short name used in case identifiers.
    pub name: &'static str,
    /// One-line description for reports.
    pub notes: &'static str,
    /// Factory producing this transport's server and clients.
    pub factory: Arc<dyn RpcFactory>,
}

impl fmt::Debug for RpcSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcSystem")
            .field("name", &self.name)
            .field("notes", &self.notes)
            .finish()
    }
}

/// The transports this workspace ships.
pub fn builtin_systems() -> Vec<RpcSystem> {
    vec![
        RpcSystem {
            name: "tcp",
            notes: "reference byte-stream framing over raw TCP",
            factory: Arc::new(TcpFactory),
        },
        RpcSystem {
            name: "http1",
            notes: "HTTP/1.1 request/response with binary bodies",
            factory: Arc::new(HttpFactory),
        },
    ]
}

/// An immutable (transport, call kind, parallel flag) triple.
#[derive(Debug, Clone)]
pub struct BenchCase {
    pub system: RpcSystem,
    pub call: ClientCall,
    pub parallel: bool,
}

impl BenchCase {
    /// Canonical case name: `"{sequential|parallel}/{call}/{transport}"`.
    pub fn name(&self) -> String {
        let mode = if self.parallel {
            "parallel"
        } else {
            "sequential"
        };
        format!("{}/{}/{}", mode, self.call, self.system.name)
    }
}

/// Enumerate every case for the given transports, sequential cases first.
pub fn full_matrix(systems: &[RpcSystem]) -> Vec<BenchCase> {
    let calls = ClientCall::all();
    let mut matrix = Vec::with_capacity(2 * calls.len() * systems.len());
    for parallel in [false, true] {
        for call in calls {
            for system in systems {
                matrix.push(BenchCase {
                    system: system.clone(),
                    call,
                    parallel,
                });
            }
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_names() {
        let systems = builtin_systems();
        let case = BenchCase {
            system: systems[0].clone(),
            call: ClientCall::TreeMult,
            parallel: false,
        };
        assert_eq!(case.name(), "sequential/tree/tcp");

        let case = BenchCase {
            system: systems[1].clone(),
            call: ClientCall::ToHex,
            parallel: true,
        };
        assert_eq!(case.name(), "parallel/hex/http1");
    }

    #[test]
    fn test_full_matrix_covers_every_combination() {
        let systems = builtin_systems();
        let matrix = full_matrix(&systems);
        assert_eq!(matrix.len(), 2 * 4 * systems.len());

        let names: std::collections::HashSet<String> =
            matrix.iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), matrix.len(), "case names must be unique");
        assert!(names.contains("sequential/nop/tcp"));
        assert!(names.contains("parallel/add/http1"));
    }
}
