// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! Throughput metrics and report types for benchmark results.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sysinfo::System;

/// Aggregate result of one benchmark case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    /// Canonical case name, e.g. `"parallel/tree/tcp"`.
    pub case: String,
    /// Verified calls completed.
    pub calls: u64,
    /// Total payload bytes moved (hex input + output; zero for the other
    /// call kinds).
    pub total_bytes: u64,
    /// Wall-clock duration of the steady-state loop in nanoseconds.
    pub duration_ns: u64,
    /// Calls per second over the steady-state loop.
    pub calls_per_sec: f64,
    /// Payload bytes per call.
    pub bytes_per_op: u64,
}

impl CaseReport {
    /// Compute derived rates from raw counters.
    pub fn new(case: String, calls: u64, total_bytes: u64, elapsed: Duration) -> Self {
        let duration_ns = elapsed.as_nanos() as u64;
        let secs = duration_ns as f64 / 1_000_000_000.0;
        let calls_per_sec = if secs > 0.0 { calls as f64 / secs } else { 0.0 };
        let bytes_per_op = if calls > 0 { total_bytes / calls } else { 0 };
        Self {
            case,
            calls,
            total_bytes,
            duration_ns,
            calls_per_sec,
            bytes_per_op,
        }
    }

    /// Mean nanoseconds per call.
    pub fn ns_per_op(&self) -> u64 {
        if self.calls == 0 {
            0
        } else {
            self.duration_ns / self.calls
        }
    }

    /// Human-readable rate, auto-scaled.
    pub fn format_rate(&self) -> String {
        if self.calls_per_sec >= 1_000_000.0 {
            format!("{:.2}M calls/s", self.calls_per_sec / 1_000_000.0)
        } else if self.calls_per_sec >= 1_000.0 {
            format!("{:.2}k calls/s", self.calls_per_sec / 1_000.0)
        } else {
            format!("{:.2} calls/s", self.calls_per_sec)
        }
    }
}

/// Host details captured alongside the results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub os_version: String,
    pub cpu_model: String,
    pub cpu_cores: usize,
    pub memory_bytes: u64,
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Complete run report: every case result plus run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub benchmark_suite: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub system_info: SystemInfo,
    pub results: Vec<CaseReport>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            benchmark_suite: "wirebench".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            results: Vec::new(),
        }
    }

    pub fn add_result(&mut self, result: CaseReport) {
        self.results.push(result);
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_report_rates() {
        let report = CaseReport::new(
            "sequential/hex/tcp".to_string(),
            1_000,
            3_000_000,
            Duration::from_secs(2),
        );
        assert!((report.calls_per_sec - 500.0).abs() < 0.01);
        assert_eq!(report.bytes_per_op, 3_000);
        assert_eq!(report.ns_per_op(), 2_000_000);
    }

    #[test]
    fn test_case_report_zero_calls() {
        let report = CaseReport::new("sequential/nop/tcp".to_string(), 0, 0, Duration::ZERO);
        assert_eq!(report.bytes_per_op, 0);
        assert_eq!(report.ns_per_op(), 0);
        assert_eq!(report.calls_per_sec, 0.0);
    }

    #[test]
    fn test_format_rate_scales() {
        let fast = CaseReport::new("c".into(), 2_000_000, 0, Duration::from_secs(1));
        assert_eq!(fast.format_rate(), "2.00M calls/s");
        let slow = CaseReport::new("c".into(), 50, 0, Duration::from_secs(1));
        assert_eq!(slow.format_rate(), "50.00 calls/s");
    }

    #[test]
    fn test_system_info_collect() {
        let info = SystemInfo::collect();
        assert!(!info.os.is_empty());
        assert!(info.cpu_cores > 0);
    }

    #[test]
    fn test_run_report_serialization() {
        let mut report = RunReport::new();
        report.add_result(CaseReport::new(
            "sequential/add/tcp".to_string(),
            10,
            0,
            Duration::from_millis(5),
        ));
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("sequential/add/tcp"));
        assert!(json.contains("wirebench"));
    }
}
