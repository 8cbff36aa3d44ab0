// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Wirebench Contributors

//! CLI entry point: run the case matrix and write a JSON report.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wirebench_benchmark::{
    builtin_systems, full_matrix, run_case, CaseOptions, JsonReporter, RunReport,
};

#[derive(Parser)]
#[command(name = "run_benchmarks")]
#[command(about = "Run the wirebench transport benchmarks and generate JSON reports")]
struct Args {
    /// Output directory for benchmark data
    #[arg(short, long, default_value = "data")]
    output: PathBuf,

    /// Number of calls per case
    #[arg(short, long, default_value_t = 10_000)]
    iterations: u64,

    /// Only run cases whose name contains this substring
    /// (e.g. "parallel/", "/tree/", "tcp")
    #[arg(short, long)]
    filter: Option<String>,

    /// Run in quick mode (fewer iterations)
    #[arg(long)]
    quick: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let iterations = if args.quick { 500 } else { args.iterations };
    let opts = CaseOptions { iterations };

    println!("Wirebench Transport Benchmarks");
    println!("==============================");
    println!("Output directory: {:?}", args.output);
    println!("Iterations per case: {}", iterations);
    println!();

    let systems = builtin_systems();
    for system in &systems {
        println!("  {}: {}", system.name, system.notes);
    }
    println!();

    let reporter = JsonReporter::new(&args.output)?;
    let mut report = RunReport::new();
    let mut failures = 0usize;

    for case in full_matrix(&systems) {
        let name = case.name();
        if let Some(filter) = &args.filter {
            if !name.contains(filter.as_str()) {
                continue;
            }
        }

        // A failing case reports and halts; sibling cases still run.
        match run_case(&case, opts).await {
            Ok(result) => {
                println!(
                    "  ✓ {name}: {} ({} ns/op, {} B/op)",
                    result.format_rate(),
                    result.ns_per_op(),
                    result.bytes_per_op
                );
                report.add_result(result);
            }
            Err(e) => {
                eprintln!("  ✗ {name}: {e}");
                failures += 1;
            }
        }
    }

    println!();
    let path = reporter.save(&report)?;
    println!("Report saved to: {:?}", path);

    if failures > 0 {
        anyhow::bail!("{failures} case(s) failed");
    }
    Ok(())
}
