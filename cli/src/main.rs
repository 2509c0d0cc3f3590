use std::sync::Once;

use anyhow::Context;
use clap::Parser;
use nbench_core::harness::{Suite, slowest};

#[cfg(test)]
mod main_test;

static PERF_TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "nbench::harness=debug,nbench::workload=info,nbench_core=info,nbench_cli=info";
const TRACE_ENV: &str = "NBENCH_TRACE";

/// Runs Fibonacci(42), Prime Sieve (10M), Mandelbrot (2000x2000),
/// Matrix Multiply (500x500) and Binary Trees (depth 18) in that order.
#[derive(Debug, Parser)]
#[command(name = "nbench", author, version, about = "Time five fixed CPU workloads", long_about = None)]
struct CliArgs {}

fn env_toggle_enabled(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    !(trimmed.eq_ignore_ascii_case("0") || trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("off"))
}

fn filter_expr_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("1")
        || trimmed.eq_ignore_ascii_case("true")
        || trimmed.eq_ignore_ascii_case("on")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Logs go to stderr only; stdout carries nothing but the result lines.
fn maybe_init_perf_tracing() {
    let raw = match std::env::var(TRACE_ENV) {
        Ok(value) => value,
        Err(_) => return,
    };

    if !env_toggle_enabled(&raw) {
        return;
    }

    PERF_TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let filter_expr = filter_expr_from(&raw).or_else(|| std::env::var("RUST_LOG").ok());

        let builder = fmt().with_writer(std::io::stderr);

        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

fn main() -> anyhow::Result<()> {
    maybe_init_perf_tracing();

    let CliArgs {} = CliArgs::parse();

    let suite = Suite::default();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let reports = suite.run(&mut out).context("benchmark run failed")?;

    let (slowest_key, slowest_title) = slowest(&reports).map_or(("none", "none"), |r| (r.key, r.title));
    tracing::info!(
        target: "nbench_cli",
        benchmarks = reports.len(),
        total_ms = reports.iter().map(|r| r.timing.elapsed_ms()).sum::<f64>(),
        slowest_key,
        slowest_title,
        "suite.finished"
    );
    Ok(())
}
