//! Sequential timing driver.
//!
//! Benchmarks run one after another on the calling thread; a result line is
//! written and flushed before the next workload starts.

use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info_span};

use crate::perf::scenarios::{Benchmark, Scale, benchmarks};
use crate::value::BenchValue;

pub const START_BANNER: &str = "Starting benchmarks...";
pub const DONE_BANNER: &str = "Done!";

/// Elapsed time and result of one workload invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub elapsed: Duration,
    pub value: BenchValue,
}

impl Timing {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Invoke `action(arg)` between two monotonic timestamps.
pub fn measure<A, F>(action: F, arg: A) -> Timing
where
    F: FnOnce(A) -> BenchValue,
{
    let start = Instant::now();
    let value = action(arg);
    let elapsed = start.elapsed();
    Timing { elapsed, value }
}

/// `"<name>: <elapsed>ms (result: <value>)"` with two decimals of elapsed time.
pub fn format_line(name: &str, timing: &Timing) -> String {
    format!("{}: {:.2}ms (result: {})", name, timing.elapsed_ms(), timing.value)
}

/// Time `action(arg)` and write its result line to `out`.
pub fn time_benchmark<W, A, F>(out: &mut W, name: &str, action: F, arg: A) -> Result<Timing>
where
    W: Write + ?Sized,
    F: FnOnce(A) -> BenchValue,
{
    let timing = measure(action, arg);
    writeln!(out, "{}", format_line(name, &timing)).context("write benchmark result")?;
    out.flush().context("flush benchmark result")?;
    Ok(timing)
}

/// One printed result, kept for callers that want more than the text.
#[derive(Debug, Clone)]
pub struct Report {
    pub key: &'static str,
    pub title: &'static str,
    pub timing: Timing,
}

/// Report with the longest elapsed time; the earlier one wins a tie.
pub fn slowest(reports: &[Report]) -> Option<&Report> {
    reports.iter().reduce(|best, r| {
        if r.timing.elapsed > best.timing.elapsed { r } else { best }
    })
}

/// The fixed, ordered benchmark list at a given scale.
pub struct Suite {
    benchmarks: &'static [Benchmark],
    scale: Scale,
}

impl Default for Suite {
    fn default() -> Self {
        Self::new(Scale::Full)
    }
}

impl Suite {
    pub fn new(scale: Scale) -> Self {
        Self {
            benchmarks: benchmarks(),
            scale,
        }
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }

    /// Write the banner, one numbered line per benchmark, then the closing
    /// banner. A result that fails its oracle aborts the run.
    pub fn run<W: Write + ?Sized>(&self, out: &mut W) -> Result<Vec<Report>> {
        writeln!(out, "{START_BANNER}\n").context("write start banner")?;

        let mut reports = Vec::with_capacity(self.benchmarks.len());
        for (idx, bench) in self.benchmarks.iter().enumerate() {
            let title = bench.title(self.scale);
            let span = info_span!(target: "nbench::harness", "benchmark", key = bench.key(), scale = self.scale.suffix());
            let _guard = span.enter();

            let name = format!("{}. {}", idx + 1, title);
            let timing = time_benchmark(out, &name, bench.workload(), bench.arg(self.scale))?;
            debug!(
                target: "nbench::harness",
                elapsed_ms = timing.elapsed_ms(),
                result = %timing.value,
                "benchmark.finished"
            );
            bench.verify(self.scale, &timing.value)?;

            reports.push(Report {
                key: bench.key(),
                title,
                timing,
            });
        }

        writeln!(out, "\n{DONE_BANNER}").context("write done banner")?;
        out.flush().context("flush output")?;
        Ok(reports)
    }
}
