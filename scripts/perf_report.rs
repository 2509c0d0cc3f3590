use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, SecondsFormat, Utc};
use nbench_core::{
    harness::measure,
    perf::scenarios::{Benchmark, Scale, benchmarks},
    value::BenchValue,
};
use serde::Serialize;
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::env;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts every heap block and byte that passes through the system allocator.
struct CountingAlloc;

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

// Process-wide bytes in use, and the high-water mark since the last reset.
static HEAP_NOW: AtomicUsize = AtomicUsize::new(0);
static HEAP_HIGH: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct AllocBalance {
    blocks_allocated: u64,
    blocks_freed: u64,
    bytes_live: i64,
}

impl AllocBalance {
    fn current() -> Self {
        BALANCE.try_with(Cell::get).unwrap_or_default()
    }

    fn blocks_live(&self) -> i64 {
        self.blocks_allocated as i64 - self.blocks_freed as i64
    }

    fn since(&self, earlier: &AllocBalance) -> AllocBalance {
        AllocBalance {
            blocks_allocated: self.blocks_allocated - earlier.blocks_allocated,
            blocks_freed: self.blocks_freed - earlier.blocks_freed,
            bytes_live: self.bytes_live - earlier.bytes_live,
        }
    }
}

// Workloads run on the calling thread, so the balance is kept per thread and
// other threads (the test runner, for one) cannot disturb it.
thread_local! {
    static BALANCE: Cell<AllocBalance> = const {
        Cell::new(AllocBalance {
            blocks_allocated: 0,
            blocks_freed: 0,
            bytes_live: 0,
        })
    };
}

fn on_alloc(bytes: usize) {
    let _ = BALANCE.try_with(|cell| {
        let mut b = cell.get();
        b.blocks_allocated += 1;
        b.bytes_live += bytes as i64;
        cell.set(b);
    });
    let now = HEAP_NOW.fetch_add(bytes, Ordering::Relaxed) + bytes;
    HEAP_HIGH.fetch_max(now, Ordering::Relaxed);
}

fn on_free(bytes: usize) {
    let _ = BALANCE.try_with(|cell| {
        let mut b = cell.get();
        b.blocks_freed += 1;
        b.bytes_live -= bytes as i64;
        cell.set(b);
    });
    HEAP_NOW.fetch_sub(bytes, Ordering::Relaxed);
}

fn on_resize(old: usize, new: usize) {
    let _ = BALANCE.try_with(|cell| {
        let mut b = cell.get();
        b.bytes_live += new as i64 - old as i64;
        cell.set(b);
    });
    if new >= old {
        let now = HEAP_NOW.fetch_add(new - old, Ordering::Relaxed) + (new - old);
        HEAP_HIGH.fetch_max(now, Ordering::Relaxed);
    } else {
        HEAP_NOW.fetch_sub(old - new, Ordering::Relaxed);
    }
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            on_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            on_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        on_free(layout.size());
    }

    // A successful realloc keeps one block live and only moves its size.
    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let moved = unsafe { System.realloc(ptr, layout, new_size) };
        if !moved.is_null() {
            on_resize(layout.size(), new_size);
        }
        moved
    }
}

/// Peak heap growth over `f`, measured against the bytes in use when it starts.
fn heap_growth<T>(f: impl FnOnce() -> T) -> (T, usize) {
    let start = HEAP_NOW.load(Ordering::Relaxed);
    HEAP_HIGH.store(start, Ordering::Relaxed);
    let out = f();
    let high = HEAP_HIGH.load(Ordering::Relaxed);
    (out, high.saturating_sub(start))
}

#[derive(Debug)]
struct Options {
    scale: Scale,
    iterations: usize,
    output: PathBuf,
    timestamp: DateTime<Utc>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            scale: Scale::Quick,
            iterations: 5,
            output: PathBuf::from("target/nbench/perf_report.json"),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PerfReport {
    generated_at: String,
    scale: &'static str,
    iterations: usize,
    scenarios: Vec<ScenarioReport>,
}

#[derive(Debug, Serialize)]
struct ScenarioReport {
    key: &'static str,
    title: &'static str,
    arg: u32,
    result: BenchValue,
    min_ms: f64,
    mean_ms: f64,
    max_ms: f64,
    peak_heap_bytes: usize,
    allocations_per_run: u64,
    leaked_blocks: i64,
    leaked_bytes: i64,
}

impl ScenarioReport {
    fn leaked(&self) -> bool {
        self.leaked_blocks != 0 || self.leaked_bytes != 0
    }
}

fn main() -> Result<()> {
    let Some(opts) = parse_args(env::args().skip(1))? else {
        print_help();
        return Ok(());
    };

    let report = build_report(&opts)?;
    write_report(&opts.output, &report)?;

    let stdout = std::io::stdout();
    print_summary(&mut stdout.lock(), &report)?;
    println!("report written to {}", opts.output.display());

    let leaks: Vec<String> = report
        .scenarios
        .iter()
        .filter(|s| s.leaked())
        .map(|s| format!("{}: {} blocks / {} bytes still live", s.key, s.leaked_blocks, s.leaked_bytes))
        .collect();
    if !leaks.is_empty() {
        bail!("allocation balance check failed:\n  {}", leaks.join("\n  "));
    }
    Ok(())
}

/// `Ok(None)` means help was requested.
fn parse_args<I>(args: I) -> Result<Option<Options>>
where
    I: IntoIterator<Item = String>,
{
    let mut opts = Options::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--scale" => {
                let value = iter.next().context("expected quick|full after --scale")?;
                opts.scale = match value.as_str() {
                    "quick" => Scale::Quick,
                    "full" => Scale::Full,
                    other => bail!("unknown scale '{other}', expected quick or full"),
                };
            }
            "--iters" => {
                let value = iter.next().context("expected integer after --iters <n>")?;
                opts.iterations = value.parse().context("parse --iters as positive integer")?;
                if opts.iterations == 0 {
                    bail!("--iters must be at least 1");
                }
            }
            "--output" | "-o" => {
                let value = iter.next().context("expected path after --output <file>")?;
                opts.output = PathBuf::from(value);
            }
            "--timestamp" => {
                let value = iter.next().context("expected RFC3339 timestamp after --timestamp")?;
                opts.timestamp = DateTime::parse_from_rfc3339(&value)
                    .context("parse --timestamp as RFC3339")?
                    .with_timezone(&Utc);
            }
            "--help" | "-h" => return Ok(None),
            other => return Err(anyhow!("unknown argument '{other}'. Use --help for usage information.")),
        }
    }
    Ok(Some(opts))
}

fn print_help() {
    println!("Usage: perf_report [options]");
    println!();
    println!("Times each nbench workload and checks that it frees every heap block it allocates.");
    println!();
    println!("Options:");
    println!("  --scale quick|full      Argument set to run (default: quick)");
    println!("  --iters <n>             Timed runs per workload (default: 5)");
    println!("  --output, -o <file>     JSON report path (default: target/nbench/perf_report.json)");
    println!("  --timestamp <RFC3339>   Override the report timestamp");
    println!("  --help, -h              Show this help message");
}

fn build_report(opts: &Options) -> Result<PerfReport> {
    let scenarios = benchmarks()
        .iter()
        .map(|bench| profile_scenario(bench, opts.scale, opts.iterations))
        .collect::<Result<Vec<_>>>()?;
    Ok(PerfReport {
        generated_at: opts.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        scale: opts.scale.suffix(),
        iterations: opts.iterations,
        scenarios,
    })
}

/// Run one scenario `iterations` times through the timing driver. Each run's
/// result is checked against the scenario oracle, and the allocation balance
/// across the run must come back to where it started.
fn profile_scenario(bench: &Benchmark, scale: Scale, iterations: usize) -> Result<ScenarioReport> {
    let mut elapsed_ms = Vec::with_capacity(iterations);
    let mut result = None;
    let mut peak_heap_bytes = 0;
    let mut allocations_per_run = 0;
    let mut leaked_blocks = 0;
    let mut leaked_bytes = 0;

    for _ in 0..iterations.max(1) {
        let before = AllocBalance::current();
        let (timing, growth) = heap_growth(|| measure(bench.workload(), bench.arg(scale)));
        let delta = AllocBalance::current().since(&before);

        bench.verify(scale, &timing.value)?;
        result = Some(timing.value);
        elapsed_ms.push(timing.elapsed_ms());
        peak_heap_bytes = peak_heap_bytes.max(growth);
        allocations_per_run = allocations_per_run.max(delta.blocks_allocated);
        leaked_blocks += delta.blocks_live();
        leaked_bytes += delta.bytes_live;
    }

    let result = result.with_context(|| format!("{} produced no result", bench.key()))?;
    let (min_ms, mean_ms, max_ms) = spread(&elapsed_ms);
    Ok(ScenarioReport {
        key: bench.key(),
        title: bench.title(scale),
        arg: bench.arg(scale),
        result,
        min_ms,
        mean_ms,
        max_ms,
        peak_heap_bytes,
        allocations_per_run,
        leaked_blocks,
        leaked_bytes,
    })
}

/// Minimum, mean and maximum of the samples; all zero when there are none.
fn spread(samples: &[f64]) -> (f64, f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    (min, mean, max)
}

fn write_report(path: &Path, report: &PerfReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).with_context(|| format!("write {}", path.display()))?;
    writer.flush().with_context(|| format!("flush {}", path.display()))
}

fn print_summary<W: Write>(out: &mut W, report: &PerfReport) -> Result<()> {
    writeln!(out, "{} scale, {} runs each", report.scale, report.iterations)?;
    for s in &report.scenarios {
        writeln!(
            out,
            "{:<28} mean {:>9.2}ms  peak {:>10} B  allocs {:>7}  leaked {}",
            s.title, s.mean_ms, s.peak_heap_bytes, s.allocations_per_run, s.leaked_blocks
        )?;
    }
    Ok(())
}
