use crate::{
    value::BenchValue,
    workload::{MAX_ITERATIONS, binary_trees, fibonacci, mandelbrot, matrix_multiply, prime_sieve},
};
use anyhow::{Result, anyhow};

/// Which argument set a scenario runs with.
///
/// `Full` is what the `nbench` binary reports. `Quick` keeps each run in the
/// millisecond range so Criterion can sample it many times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Full,
    Quick,
}

impl Scale {
    pub fn suffix(self) -> &'static str {
        match self {
            Scale::Full => "full",
            Scale::Quick => "quick",
        }
    }
}

#[derive(Clone, Copy)]
pub enum ExpectedValue {
    Int(u64),
    Float(f64),
    /// Inclusive bounds for results with no memorised oracle.
    IntRange { min: u64, max: u64 },
}

impl ExpectedValue {
    pub fn verify(&self, actual: &BenchValue) -> Result<()> {
        let matches = match (self, actual) {
            (ExpectedValue::Int(v), BenchValue::Int(a)) => a == v,
            (ExpectedValue::Float(v), BenchValue::Float(a)) => (a - v).abs() <= f64::EPSILON,
            (ExpectedValue::IntRange { min, max }, BenchValue::Int(a)) => (*min..=*max).contains(a),
            _ => false,
        };
        if matches {
            Ok(())
        } else {
            Err(anyhow!("expected {:?} but observed {:?}", self, actual))
        }
    }
}

impl std::fmt::Debug for ExpectedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedValue::Int(v) => write!(f, "Int({})", v),
            ExpectedValue::Float(v) => write!(f, "Float({})", v),
            ExpectedValue::IntRange { min, max } => write!(f, "Int({}..={})", min, max),
        }
    }
}

/// Argument, display title and oracle for one scale of a benchmark.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioCase {
    pub title: &'static str,
    pub arg: u32,
    pub expected: ExpectedValue,
}

/// One entry of the fixed benchmark table.
pub struct Benchmark {
    key: &'static str,
    full: ScenarioCase,
    quick: ScenarioCase,
    workload: fn(u32) -> BenchValue,
}

impl Benchmark {
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn case(&self, scale: Scale) -> &ScenarioCase {
        match scale {
            Scale::Full => &self.full,
            Scale::Quick => &self.quick,
        }
    }

    pub fn title(&self, scale: Scale) -> &'static str {
        self.case(scale).title
    }

    pub fn arg(&self, scale: Scale) -> u32 {
        self.case(scale).arg
    }

    pub fn workload(&self) -> fn(u32) -> BenchValue {
        self.workload
    }

    pub fn bench_case_name(&self, scale: Scale) -> String {
        format!("{}_{}", self.key, scale.suffix())
    }

    /// Run the workload without timing or checking it.
    pub fn run(&self, scale: Scale) -> BenchValue {
        (self.workload)(self.arg(scale))
    }

    pub fn verify(&self, scale: Scale, value: &BenchValue) -> Result<()> {
        self.case(scale)
            .expected
            .verify(value)
            .map_err(|err| err.context(format!("scenario {} ({})", self.key, scale.suffix())))
    }

    pub fn run_verified(&self, scale: Scale) -> Result<BenchValue> {
        let value = self.run(scale);
        self.verify(scale, &value)?;
        Ok(value)
    }
}

impl std::fmt::Debug for Benchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Benchmark")
            .field("key", &self.key)
            .field("full", &self.full)
            .field("quick", &self.quick)
            .finish()
    }
}

const fn pixel_bounds(n: u64) -> ExpectedValue {
    ExpectedValue::IntRange {
        min: n * n,
        max: n * n * MAX_ITERATIONS as u64,
    }
}

static BENCHMARKS: &[Benchmark] = &[
    Benchmark {
        key: "fibonacci",
        full: ScenarioCase {
            title: "Fibonacci(42)",
            arg: 42,
            expected: ExpectedValue::Int(267_914_296),
        },
        quick: ScenarioCase {
            title: "Fibonacci(25)",
            arg: 25,
            expected: ExpectedValue::Int(75_025),
        },
        workload: |n| fibonacci(n).into(),
    },
    Benchmark {
        key: "prime_sieve",
        full: ScenarioCase {
            title: "Prime Sieve (10M)",
            arg: 10_000_000,
            expected: ExpectedValue::Int(664_579),
        },
        quick: ScenarioCase {
            title: "Prime Sieve (100K)",
            arg: 100_000,
            expected: ExpectedValue::Int(9_592),
        },
        workload: |n| prime_sieve(n as usize).into(),
    },
    Benchmark {
        key: "mandelbrot",
        full: ScenarioCase {
            title: "Mandelbrot (2000x2000)",
            arg: 2000,
            expected: pixel_bounds(2000),
        },
        quick: ScenarioCase {
            title: "Mandelbrot (100x100)",
            arg: 100,
            expected: pixel_bounds(100),
        },
        workload: |n| mandelbrot(n).into(),
    },
    Benchmark {
        key: "matrix_multiply",
        full: ScenarioCase {
            title: "Matrix Multiply (500x500)",
            arg: 500,
            expected: ExpectedValue::Float(10_291_750.0),
        },
        quick: ScenarioCase {
            title: "Matrix Multiply (100x100)",
            arg: 100,
            expected: ExpectedValue::Float(78_350.0),
        },
        workload: |n| matrix_multiply(n as usize).into(),
    },
    Benchmark {
        key: "binary_trees",
        full: ScenarioCase {
            title: "Binary Trees (depth 18)",
            arg: 18,
            expected: ExpectedValue::Int(524_287),
        },
        quick: ScenarioCase {
            title: "Binary Trees (depth 12)",
            arg: 12,
            expected: ExpectedValue::Int(8_191),
        },
        workload: |n| binary_trees(n).into(),
    },
];

/// The five benchmarks in the order they are reported.
pub fn benchmarks() -> &'static [Benchmark] {
    BENCHMARKS
}

pub fn find_benchmark(key: &str) -> Option<&'static Benchmark> {
    BENCHMARKS.iter().find(|bench| bench.key == key)
}
