use serde::{Deserialize, Serialize};

/// Result produced by a workload.
///
/// Every workload reports through this one type so the driver can format
/// integers and floats uniformly without knowing which workload ran.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BenchValue {
    Int(u64),
    Float(f64),
}

impl From<u64> for BenchValue {
    fn from(value: u64) -> Self {
        BenchValue::Int(value)
    }
}

impl From<usize> for BenchValue {
    fn from(value: usize) -> Self {
        BenchValue::Int(value as u64)
    }
}

impl From<f64> for BenchValue {
    fn from(value: f64) -> Self {
        BenchValue::Float(value)
    }
}

impl core::fmt::Display for BenchValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BenchValue::Int(i) => {
                let mut buf = itoa::Buffer::new();
                f.write_str(buf.format(*i))
            }
            // ryu keeps a trailing `.0` on integral values, so a float result
            // never reads like an integer.
            BenchValue::Float(fl) if fl.is_finite() => {
                let mut buf = ryu::Buffer::new();
                f.write_str(buf.format_finite(*fl))
            }
            BenchValue::Float(fl) => write!(f, "{fl}"),
        }
    }
}
