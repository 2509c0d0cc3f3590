pub mod harness;
pub mod perf;
pub mod value;
pub mod workload;
