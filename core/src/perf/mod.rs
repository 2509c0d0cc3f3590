//! Shared benchmark scaffolding used by the CLI, benches and reporting
//! utilities.
//!
//! Centralizing the scenario table here keeps the `nbench` binary, Criterion
//! benches and the perf dashboard in sync so we do not accidentally compare
//! different workloads or arguments across tools.

pub mod scenarios;
