//! The five CPU-bound workloads timed by the harness.
//!
//! Each workload reads only its integer argument, owns every allocation it
//! makes and releases it before returning.

mod fib;
mod mandelbrot;
mod matrix;
mod sieve;
pub mod tree;

pub use fib::fibonacci;
pub use mandelbrot::{MAX_ITERATIONS, mandelbrot};
pub use matrix::matrix_multiply;
pub use sieve::prime_sieve;
pub use tree::binary_trees;

#[cfg(test)]
mod tree_test;
