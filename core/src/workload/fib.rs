/// Naive doubly-recursive Fibonacci. Memoization would defeat the point of
/// measuring call overhead.
pub fn fibonacci(n: u32) -> u64 {
    if n <= 1 {
        return n as u64;
    }
    fibonacci(n - 1) + fibonacci(n - 2)
}
