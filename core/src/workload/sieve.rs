use tracing::trace;

/// Count the primes in `[0, n]` with the Sieve of Eratosthenes.
pub fn prime_sieve(n: usize) -> usize {
    if n < 2 {
        return 0;
    }

    let mut is_prime = vec![true; n + 1];
    is_prime[0] = false;
    is_prime[1] = false;

    let mut i = 2;
    while i * i <= n {
        if is_prime[i] {
            for j in (i * i..=n).step_by(i) {
                is_prime[j] = false;
            }
        }
        i += 1;
    }

    let count = is_prime[2..].iter().filter(|&&flag| flag).count();
    trace!(target: "nbench::workload", table_len = is_prime.len(), count, "prime_sieve.done");
    count
}
