use tracing::trace;

/// Dense row-major square matrix.
struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    fn from_fn(n: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                data.push(f(i, j));
            }
        }
        Self { n, data }
    }

    fn zeroed(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
    }

    /// Standard triple loop, `k` innermost.
    fn multiply(&self, rhs: &Matrix) -> Matrix {
        let n = self.n;
        let mut out = Matrix::zeroed(n);
        for i in 0..n {
            for j in 0..n {
                let mut sum = 0.0;
                for k in 0..n {
                    sum += self.get(i, k) * rhs.get(k, j);
                }
                out.set(i, j, sum);
            }
        }
        out
    }
}

/// Multiply `A[i][j] = i + j` by `B[i][j] = i - j` and return the middle
/// cell `C[n / 2][n / 2]` of the full product.
pub fn matrix_multiply(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }

    let a = Matrix::from_fn(n, |i, j| (i + j) as f64);
    let b = Matrix::from_fn(n, |i, j| i as f64 - j as f64);
    let c = a.multiply(&b);

    let mid = n / 2;
    trace!(target: "nbench::workload", n, mid, "matrix_multiply.done");
    c.get(mid, mid)
}
