const XMIN: f64 = -2.0;
const XMAX: f64 = 1.0;
const YMIN: f64 = -1.5;
const YMAX: f64 = 1.5;

/// Iteration cap for a single pixel.
pub const MAX_ITERATIONS: u32 = 1000;

/// Sum of escape-iteration counts over an `n x n` grid covering
/// x in [-2, 1], y in [-1.5, 1.5]. Rows outer, columns inner.
pub fn mandelbrot(n: u32) -> u64 {
    let size = n as f64;
    let mut count: u64 = 0;

    for py in 0..n {
        let y0 = YMIN + (YMAX - YMIN) * py as f64 / size;
        for px in 0..n {
            let x0 = XMIN + (XMAX - XMIN) * px as f64 / size;
            count += escape_iterations(x0, y0) as u64;
        }
    }

    count
}

/// Iterate z <- z^2 + c from z = 0 until |z|^2 > 4 or the cap is reached.
#[inline]
pub(crate) fn escape_iterations(x0: f64, y0: f64) -> u32 {
    let mut x = 0.0;
    let mut y = 0.0;
    let mut iter = 0;

    while x * x + y * y <= 4.0 && iter < MAX_ITERATIONS {
        let xtemp = x * x - y * y + x0;
        y = 2.0 * x * y + y0;
        x = xtemp;
        iter += 1;
    }

    iter
}
