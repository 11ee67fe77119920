pub mod series;

pub use series::SeriesBuffer;

use thiserror::Error;

/// Number of uniform steps across the knot span; resampling emits
/// `DEFAULT_STEPS - 1` points.
pub const DEFAULT_STEPS: usize = 24;

#[derive(Debug, Error, PartialEq)]
pub enum ResampleError {
    #[error("need at least 2 knots, got {0}")]
    TooFewKnots(usize),
    #[error("knot positions must be strictly increasing (violated at index {0})")]
    NonIncreasingX(usize),
}

/// Natural cubic spline fitted to an ordered set of knots.
///
/// Segment `i` evaluates as `a + b·t + c·t² + d·t³` for
/// `t = x − xs[i]`, with zero second derivative at both endpoints.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
}

impl CubicSpline {
    /// Solve for the per-segment coefficients.
    pub fn fit(knots: &[(f64, f64)]) -> Result<Self, ResampleError> {
        if knots.len() < 2 {
            return Err(ResampleError::TooFewKnots(knots.len()));
        }
        let n = knots.len() - 1;
        let xs: Vec<f64> = knots.iter().map(|k| k.0).collect();
        let a: Vec<f64> = knots.iter().map(|k| k.1).collect();

        let mut h = vec![0.0; n];
        for i in 0..n {
            h[i] = xs[i + 1] - xs[i];
            if h[i] <= 0.0 {
                return Err(ResampleError::NonIncreasingX(i + 1));
            }
        }

        // Right-hand side of the tridiagonal system.
        let mut alpha = vec![0.0; n + 1];
        for i in 1..n {
            alpha[i] = 3.0 * (a[i + 1] - a[i]) / h[i] - 3.0 * (a[i] - a[i - 1]) / h[i - 1];
        }

        // Thomas algorithm, forward elimination. l[0] = 1, z[0] = 0
        // encodes the natural boundary on the left.
        let mut l = vec![0.0; n + 1];
        let mut mu = vec![0.0; n + 1];
        let mut z = vec![0.0; n + 1];
        l[0] = 1.0;
        for i in 1..n {
            l[i] = 2.0 * (xs[i + 1] - xs[i - 1]) - h[i - 1] * mu[i - 1];
            mu[i] = h[i] / l[i];
            z[i] = (alpha[i] - h[i - 1] * z[i - 1]) / l[i];
        }

        // Back-substitution, with c[n] = 0 as the right boundary.
        let mut b = vec![0.0; n];
        let mut c = vec![0.0; n + 1];
        let mut d = vec![0.0; n];
        for j in (0..n).rev() {
            c[j] = z[j] - mu[j] * c[j + 1];
            b[j] = (a[j + 1] - a[j]) / h[j] - h[j] * (c[j + 1] + 2.0 * c[j]) / 3.0;
            d[j] = (c[j + 1] - c[j]) / (3.0 * h[j]);
        }

        Ok(Self { xs, a, b, c, d })
    }

    /// Evaluate the spline at `x`. Positions outside the knot span are
    /// extrapolated from the nearest segment.
    pub fn eval(&self, x: f64) -> f64 {
        let last = self.b.len() - 1;
        let i = self.xs.partition_point(|&k| k < x).saturating_sub(1).min(last);
        let t = x - self.xs[i];
        self.a[i] + self.b[i] * t + self.c[i] * t * t + self.d[i] * t * t * t
    }

    /// Sample the spline at `steps` equal increments across the knot
    /// span, producing `steps - 1` points starting at the first knot.
    /// The active segment index only ever advances, mirroring the
    /// monotone sweep over the input.
    pub fn resample(&self, steps: usize) -> Vec<(f64, f64)> {
        let n = self.b.len();
        let x0 = self.xs[0];
        let step = (self.xs[n] - x0) / steps as f64;

        let mut out = Vec::with_capacity(steps.saturating_sub(1));
        let mut cur = 0;
        let mut x = x0;
        for _ in 0..steps.saturating_sub(1) {
            let t = x - self.xs[cur];
            let y = self.a[cur] + self.b[cur] * t + self.c[cur] * t * t + self.d[cur] * t * t * t;
            out.push((x, y));
            x += step;
            while cur < n - 1 && self.xs[cur + 1] < x {
                cur += 1;
            }
        }
        out
    }
}

/// Fit and resample in one call, on the fixed uniform grid.
pub fn resample(knots: &[(f64, f64)]) -> Result<Vec<(f64, f64)>, ResampleError> {
    Ok(CubicSpline::fit(knots)?.resample(DEFAULT_STEPS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_knot_sets() {
        assert_eq!(CubicSpline::fit(&[]).unwrap_err(), ResampleError::TooFewKnots(0));
        assert_eq!(
            CubicSpline::fit(&[(0.0, 1.0)]).unwrap_err(),
            ResampleError::TooFewKnots(1)
        );
        assert_eq!(
            CubicSpline::fit(&[(0.0, 1.0), (0.0, 2.0)]).unwrap_err(),
            ResampleError::NonIncreasingX(1)
        );
        assert_eq!(
            CubicSpline::fit(&[(0.0, 1.0), (1.0, 2.0), (0.5, 3.0)]).unwrap_err(),
            ResampleError::NonIncreasingX(2)
        );
    }

    #[test]
    fn passes_through_the_knots() {
        let knots = [
            (0.0, 1.0),
            (0.7, -0.4),
            (1.1, 2.3),
            (2.5, 0.0),
            (4.0, -1.7),
        ];
        let spline = CubicSpline::fit(&knots).unwrap();
        for (x, y) in knots {
            assert!((spline.eval(x) - y).abs() < 1e-12, "mismatch at x = {x}");
        }
    }

    #[test]
    fn two_knots_give_a_straight_line() {
        let spline = CubicSpline::fit(&[(0.0, 0.0), (2.0, 4.0)]).unwrap();
        assert!((spline.eval(0.5) - 1.0).abs() < 1e-12);
        assert!((spline.eval(1.0) - 2.0).abs() < 1e-12);
        assert!((spline.eval(1.5) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn sine_grid_resamples_onto_the_curve() {
        let knots: Vec<(f64, f64)> = (0..=24).map(|i| (i as f64, (i as f64).sin())).collect();
        let out = resample(&knots).unwrap();

        assert_eq!(out.len(), DEFAULT_STEPS - 1);
        assert_eq!(out[0].0, 0.0);
        for (x, y) in out {
            assert!((y - x.sin()).abs() < 1e-8, "x = {x}: {y} vs {}", x.sin());
        }
    }

    #[test]
    fn irregular_spacing_resamples_smoothly() {
        let xs = [0.0, 0.3, 1.2, 1.9, 3.1, 4.4, 5.0];
        let knots: Vec<(f64, f64)> = xs.iter().map(|&x| (x, x * x)).collect();
        let out = resample(&knots).unwrap();

        assert_eq!(out.len(), DEFAULT_STEPS - 1);
        let step = 5.0 / DEFAULT_STEPS as f64;
        for (i, (x, y)) in out.iter().enumerate() {
            assert!((x - i as f64 * step).abs() < 1e-9);
            // Natural cubics track a parabola loosely at the ends but
            // must stay close in the interior.
            assert!((y - x * x).abs() < 0.2, "x = {x}: {y}");
        }
    }
}
