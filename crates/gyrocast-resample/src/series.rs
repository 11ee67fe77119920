use crate::ResampleError;

/// Accumulates values stamped with inter-arrival deltas into
/// absolute-time knots suitable for spline fitting.
///
/// Raw samples carry only the elapsed milliseconds since the previous
/// one; this buffer integrates them back onto an absolute axis.
#[derive(Debug, Default)]
pub struct SeriesBuffer {
    t: f64,
    knots: Vec<(f64, f64)>,
}

impl SeriesBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value observed `delta_ms` after the previous one.
    pub fn push(&mut self, delta_ms: u64, value: f64) {
        self.t += delta_ms as f64;
        self.knots.push((self.t, value));
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    pub fn knots(&self) -> &[(f64, f64)] {
        &self.knots
    }

    /// Resample the accumulated series onto the uniform grid, then
    /// reset the buffer for the next batch.
    pub fn resample_and_clear(&mut self) -> Result<Vec<(f64, f64)>, ResampleError> {
        let out = crate::resample(&self.knots)?;
        self.knots.clear();
        self.t = 0.0;
        Ok(out)
    }
}
