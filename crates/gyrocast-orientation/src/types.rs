/// Raw orientation sample from the phone, angles in radians.
#[derive(Debug, Clone, Copy)]
pub struct RawSample {
    /// Rotation about the vertical axis (compass direction).
    pub alpha: f64,
    /// Front-to-back tilt.
    pub beta: f64,
    /// Left-to-right tilt.
    pub gamma: f64,
    /// Milliseconds since the previous sample, 0 for the first.
    pub ts_delta: u64,
}

/// Calibrated heading/pitch computed from one raw sample, in degrees.
///
/// Subscribers receive these read-only; the third field is reserved
/// space in the wire frame and is always 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub heading: f64,
    pub pitch: f64,
    pub reserved: f64,
}

impl Entry {
    pub fn new(heading: f64, pitch: f64) -> Self {
        Self {
            heading,
            pitch,
            reserved: 0.0,
        }
    }
}
